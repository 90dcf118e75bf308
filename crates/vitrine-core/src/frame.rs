//! Frame loop driving the animated effects.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag that stops a [`FrameLoop`].
///
/// Clones share the flag, so any holder can cancel the loop.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the loop stop before its next frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Runs a per-frame step until cancelled, or until an optional frame limit.
#[derive(Debug)]
pub struct FrameLoop {
    token: CancellationToken,
    limit: Option<u64>,
    frame: u64,
}

impl FrameLoop {
    /// Loop that runs until `token` is cancelled.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            limit: None,
            frame: 0,
        }
    }

    /// Loop that also stops after `limit` frames.
    pub fn with_limit(token: CancellationToken, limit: u64) -> Self {
        Self {
            token,
            limit: Some(limit),
            frame: 0,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Number of frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Invoke `step` once per frame with the frame index.
    ///
    /// Returns the total number of frames run, or the first error `step`
    /// produced.
    pub fn run<E>(&mut self, mut step: impl FnMut(u64) -> Result<(), E>) -> Result<u64, E> {
        while !self.token.is_cancelled() && self.limit.is_none_or(|limit| self.frame < limit) {
            step(self.frame)?;
            self.frame += 1;
        }
        Ok(self.frame)
    }
}
