//! Pointer-following particle trail.

mod camera;
mod pool;
mod session;

use glam::Vec2;
use log::{info, warn};
use thiserror::Error;
use vitrine_core::TrailSettings;

pub use camera::Camera;
pub use pool::{OFFSCREEN, ParticlePool, SlotState, Spawn};
pub use session::TrailSession;

use crate::surface::{PointRenderer, Viewport};

/// Reasons a trail cannot be started.
#[derive(Debug, Error, PartialEq)]
pub enum TrailError {
    #[error("viewport {width}x{height} has no area")]
    EmptyViewport { width: u16, height: u16 },
    #[error("particle pool capacity must be positive")]
    ZeroCapacity,
    #[error("spawn batch size must be positive")]
    ZeroBatch,
    #[error("pointer smoothing {0} is outside 0..=1")]
    Smoothing(f32),
}

/// Outcome of [`TrailHost::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// A new session now draws to the renderer.
    Attached,
    /// A session was already attached; nothing changed.
    AlreadyAttached,
}

/// Slot holding at most one trail session for a page.
#[derive(Debug, Default)]
pub struct TrailHost {
    session: Option<TrailSession>,
}

impl TrailHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&TrailSession> {
        self.session.as_ref()
    }

    /// Start a trail drawing to `renderer`.
    ///
    /// Calling this while a session is attached logs a warning and leaves
    /// the existing session untouched. With `early_start` the pointer is
    /// placed at the configured initial position instead of waiting for
    /// the first pointer move.
    pub fn init(
        &mut self,
        settings: &TrailSettings,
        renderer: &impl PointRenderer,
        early_start: bool,
    ) -> Result<Attach, TrailError> {
        self.init_with(settings, renderer, early_start, TrailSession::new)
    }

    /// [`TrailHost::init`] with a caller-built session, for deterministic
    /// randomness.
    pub fn init_with(
        &mut self,
        settings: &TrailSettings,
        renderer: &impl PointRenderer,
        early_start: bool,
        build: impl FnOnce(&TrailSettings, Viewport) -> Result<TrailSession, TrailError>,
    ) -> Result<Attach, TrailError> {
        if self.session.is_some() {
            warn!("pointer trail is already attached, skipping duplicate init");
            return Ok(Attach::AlreadyAttached);
        }

        let viewport = renderer.viewport();
        let mut session = build(settings, viewport)?;
        if early_start {
            session.place_pointer(settings.initial_position());
        }
        info!(
            "pointer trail attached: {} particles, {}x{}px",
            settings.capacity, viewport.width, viewport.height
        );
        self.session = Some(session);
        Ok(Attach::Attached)
    }

    /// Advance the attached session, if any.
    pub fn advance_frame(&mut self, renderer: &mut impl PointRenderer) {
        if let Some(session) = &mut self.session {
            session.advance_frame(renderer);
        }
    }

    pub fn on_pointer_move(&mut self, screen: Vec2) {
        if let Some(session) = &mut self.session {
            session.on_pointer_move(screen);
        }
    }

    pub fn on_resize(&mut self, viewport: Viewport, renderer: &mut impl PointRenderer) {
        match &mut self.session {
            Some(session) => session.on_resize(viewport, renderer),
            None => renderer.set_size(viewport),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use log::{Level, LevelFilter, Log, Metadata, Record};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::raster::PixelCanvas;

    thread_local! {
        static WARNINGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    /// Logger that keeps warnings per test thread.
    struct WarningLog;

    impl Log for WarningLog {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Warn
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static WARNING_LOG: WarningLog = WarningLog;

    fn capture_warnings() {
        // Only the first call installs the logger; later calls reuse it.
        let _ = log::set_logger(&WARNING_LOG);
        log::set_max_level(LevelFilter::Warn);
        WARNINGS.with(|w| w.borrow_mut().clear());
    }

    fn warnings() -> Vec<String> {
        WARNINGS.with(|w| w.borrow().clone())
    }

    fn seeded(settings: &TrailSettings, viewport: Viewport) -> Result<TrailSession, TrailError> {
        TrailSession::with_rng(settings, viewport, StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_second_init_is_noop() {
        capture_warnings();
        let settings = TrailSettings::light();
        let canvas = PixelCanvas::new(Viewport::new(80, 48));
        let mut host = TrailHost::new();

        assert_eq!(host.init_with(&settings, &canvas, false, seeded), Ok(Attach::Attached));
        assert!(warnings().is_empty());
        let mut canvas = canvas;
        host.advance_frame(&mut canvas);
        let cursor = host.session().unwrap().pool().cursor();

        let again = host.init_with(&settings, &canvas, true, seeded);
        assert_eq!(again, Ok(Attach::AlreadyAttached));
        let logged = warnings();
        assert_eq!(logged.len(), 1);
        assert!(logged[0].contains("already attached"));
        assert_eq!(host.session().unwrap().pool().cursor(), cursor);
        assert!(host.session().unwrap().pointer().x > 900.0);
    }

    #[test]
    fn test_early_start_places_pointer() {
        let settings = TrailSettings::full();
        let canvas = PixelCanvas::new(Viewport::new(80, 48));
        let mut host = TrailHost::new();
        host.init_with(&settings, &canvas, true, seeded).unwrap();

        let session = host.session().unwrap();
        let expected = session.camera().ndc_to_plane(Vec2::new(0.0, 0.31));
        assert!(session.pointer().distance(expected) < 1e-5);
        assert!(session.pointer().y > 0.0);
    }

    #[test]
    fn test_failed_init_stays_detached() {
        let canvas = PixelCanvas::new(Viewport::new(0, 0));
        let mut host = TrailHost::new();
        let result = host.init(&TrailSettings::full(), &canvas, false);
        assert!(matches!(result, Err(TrailError::EmptyViewport { .. })));
        assert!(!host.is_attached());

        let mut canvas = canvas;
        host.advance_frame(&mut canvas);
        host.on_resize(Viewport::new(10, 10), &mut canvas);
        assert_eq!(PointRenderer::viewport(&canvas), Viewport::new(10, 10));
    }
}
