//! Core types shared by the vitrine crates.
//!
//! Holds the float color type used by the effects, the tunable settings for
//! each effect, and the cancellable frame loop that drives them.

mod color;
mod frame;
mod settings;

pub use color::{Rgb, hsl_to_rgb};
pub use frame::{CancellationToken, FrameLoop};
pub use settings::{BranchSettings, RevealPolicy, TrailSettings};
