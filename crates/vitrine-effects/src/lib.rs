//! Animated effects for the vitrine showcase.
//!
//! Three independent effects share nothing but the host page:
//!
//! - [`BranchField`]: wandering line segments on a slowly fading surface,
//!   drawn behind the hero section.
//! - [`TrailHost`]: a fixed-capacity particle pool that follows the pointer
//!   through a perspective camera.
//! - [`RevealObserver`]: toggles section visibility as sections scroll in
//!   and out of view.
//!
//! Effects draw into [`PixelCanvas`] rasters through the [`Surface2d`] and
//! [`PointRenderer`] traits; [`HalfBlocks`] turns a raster into terminal
//! cells.

mod branch;
mod raster;
mod reveal;
mod sprite;
mod surface;
mod trail;

pub use branch::{Branch, BranchField};
pub use raster::{HalfBlocks, PixelCanvas};
pub use reveal::{RevealEvent, RevealObserver, SectionBounds, visible_fraction};
pub use sprite::Sprite;
pub use surface::{PointGeometry, PointMaterial, PointRenderer, Surface2d, Viewport};
pub use trail::{
    Attach, Camera, OFFSCREEN, ParticlePool, SlotState, Spawn, TrailError, TrailHost,
    TrailSession,
};
