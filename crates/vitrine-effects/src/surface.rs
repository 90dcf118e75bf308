//! Rendering surfaces consumed by the effects.

use glam::{Vec2, Vec3};
use vitrine_core::Rgb;

use crate::sprite::Sprite;
use crate::trail::Camera;

/// Size of a drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Viewport of a terminal area of `columns` x `rows` cells, two pixels
    /// per cell vertically.
    pub const fn from_cells(columns: u16, rows: u16) -> Self {
        Self::new(columns, rows.saturating_mul(2))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// A 2D surface the branch field draws on.
pub trait Surface2d {
    /// Current size in pixels.
    fn size(&self) -> Viewport;

    /// Change the surface size. Resizing to the current size leaves the
    /// contents untouched.
    fn resize(&mut self, viewport: Viewport);

    /// Composite `color` at opacity `alpha` over the rectangle.
    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgb, alpha: f32);

    /// Draw an opaque line segment `width` pixels wide.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgb, width: f32);
}

/// Per-point position and color buffers, with upload flags.
#[derive(Debug, Clone)]
pub struct PointGeometry {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Rgb>,
    positions_dirty: bool,
    colors_dirty: bool,
}

impl PointGeometry {
    pub fn new(positions: Vec<Vec3>, colors: Vec<Rgb>) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        Self {
            positions,
            colors,
            positions_dirty: true,
            colors_dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flag both buffers as changed since the last render.
    pub fn mark_dirty(&mut self) {
        self.positions_dirty = true;
        self.colors_dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.positions_dirty || self.colors_dirty
    }

    /// Clear the flags once a renderer has consumed the buffers.
    pub fn mark_uploaded(&mut self) {
        self.positions_dirty = false;
        self.colors_dirty = false;
    }
}

/// How points are drawn.
#[derive(Debug, Clone)]
pub struct PointMaterial {
    /// Point size in world units.
    pub size: f32,
    /// Scale point size with distance from the camera.
    pub size_attenuation: bool,
    /// Alpha mask stamped for every point.
    pub sprite: Sprite,
}

/// A 3D surface that draws point clouds with additive blending.
pub trait PointRenderer {
    /// Size of the render target in pixels.
    fn viewport(&self) -> Viewport;

    /// Change the render target size.
    fn set_size(&mut self, viewport: Viewport);

    /// Clear to transparent and draw the points of `geometry` as seen from
    /// `camera`, then clear the geometry's dirty flags.
    fn render(&mut self, geometry: &mut PointGeometry, material: &PointMaterial, camera: &Camera);
}
