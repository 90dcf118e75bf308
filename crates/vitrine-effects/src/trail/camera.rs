//! Fixed perspective camera for the particle trail.

use glam::{Mat4, Vec2, Vec3};

use crate::surface::Viewport;

/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
/// Distance from the camera to the `z = 0` plane particles spawn on.
const DISTANCE: f32 = 15.0;

/// Perspective camera on the positive z axis looking at the origin.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    aspect: f32,
    view_projection: Mat4,
    inverse_view_projection: Mat4,
}

impl Camera {
    pub fn new(viewport: Viewport) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, DISTANCE),
            aspect: viewport.aspect(),
            view_projection: Mat4::IDENTITY,
            inverse_view_projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    fn update_projection_matrix(&mut self) {
        let projection =
            Mat4::perspective_rh_gl(FOV_DEGREES.to_radians(), self.aspect, NEAR, FAR);
        let view = Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y);
        self.view_projection = projection * view;
        self.inverse_view_projection = self.view_projection.inverse();
    }

    /// World-space point for a normalized device coordinate.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.inverse_view_projection.project_point3(ndc)
    }

    /// Pixel position and view depth of a world point, or `None` when it
    /// lies behind the near plane or outside the depth range.
    pub fn world_to_screen(&self, world: Vec3, viewport: Viewport) -> Option<(Vec2, f32)> {
        let clip = self.view_projection * world.extend(1.0);
        if clip.w <= NEAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        let size = viewport.size();
        let screen = Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y);
        Some((screen, clip.w))
    }

    /// Normalized device coordinates of a pixel position.
    pub fn screen_to_ndc(screen: Vec2, viewport: Viewport) -> Vec2 {
        let size = viewport.size().max(Vec2::ONE);
        Vec2::new(screen.x / size.x * 2.0 - 1.0, -(screen.y / size.y) * 2.0 + 1.0)
    }

    /// Where the view ray through `ndc` meets the `z = 0` plane.
    ///
    /// The ray is found by unprojecting at a mid depth; any depth on the
    /// ray gives the same intersection.
    pub fn ndc_to_plane(&self, ndc: Vec2) -> Vec3 {
        let on_ray = self.unproject(ndc.extend(0.5));
        let direction = (on_ray - self.position).normalize();
        let distance = -self.position.z / direction.z;
        self.position + direction * distance
    }

    /// World position on the `z = 0` plane under a pixel position.
    pub fn pointer_to_world(&self, screen: Vec2, viewport: Viewport) -> Vec3 {
        self.ndc_to_plane(Self::screen_to_ndc(screen, viewport))
    }
}
