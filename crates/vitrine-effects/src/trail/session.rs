//! One running particle trail: pool, camera, pointer tracking and color.

use glam::{Vec2, Vec3};
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};
use vitrine_core::{Rgb, TrailSettings};

use super::{Camera, ParticlePool, Spawn, TrailError};
use crate::sprite::Sprite;
use crate::surface::{PointMaterial, PointRenderer, Viewport};

/// Where the tracked pointer starts before any input arrives.
const POINTER_UNSET: Vec3 = Vec3::splat(999.0);

/// Owned state of a particle trail.
///
/// Everything the trail needs between frames lives here and is passed
/// explicitly to the frame, pointer and resize handlers.
#[derive(Debug)]
pub struct TrailSession {
    settings: TrailSettings,
    camera: Camera,
    viewport: Viewport,
    pool: ParticlePool,
    material: PointMaterial,
    hue: f32,
    pointer: Vec3,
    animating: bool,
    rng: StdRng,
}

impl TrailSession {
    /// Build a session seeded from the operating system.
    pub fn new(settings: &TrailSettings, viewport: Viewport) -> Result<Self, TrailError> {
        Self::with_rng(settings, viewport, StdRng::from_os_rng())
    }

    /// Build a session with a caller-provided random source.
    pub fn with_rng(
        settings: &TrailSettings,
        viewport: Viewport,
        rng: StdRng,
    ) -> Result<Self, TrailError> {
        if viewport.is_empty() {
            return Err(TrailError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if settings.capacity == 0 {
            return Err(TrailError::ZeroCapacity);
        }
        if settings.batch_size == 0 {
            return Err(TrailError::ZeroBatch);
        }
        if !(0.0..=1.0).contains(&settings.smoothing) {
            return Err(TrailError::Smoothing(settings.smoothing));
        }

        let animating = viewport.width >= settings.min_viewport_width;
        if !animating {
            debug!(
                "viewport {}px is narrower than {}px, trail stays idle",
                viewport.width, settings.min_viewport_width
            );
        }

        Ok(Self {
            settings: settings.clone(),
            camera: Camera::new(viewport),
            viewport,
            pool: ParticlePool::new(settings.capacity),
            material: PointMaterial {
                size: settings.point_size,
                size_attenuation: true,
                sprite: Sprite::default(),
            },
            hue: 0.0,
            pointer: POINTER_UNSET,
            animating,
            rng,
        })
    }

    pub fn settings(&self) -> &TrailSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Current hue phase in turns.
    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Smoothed pointer position in world space.
    pub fn pointer(&self) -> Vec3 {
        self.pointer
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Jump the tracked pointer to a position given in normalized device
    /// coordinates, bypassing smoothing.
    pub fn place_pointer(&mut self, ndc: Vec2) {
        self.pointer = self.camera.ndc_to_plane(ndc);
    }

    /// Smooth the tracked pointer toward the world point under `screen`.
    pub fn on_pointer_move(&mut self, screen: Vec2) {
        let target = self.camera.pointer_to_world(screen, self.viewport);
        self.pointer = self.pointer.lerp(target, self.settings.smoothing);
    }

    /// Follow a viewport size change. Empty sizes are ignored.
    pub fn on_resize(&mut self, viewport: Viewport, renderer: &mut impl PointRenderer) {
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        renderer.set_size(viewport);
    }

    /// Advance the simulation one frame and draw it.
    pub fn advance_frame(&mut self, renderer: &mut impl PointRenderer) {
        if !self.animating {
            return;
        }
        self.hue = (self.hue + self.settings.hue_step) % 1.0;
        self.spawn_batch();
        self.pool.step(
            self.settings.decay,
            self.settings.damping,
            self.settings.fade_exponent,
        );
        renderer.render(self.pool.geometry_mut(), &self.material, &self.camera);
    }

    fn spawn_batch(&mut self) {
        let origin = self.pointer + self.settings.spawn_offset();
        let spread = self.settings.velocity_spread;
        let jitter = self.settings.hue_jitter;
        for _ in 0..self.settings.batch_size {
            let velocity = Vec3::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
            );
            let hue = self.hue + (self.rng.random::<f32>() - 0.5) * jitter;
            self.pool.spawn(Spawn {
                position: origin,
                velocity,
                color: Rgb::from_hsl(hue, 1.0, 0.5),
            });
        }
    }
}
