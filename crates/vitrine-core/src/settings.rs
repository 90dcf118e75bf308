//! Tunable parameters for each effect.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Parameters of the pointer-following particle trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    /// Whether the trail is loaded at all.
    pub enabled: bool,
    /// Fixed number of particle slots in the pool.
    pub capacity: usize,
    /// Particles respawned at the pointer every frame.
    pub batch_size: usize,
    /// Life removed from each live particle per frame.
    pub decay: f32,
    /// Velocity multiplier applied per frame.
    pub damping: f32,
    /// Exponent of the `life^k` color fade.
    pub fade_exponent: f32,
    /// Fraction of the way the tracked pointer moves toward each new target.
    pub smoothing: f32,
    /// Hue advance per frame, in turns.
    pub hue_step: f32,
    /// Width of the random hue jitter around the current hue, in turns.
    pub hue_jitter: f32,
    /// Width of the symmetric range each velocity axis is drawn from.
    pub velocity_spread: f32,
    /// Constant bias added to every spawn position.
    pub spawn_offset: [f32; 3],
    /// Point size in world units.
    pub point_size: f32,
    /// Start at `initial_position` instead of waiting for the first pointer move.
    pub early_start: bool,
    /// Early-start position in normalized device coordinates.
    pub initial_position: [f32; 2],
    /// Narrowest viewport, in pixels, on which the trail animates.
    pub min_viewport_width: u16,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self::full()
    }
}

impl TrailSettings {
    /// Dense trail: 5000 slots with slow decay.
    pub fn full() -> Self {
        Self {
            enabled: true,
            capacity: 5000,
            batch_size: 35,
            decay: 0.045,
            damping: 0.94,
            fade_exponent: 1.4,
            smoothing: 0.1,
            hue_step: 0.005,
            hue_jitter: 0.05,
            velocity_spread: 0.1,
            spawn_offset: [0.0, 0.0, 0.0],
            point_size: 0.24,
            early_start: false,
            initial_position: [0.0, 0.31],
            min_viewport_width: 40,
        }
    }

    /// Lighter trail: 1000 slots, faster decay, a snappier pointer and a
    /// small offset so particles chase the pointer instead of covering it.
    pub fn light() -> Self {
        Self {
            capacity: 1000,
            decay: 0.055,
            smoothing: 0.12,
            spawn_offset: [0.3, -0.15, 0.0],
            ..Self::full()
        }
    }

    pub fn spawn_offset(&self) -> Vec3 {
        Vec3::from_array(self.spawn_offset)
    }

    pub fn initial_position(&self) -> Vec2 {
        Vec2::from_array(self.initial_position)
    }

    /// Frames after which a slot is rewritten, whatever its remaining life.
    pub fn recycle_frames(&self) -> usize {
        self.capacity.div_ceil(self.batch_size.max(1))
    }
}

/// Parameters of the hero branch field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchSettings {
    /// Upper bound on concurrently active branches.
    pub max_branches: usize,
    /// Chance per frame of spawning one branch.
    pub spawn_chance: f32,
    /// Chance per frame that a branch picks a new direction.
    pub turn_chance: f32,
    /// Width of the symmetric range each velocity axis is drawn from.
    pub speed: f32,
    /// Minimum life budget, in frames.
    pub life_min: f32,
    /// Random extra life on top of `life_min`.
    pub life_range: f32,
    pub width_min: f32,
    pub width_range: f32,
    /// Base hue in degrees.
    pub hue_min: f32,
    pub hue_range: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Color the surface fades toward.
    pub background: [u8; 3],
    /// Opacity of the per-frame fade fill.
    pub fade_alpha: f32,
}

impl Default for BranchSettings {
    fn default() -> Self {
        Self {
            max_branches: 50,
            spawn_chance: 0.3,
            turn_chance: 0.05,
            speed: 4.0,
            life_min: 100.0,
            life_range: 200.0,
            width_min: 1.0,
            width_range: 2.0,
            hue_min: 240.0,
            hue_range: 60.0,
            saturation: 1.0,
            lightness: 0.7,
            background: [2, 2, 39],
            fade_alpha: 0.08,
        }
    }
}

impl BranchSettings {
    pub fn background(&self) -> Rgb {
        Rgb::from_u8(self.background)
    }
}

/// How page sections are revealed as they scroll into view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealPolicy {
    /// Visible fraction at or above which a section counts as in view.
    pub threshold: f32,
    /// Hide sections again when they leave the view.
    pub reversible: bool,
    /// Section ids that are never observed and always shown.
    pub excluded: Vec<String>,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            reversible: true,
            excluded: Vec::new(),
        }
    }
}

impl RevealPolicy {
    /// Reveal once and keep sections visible afterwards.
    pub fn permanent(threshold: f32) -> Self {
        Self {
            threshold,
            reversible: false,
            excluded: Vec::new(),
        }
    }

    pub fn is_excluded(&self, id: &str) -> bool {
        self.excluded.iter().any(|e| e == id)
    }
}
