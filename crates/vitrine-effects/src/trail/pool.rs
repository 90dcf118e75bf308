//! Fixed-capacity ring buffer of trail particles.

use glam::Vec3;
use vitrine_core::Rgb;

use crate::surface::PointGeometry;

/// Position inactive particles are parked at, far outside the frustum.
pub const OFFSCREEN: Vec3 = Vec3::splat(9999.0);

/// Per-slot simulation state kept beside the render buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlotState {
    pub velocity: Vec3,
    /// Remaining life in `0.0..=1.0`; zero or less means inactive.
    pub life: f32,
}

impl SlotState {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// A particle about to be written into the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Rgb,
}

/// Ring buffer of particles.
///
/// Spawning writes the slot under the cursor and advances it, whether or
/// not that slot still holds a live particle.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    geometry: PointGeometry,
    slots: Vec<SlotState>,
    cursor: usize,
}

impl ParticlePool {
    /// Pool with every slot inactive and parked off-screen.
    pub fn new(capacity: usize) -> Self {
        Self {
            geometry: PointGeometry::new(vec![OFFSCREEN; capacity], vec![Rgb::BLACK; capacity]),
            slots: vec![SlotState::default(); capacity],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot the next spawn will overwrite.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn geometry(&self) -> &PointGeometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut PointGeometry {
        &mut self.geometry
    }

    /// Number of live particles.
    pub fn occupancy(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_alive()).count()
    }

    /// Write `spawn` at the cursor with full life and return the slot index.
    pub fn spawn(&mut self, spawn: Spawn) -> usize {
        let index = self.cursor;
        self.slots[index] = SlotState {
            velocity: spawn.velocity,
            life: 1.0,
        };
        self.geometry.positions[index] = spawn.position;
        self.geometry.colors[index] = spawn.color;
        self.cursor = (self.cursor + 1) % self.slots.len();
        index
    }

    /// Age, move and fade every live particle; park the dead ones,
    /// including those that die during this step.
    ///
    /// Colors are scaled by `life^fade_exponent` each step, so the fade
    /// compounds and most of it happens late in life.
    pub fn step(&mut self, decay: f32, damping: f32, fade_exponent: f32) {
        let positions = &mut self.geometry.positions;
        let colors = &mut self.geometry.colors;
        for ((slot, position), color) in self.slots.iter_mut().zip(positions).zip(colors) {
            if slot.is_alive() {
                slot.life -= decay;
            }
            if slot.is_alive() {
                *position += slot.velocity;
                slot.velocity *= damping;
                *color = *color * slot.life.powf(fade_exponent);
            } else {
                *position = OFFSCREEN;
                *color = Rgb::BLACK;
            }
        }
        self.geometry.mark_dirty();
    }
}
