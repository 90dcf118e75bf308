//! Branch field drawn behind the hero section (stateful).

use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use vitrine_core::{BranchSettings, Rgb};

use crate::surface::{Surface2d, Viewport};

/// A single wandering line.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining life in frames.
    pub life: f32,
    pub width: f32,
    pub color: Rgb,
}

impl Branch {
    /// New branch at `position` with random velocity, life, width and hue.
    pub fn random(position: Vec2, settings: &BranchSettings, rng: &mut impl Rng) -> Self {
        let hue = settings.hue_min + rng.random::<f32>() * settings.hue_range;
        Self {
            position,
            velocity: random_velocity(settings.speed, rng),
            life: settings.life_min + rng.random::<f32>() * settings.life_range,
            width: settings.width_min + rng.random::<f32>() * settings.width_range,
            color: Rgb::from_hsl(hue / 360.0, settings.saturation, settings.lightness),
        }
    }

    /// Age and move one step. Returns whether the branch is still alive.
    ///
    /// Leaving `0..=bounds` on either axis kills the branch outright.
    pub fn update(&mut self, bounds: Vec2, turn_chance: f32, speed: f32, rng: &mut impl Rng) -> bool {
        self.life -= 1.0;
        if rng.random::<f32>() < turn_chance {
            self.velocity = random_velocity(speed, rng);
        }
        self.position += self.velocity;
        let inside = self.position.cmpge(Vec2::ZERO).all() && self.position.cmple(bounds).all();
        if !inside {
            self.life = 0.0;
        }
        self.life > 0.0
    }

    /// Segment covered by the last step.
    pub fn segment(&self) -> (Vec2, Vec2) {
        (self.position - self.velocity, self.position)
    }
}

fn random_velocity(speed: f32, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * speed,
        (rng.random::<f32>() - 0.5) * speed,
    )
}

/// Bounded set of branches over a fading surface.
#[derive(Debug)]
pub struct BranchField {
    settings: BranchSettings,
    branches: Vec<Branch>,
    bounds: Vec2,
    rng: StdRng,
}

impl BranchField {
    pub fn new(settings: BranchSettings, viewport: Viewport) -> Self {
        Self::with_rng(settings, viewport, StdRng::from_os_rng())
    }

    pub fn with_rng(settings: BranchSettings, viewport: Viewport, rng: StdRng) -> Self {
        let branches = Vec::with_capacity(settings.max_branches);
        Self {
            settings,
            branches,
            bounds: viewport.size(),
            rng,
        }
    }

    pub fn settings(&self) -> &BranchSettings {
        &self.settings
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Add a branch if below capacity. Returns whether it was added.
    pub fn push(&mut self, branch: Branch) -> bool {
        if self.branches.len() >= self.settings.max_branches {
            return false;
        }
        self.branches.push(branch);
        true
    }

    /// Track a new surface size. Existing branches keep running and are
    /// culled against the new bounds on their next step.
    pub fn resize(&mut self, viewport: Viewport) {
        self.bounds = viewport.size();
    }

    /// Fade the surface, maybe spawn a branch, then step and draw every
    /// branch, dropping the ones that died.
    pub fn advance_frame(&mut self, surface: &mut impl Surface2d) {
        let settings = &self.settings;
        surface.fill_rect(Vec2::ZERO, self.bounds, settings.background(), settings.fade_alpha);

        if self.branches.len() < settings.max_branches
            && self.rng.random::<f32>() < settings.spawn_chance
        {
            let position = Vec2::new(
                self.rng.random::<f32>() * self.bounds.x,
                self.rng.random::<f32>() * self.bounds.y,
            );
            let branch = Branch::random(position, settings, &mut self.rng);
            self.branches.push(branch);
        }

        for i in (0..self.branches.len()).rev() {
            let branch = &mut self.branches[i];
            if branch.update(self.bounds, settings.turn_chance, settings.speed, &mut self.rng) {
                let (from, to) = branch.segment();
                surface.stroke_line(from, to, branch.color, branch.width);
            } else {
                self.branches.swap_remove(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelCanvas;

    /// Surface that records draw calls.
    #[derive(Default)]
    struct Recorder {
        viewport: Viewport,
        fills: Vec<(Vec2, Vec2, Rgb, f32)>,
        strokes: Vec<(Vec2, Vec2)>,
    }

    impl Surface2d for Recorder {
        fn size(&self) -> Viewport {
            self.viewport
        }

        fn resize(&mut self, viewport: Viewport) {
            self.viewport = viewport;
        }

        fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgb, alpha: f32) {
            self.fills.push((origin, extent, color, alpha));
        }

        fn stroke_line(&mut self, from: Vec2, to: Vec2, _color: Rgb, _width: f32) {
            self.strokes.push((from, to));
        }
    }

    fn field(settings: BranchSettings) -> BranchField {
        BranchField::with_rng(settings, Viewport::new(100, 100), StdRng::seed_from_u64(11))
    }

    fn quiet() -> BranchSettings {
        BranchSettings {
            spawn_chance: 0.0,
            turn_chance: 0.0,
            ..BranchSettings::default()
        }
    }

    fn branch(position: Vec2, velocity: Vec2) -> Branch {
        Branch {
            position,
            velocity,
            life: 50.0,
            width: 1.0,
            color: Rgb::new(0.5, 0.5, 1.0),
        }
    }

    #[test]
    fn test_exit_removes_same_frame() {
        let mut field = field(quiet());
        field.push(branch(Vec2::new(10.0, 10.0), Vec2::new(-20.0, -20.0)));
        let mut surface = Recorder::default();
        field.advance_frame(&mut surface);
        assert!(field.is_empty());
        assert!(surface.strokes.is_empty());
    }

    #[test]
    fn test_live_branch_draws_last_step() {
        let mut field = field(quiet());
        field.push(branch(Vec2::new(10.0, 10.0), Vec2::new(2.0, -1.0)));
        let mut surface = Recorder::default();
        field.advance_frame(&mut surface);

        assert_eq!(field.len(), 1);
        assert_eq!(field.branches()[0].position, Vec2::new(12.0, 9.0));
        assert_eq!(field.branches()[0].life, 49.0);
        assert_eq!(surface.strokes, vec![(Vec2::new(10.0, 10.0), Vec2::new(12.0, 9.0))]);
    }

    #[test]
    fn test_fade_covers_surface() {
        let mut field = field(quiet());
        let mut surface = Recorder::default();
        field.advance_frame(&mut surface);
        let (origin, extent, color, alpha) = surface.fills[0];
        assert_eq!(origin, Vec2::ZERO);
        assert_eq!(extent, Vec2::new(100.0, 100.0));
        assert_eq!(color, Rgb::from_u8([2, 2, 39]));
        assert_eq!(alpha, 0.08);
    }

    #[test]
    fn test_life_budget_expires() {
        let mut field = field(quiet());
        let mut short = branch(Vec2::new(50.0, 50.0), Vec2::ZERO);
        short.life = 2.0;
        field.push(short);
        let mut surface = Recorder::default();
        field.advance_frame(&mut surface);
        assert_eq!(field.len(), 1);
        field.advance_frame(&mut surface);
        assert!(field.is_empty());
    }

    #[test]
    fn test_population_stays_bounded() {
        let mut field = field(BranchSettings {
            spawn_chance: 1.0,
            speed: 0.0,
            ..BranchSettings::default()
        });
        let mut surface = Recorder::default();
        for _ in 0..80 {
            field.advance_frame(&mut surface);
            assert!(field.len() <= 50);
        }
        assert_eq!(field.len(), 50);
        assert!(!field.push(branch(Vec2::ONE, Vec2::ZERO)));
    }

    #[test]
    fn test_branches_stay_in_bounds() {
        let mut field = field(BranchSettings::default());
        let mut canvas = PixelCanvas::new(Viewport::new(100, 100));
        for _ in 0..500 {
            field.advance_frame(&mut canvas);
            for branch in field.branches() {
                assert!((0.0..=100.0).contains(&branch.position.x));
                assert!((0.0..=100.0).contains(&branch.position.y));
                assert!(branch.life > 0.0);
            }
        }
    }

    #[test]
    fn test_random_branch_ranges() {
        let settings = BranchSettings::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let branch = Branch::random(Vec2::ZERO, &settings, &mut rng);
            assert!((100.0..300.0).contains(&branch.life));
            assert!((1.0..3.0).contains(&branch.width));
            assert!(branch.velocity.abs().max_element() <= 2.0);
            // Blue to magenta hues keep the blue channel at full strength.
            assert!((branch.color.b - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_resize_culls_against_new_bounds() {
        let mut field = field(quiet());
        field.push(branch(Vec2::new(80.0, 80.0), Vec2::new(1.0, 1.0)));
        field.resize(Viewport::new(40, 40));
        let mut surface = Recorder::default();
        field.advance_frame(&mut surface);
        assert!(field.is_empty());
        assert_eq!(surface.fills[0].1, Vec2::new(40.0, 40.0));
    }
}
