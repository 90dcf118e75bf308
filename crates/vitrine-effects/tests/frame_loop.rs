//! Drive the effects through a bounded frame loop, the way the app does.

use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use vitrine_core::{BranchSettings, CancellationToken, FrameLoop, TrailSettings};
use vitrine_effects::{
    Attach, BranchField, OFFSCREEN, PixelCanvas, TrailHost, TrailSession, Viewport,
};

const VIEWPORT: Viewport = Viewport::new(120, 60);

#[test]
fn test_effects_run_independently_for_bounded_frames() {
    let branch_settings = BranchSettings::default();
    let mut hero = PixelCanvas::filled(VIEWPORT, branch_settings.background());
    let mut field =
        BranchField::with_rng(branch_settings, VIEWPORT, StdRng::seed_from_u64(21));

    let settings = TrailSettings::light();
    let mut overlay = PixelCanvas::new(VIEWPORT);
    let mut trail = TrailHost::new();
    let attach = trail.init_with(&settings, &overlay, true, |settings, viewport| {
        TrailSession::with_rng(settings, viewport, StdRng::seed_from_u64(22))
    });
    assert_eq!(attach, Ok(Attach::Attached));

    let mut frames = FrameLoop::with_limit(CancellationToken::new(), 120);
    let total = frames
        .run(|frame| {
            if frame % 4 == 0 {
                let x = 20.0 + frame as f32 * 0.5;
                trail.on_pointer_move(Vec2::new(x, 30.0));
            }
            field.advance_frame(&mut hero);
            trail.advance_frame(&mut overlay);
            assert!(field.len() <= 50);
            Ok::<_, ()>(())
        })
        .unwrap();
    assert_eq!(total, 120);

    let session = trail.session().unwrap();
    let pool = session.pool();
    assert!(pool.occupancy() <= pool.capacity());
    let geometry = pool.geometry();
    for ((slot, position), color) in
        pool.slots().iter().zip(&geometry.positions).zip(&geometry.colors)
    {
        assert!(position.is_finite());
        if !slot.is_alive() {
            assert_eq!(*position, OFFSCREEN);
            assert!(color.is_black());
        }
    }
    // Particles live at most 1 / decay frames, so part of the pool is
    // always parked.
    let lifetime = (1.0 / settings.decay).ceil() as usize;
    assert!(pool.occupancy() <= settings.batch_size * lifetime);
    assert!(geometry.positions.iter().any(|p| *p == OFFSCREEN));
    assert!(overlay.pixels().iter().any(|p| !p.is_black()));
    assert!(hero.pixels().iter().all(|p| p.is_finite()));
}

#[test]
fn test_trail_failure_leaves_branch_field_running() {
    let mut hero = PixelCanvas::new(VIEWPORT);
    let mut field = BranchField::with_rng(
        BranchSettings {
            spawn_chance: 1.0,
            ..BranchSettings::default()
        },
        VIEWPORT,
        StdRng::seed_from_u64(4),
    );

    let broken = TrailSettings {
        capacity: 0,
        ..TrailSettings::full()
    };
    let mut overlay = PixelCanvas::new(VIEWPORT);
    let mut trail = TrailHost::new();
    assert!(trail.init(&broken, &overlay, false).is_err());

    let token = CancellationToken::new();
    let mut frames = FrameLoop::new(token.clone());
    frames
        .run(|frame| {
            field.advance_frame(&mut hero);
            trail.advance_frame(&mut overlay);
            if frame == 9 {
                token.cancel();
            }
            Ok::<_, ()>(())
        })
        .unwrap();

    assert_eq!(frames.frame(), 10);
    assert!(!field.is_empty());
    assert!(overlay.pixels().iter().all(|p| p.is_black()));
}
