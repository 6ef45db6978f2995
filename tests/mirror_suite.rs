use glam::Vec2;
use kaleidoscope_tui::mirror::{
    Gesture, InteractionConfig, MAX_FOLDS, MAX_MIRROR_POINTS, MIN_FOLDS, MirrorPoint,
    MirrorPointSystem, MirrorSet, PointerOutcome,
};
use std::time::{Duration, Instant};

/// 200x100 px viewport with the default (pointer-device) thresholds.
fn system() -> MirrorPointSystem {
    let mut sys = MirrorPointSystem::new(InteractionConfig::default());
    sys.set_viewport(200.0, 100.0);
    sys
}

/// Long-press at `pos` and let the timer fire.
fn place(sys: &mut MirrorPointSystem, pos: Vec2, t0: Instant) -> Option<usize> {
    sys.pointer_down(pos, t0);
    let idx = sys.tick(t0 + Duration::from_millis(520));
    sys.pointer_up();
    idx
}

fn assert_close(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "expected {b}, got {a}");
}

// ── long press ──────────────────────────────────────────────────────────────

#[test]
fn long_press_creates_point_after_threshold() {
    let mut sys = system();
    let t0 = Instant::now();
    assert_eq!(
        sys.pointer_down(Vec2::new(150.0, 25.0), t0),
        PointerOutcome::LongPressArmed
    );
    assert_eq!(sys.tick(t0 + Duration::from_millis(400)), None);
    assert!(sys.points().is_empty());

    assert_eq!(sys.tick(t0 + Duration::from_millis(500)), Some(0));
    let p = sys.points()[0];
    assert_close(p.x, 0.5, 1e-6);
    assert_close(p.y, 0.5, 1e-6);
    assert_eq!(p.folds, 6);
    assert_eq!(p.rotation, 0.0);
    assert!(p.is_pre_mirror);
    assert_eq!(sys.active(), Some(0));
    assert_eq!(sys.gesture(), Gesture::Idle);
}

#[test]
fn early_release_cancels_long_press() {
    let mut sys = system();
    let t0 = Instant::now();
    sys.pointer_down(Vec2::new(60.0, 60.0), t0);
    sys.pointer_up();
    assert_eq!(sys.tick(t0 + Duration::from_secs(2)), None);
    assert!(sys.points().is_empty());
}

#[test]
fn moving_away_cancels_long_press() {
    let mut sys = system();
    let t0 = Instant::now();
    sys.pointer_down(Vec2::new(60.0, 60.0), t0);
    sys.pointer_move(Vec2::new(62.0, 61.0));
    assert!(matches!(sys.gesture(), Gesture::PendingCreate { .. }));
    sys.pointer_move(Vec2::new(90.0, 60.0));
    assert_eq!(sys.gesture(), Gesture::Idle);
    assert_eq!(sys.tick(t0 + Duration::from_secs(1)), None);
}

#[test]
fn at_most_four_points() {
    let mut sys = system();
    let t0 = Instant::now();
    for pos in [(20.0, 20.0), (180.0, 20.0), (20.0, 80.0), (180.0, 80.0)] {
        assert!(place(&mut sys, Vec2::new(pos.0, pos.1), t0).is_some());
    }
    assert_eq!(sys.points().len(), MAX_MIRROR_POINTS);
    assert!(sys.is_full());
    assert_eq!(place(&mut sys, Vec2::new(100.0, 50.0), t0), None);
    assert_eq!(sys.points().len(), MAX_MIRROR_POINTS);
}

// ── drag and rotate ─────────────────────────────────────────────────────────

#[test]
fn drag_moves_point_and_clamps_to_unit_square() {
    let mut sys = system();
    let t0 = Instant::now();
    place(&mut sys, Vec2::new(150.0, 25.0), t0);

    assert_eq!(
        sys.pointer_down(Vec2::new(152.0, 25.0), t0),
        PointerOutcome::Selected(0)
    );
    sys.pointer_move(Vec2::new(50.0, 75.0));
    let p = sys.points()[0];
    assert_close(p.x, -0.5, 1e-6);
    assert_close(p.y, -0.5, 1e-6);

    sys.pointer_move(Vec2::new(-100.0, 500.0));
    let p = sys.points()[0];
    assert_eq!((p.x, p.y), (-1.0, -1.0));

    sys.pointer_up();
    assert_eq!(sys.gesture(), Gesture::Idle);
}

#[test]
fn ring_drag_rotates_active_point() {
    let mut sys = system();
    let t0 = Instant::now();
    place(&mut sys, Vec2::new(150.0, 25.0), t0);

    assert_eq!(
        sys.pointer_down(Vec2::new(190.0, 25.0), t0),
        PointerOutcome::RotateStarted(0)
    );
    assert_close(sys.points()[0].rotation, 0.0, 1e-3);
    sys.pointer_move(Vec2::new(150.0, 65.0));
    assert_close(sys.points()[0].rotation, 90.0, 1e-3);
    sys.pointer_move(Vec2::new(110.0, 25.0));
    assert_close(sys.points()[0].rotation, 180.0, 1e-3);
    sys.pointer_move(Vec2::new(150.0, -15.0));
    assert_close(sys.points()[0].rotation, 270.0, 1e-3);
    sys.pointer_up();

    // Position is untouched by rotation.
    assert_close(sys.points()[0].x, 0.5, 1e-6);
}

#[test]
fn nearest_point_wins_ties() {
    let mut sys = system();
    sys.insert(MirrorPoint::new(0.0, 0.0));
    sys.insert(MirrorPoint::new(0.1, 0.0));
    // Screen positions are (100, 50) and (110, 50).
    let (idx, dist) = sys.nearest(Vec2::new(108.0, 50.0)).expect("in range");
    assert_eq!(idx, 1);
    assert_close(dist, 2.0, 1e-4);
    assert_eq!(sys.nearest(Vec2::new(0.0, 0.0)), None);
}

#[test]
fn hover_tracks_pointer() {
    let mut sys = system();
    sys.insert(MirrorPoint::new(0.0, 0.0));
    sys.pointer_move(Vec2::new(101.0, 50.0));
    assert_eq!(sys.hover(), Some(0));
    sys.pointer_move(Vec2::new(10.0, 10.0));
    assert_eq!(sys.hover(), None);
}

// ── wheel, delete, flags ────────────────────────────────────────────────────

#[test]
fn wheel_over_active_point_adjusts_folds_with_clamp() {
    let mut sys = system();
    let t0 = Instant::now();
    place(&mut sys, Vec2::new(100.0, 50.0), t0);
    let at = Vec2::new(101.0, 50.0);

    assert!(sys.wheel(at, 1));
    assert_eq!(sys.points()[0].folds, 7);
    for _ in 0..30 {
        sys.wheel(at, 1);
    }
    assert_eq!(sys.points()[0].folds, MAX_FOLDS);
    for _ in 0..30 {
        sys.wheel(at, -3);
    }
    assert_eq!(sys.points()[0].folds, MIN_FOLDS);

    assert!(!sys.wheel(Vec2::new(0.0, 0.0), 1));
    assert_eq!(sys.points()[0].folds, MIN_FOLDS);
}

#[test]
fn wheel_without_active_point_is_not_consumed() {
    let mut sys = system();
    sys.insert(MirrorPoint::new(0.0, 0.0));
    assert!(!sys.wheel(Vec2::new(100.0, 50.0), 1));
}

#[test]
fn delete_keeps_order_of_remaining_points() {
    let mut sys = system();
    let t0 = Instant::now();
    place(&mut sys, Vec2::new(20.0, 20.0), t0);
    place(&mut sys, Vec2::new(100.0, 50.0), t0);
    place(&mut sys, Vec2::new(180.0, 80.0), t0);

    assert_eq!(
        sys.pointer_down(Vec2::new(100.0, 50.0), t0),
        PointerOutcome::Selected(1)
    );
    sys.pointer_up();
    let removed = sys.delete_active().expect("active point");
    assert_close(removed.x, 0.0, 1e-6);
    assert_eq!(sys.active(), None);

    let snap = sys.snapshot();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap.as_slice()[0], sys.points()[0].position());
    assert!(snap.as_slice()[0].x < snap.as_slice()[1].x);
    assert_eq!(sys.delete_active(), None);
}

#[test]
fn space_toggle_flips_pre_mirror_flag() {
    let mut sys = system();
    assert_eq!(sys.toggle_pre_mirror(), None);
    place(&mut sys, Vec2::new(100.0, 50.0), Instant::now());
    assert_eq!(sys.toggle_pre_mirror(), Some(false));
    assert!(!sys.points()[0].is_pre_mirror);
    assert_eq!(sys.toggle_pre_mirror(), Some(true));
}

// ── keyboard edits ──────────────────────────────────────────────────────────

#[test]
fn add_point_selects_new_point_until_full() {
    let mut sys = system();
    assert_eq!(sys.add_point(MirrorPoint::new(0.0, 0.0)), Some(0));
    assert_eq!(sys.active(), Some(0));
    assert_eq!(sys.add_point(MirrorPoint::new(0.5, 0.5)), Some(1));
    assert_eq!(sys.active(), Some(1));
    for _ in 2..MAX_MIRROR_POINTS {
        sys.add_point(MirrorPoint::new(0.1, 0.1));
    }
    assert_eq!(sys.add_point(MirrorPoint::new(0.2, 0.2)), None);
    assert_eq!(sys.active(), Some(MAX_MIRROR_POINTS - 1));
}

#[test]
fn nudge_moves_active_point_and_clamps() {
    let mut sys = system();
    assert_eq!(sys.nudge_active(Vec2::new(0.05, 0.0)), None);

    sys.add_point(MirrorPoint::new(0.0, 0.0));
    let p = sys.nudge_active(Vec2::new(0.05, -0.05)).expect("active point");
    assert_close(p.x, 0.05, 1e-6);
    assert_close(p.y, -0.05, 1e-6);

    sys.nudge_active(Vec2::new(5.0, -5.0));
    assert_eq!(sys.points()[0].position(), Vec2::new(1.0, -1.0));
}

#[test]
fn keyboard_folds_and_rotation_edit_active_point() {
    let mut sys = system();
    assert_eq!(sys.adjust_active_folds(1), None);
    assert_eq!(sys.rotate_active(15.0), None);

    sys.add_point(MirrorPoint::new(0.3, 0.3));
    assert_eq!(sys.adjust_active_folds(1), Some(7));
    assert_eq!(sys.adjust_active_folds(-3), Some(6));
    for _ in 0..20 {
        sys.adjust_active_folds(1);
    }
    assert_eq!(sys.points()[0].folds, MAX_FOLDS);

    assert_eq!(sys.rotate_active(-15.0), Some(345.0));
    assert_eq!(sys.rotate_active(30.0), Some(15.0));
}

// ── coordinates and snapshots ───────────────────────────────────────────────

#[test]
fn screen_and_shader_coordinates_invert() {
    let sys = system();
    assert_eq!(sys.screen_to_shader(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
    assert_eq!(sys.screen_to_shader(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -1.0));
    for p in [Vec2::new(13.0, 77.0), Vec2::new(199.0, 1.0)] {
        let back = sys.shader_to_screen(sys.screen_to_shader(p));
        assert!(back.distance(p) < 1e-3);
    }
}

#[test]
fn sanitize_clamps_loaded_points() {
    let p = MirrorPoint {
        x: 3.0,
        y: f32::NAN,
        rotation: -90.0,
        folds: 40,
        is_pre_mirror: false,
    }
    .sanitized();
    assert_eq!((p.x, p.y), (1.0, 0.0));
    assert_close(p.rotation, 270.0, 1e-4);
    assert_eq!(p.folds, MAX_FOLDS);
    assert!(!p.is_pre_mirror);
}

#[test]
fn snapshot_truncates_to_capacity() {
    let points: Vec<MirrorPoint> = (0..6)
        .map(|i| MirrorPoint::new(i as f32 * 0.1, 0.2))
        .collect();
    let set = MirrorSet::from_points(&points);
    assert_eq!(set.len(), MAX_MIRROR_POINTS);
    assert_close(set.as_slice()[3].x, 0.3, 1e-6);
    assert!(MirrorSet::default().is_empty());
}

#[test]
fn insert_refuses_when_full() {
    let mut sys = system();
    for i in 0..MAX_MIRROR_POINTS {
        assert_eq!(sys.insert(MirrorPoint::new(i as f32 * 0.2, 0.0)), Some(i));
    }
    assert_eq!(sys.insert(MirrorPoint::new(0.9, 0.9)), None);
}
