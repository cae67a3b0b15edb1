// Host-side tests for pointer, wheel and pinch handling and surface hit testing.

use glam::Vec2;
use lead_core::{
    Activity, ControlState, DriftMode, GestureMode, GestureTarget, HitTarget, InteractionAdapter,
    Macro, Modifiers, SurfaceLayout,
};

const EPS: f32 = 1e-5;

fn setup() -> (InteractionAdapter, ControlState, Activity, SurfaceLayout) {
    (
        InteractionAdapter::default(),
        ControlState::with_base_positions(&[-0.55, 0.55]).unwrap(),
        Activity::default(),
        SurfaceLayout::new(1000.0, 800.0),
    )
}

#[test]
fn voice_drag_moves_pan_relative_to_grab_point() {
    let (mut ia, mut c, mut act, layout) = setup();
    let origin = Vec2::new(500.0, 300.0);
    assert!(ia.on_gesture_start(GestureTarget::Voice(1), origin, &c, &mut act, 0.0));
    assert_eq!(ia.mode(), GestureMode::VoiceDrag);
    assert_eq!(ia.gesture().and_then(|g| g.voice_index()), Some(1));

    assert!(ia.on_gesture_move(Vec2::new(600.0, 300.0), &layout, &mut c, &mut act, 0.1));
    let v = c.voice(1).unwrap();
    assert!((v.pos() - 0.77).abs() < EPS);
    assert!((v.dist() - 0.30).abs() < EPS);
    // other voice untouched
    assert_eq!(c.voice(0).unwrap().pos(), -0.55);
}

#[test]
fn voice_drag_clamps_at_the_edge() {
    let (mut ia, mut c, mut act, layout) = setup();
    ia.on_gesture_start(GestureTarget::Voice(1), Vec2::new(500.0, 300.0), &c, &mut act, 0.0);
    ia.on_gesture_move(Vec2::new(800.0, 300.0), &layout, &mut c, &mut act, 0.1);
    assert_eq!(c.voice(1).unwrap().pos(), 1.0);

    // drag down far: further away, clamped
    ia.on_gesture_move(Vec2::new(500.0, 2000.0), &layout, &mut c, &mut act, 0.2);
    assert_eq!(c.voice(1).unwrap().dist(), 1.0);
}

#[test]
fn regrabbing_does_not_jump() {
    let (mut ia, mut c, mut act, layout) = setup();
    ia.on_gesture_start(GestureTarget::Voice(0), Vec2::new(100.0, 100.0), &c, &mut act, 0.0);
    ia.on_gesture_move(Vec2::new(200.0, 140.0), &layout, &mut c, &mut act, 0.1);
    ia.on_gesture_end(&mut act);
    let after_first = *c.voice(0).unwrap();

    // grab somewhere else entirely; no movement yet means no change
    ia.on_gesture_start(GestureTarget::Voice(0), Vec2::new(900.0, 700.0), &c, &mut act, 1.0);
    ia.on_gesture_move(Vec2::new(900.0, 700.0), &layout, &mut c, &mut act, 1.1);
    assert_eq!(*c.voice(0).unwrap(), after_first);
}

#[test]
fn cube_drag_up_grows_the_room() {
    let (mut ia, mut c, mut act, layout) = setup();
    ia.on_gesture_start(GestureTarget::Macro, Vec2::new(500.0, 500.0), &c, &mut act, 0.0);
    assert_eq!(ia.mode(), GestureMode::MacroDrag);
    ia.on_gesture_move(Vec2::new(500.0, 450.0), &layout, &mut c, &mut act, 0.1);
    assert!((c.room() - 0.65).abs() < EPS);

    ia.on_gesture_move(Vec2::new(500.0, -5000.0), &layout, &mut c, &mut act, 0.2);
    assert_eq!(c.room(), 1.0);
}

#[test]
fn gesture_holds_override_until_released() {
    let (mut ia, mut c, mut act, layout) = setup();
    ia.on_gesture_start(GestureTarget::Macro, Vec2::ZERO, &c, &mut act, 0.0);
    ia.on_gesture_move(Vec2::new(0.0, 10.0), &layout, &mut c, &mut act, 0.05);
    assert_eq!(act.mode(5.0), DriftMode::InteractionOverride);
    ia.on_gesture_end(&mut act);
    assert_eq!(ia.mode(), GestureMode::None);
    assert_eq!(act.mode(5.0), DriftMode::IdleDrift);
}

#[test]
fn move_without_gesture_is_ignored() {
    let (mut ia, mut c, mut act, layout) = setup();
    let before = c.clone();
    assert!(!ia.on_gesture_move(Vec2::new(10.0, 10.0), &layout, &mut c, &mut act, 0.0));
    assert_eq!(c, before);
    assert_eq!(act.last_active(), None);
}

#[test]
fn unknown_voice_is_rejected() {
    let (mut ia, c, mut act, _) = setup();
    assert!(!ia.on_gesture_start(GestureTarget::Voice(7), Vec2::ZERO, &c, &mut act, 0.0));
    assert_eq!(ia.mode(), GestureMode::None);
    assert!(!act.is_held());
}

#[test]
fn wheel_routes_by_modifier() {
    let (mut ia, mut c, mut act, _) = setup();
    ia.on_wheel(90.0, Modifiers::default(), &mut c, &mut act, 0.0);
    assert!((c.distance() - 0.45).abs() < EPS);

    ia.on_wheel(90.0, Modifiers { ctrl: false, shift: true }, &mut c, &mut act, 0.1);
    assert!((c.motion() - 0.25).abs() < EPS);

    ia.on_wheel(90.0, Modifiers { ctrl: true, shift: true }, &mut c, &mut act, 0.2);
    assert!((c.room() - 0.45).abs() < EPS);
    assert_eq!(act.last_active(), Some(0.2));
}

#[test]
fn wheel_delta_is_clamped() {
    let (mut ia, mut c, mut act, _) = setup();
    ia.on_wheel(1000.0, Modifiers::default(), &mut c, &mut act, 0.0);
    assert!((c.distance() - (0.35 + 160.0 / 900.0)).abs() < EPS);
}

#[test]
fn pinch_scales_room_from_its_start_value() {
    let (mut ia, mut c, mut act, _) = setup();
    ia.on_pinch_start(&c, &mut act, 0.0);
    ia.on_pinch_change(1.5, &mut c, &mut act, 0.1);
    assert!((c.room() - 0.875).abs() < EPS);
    // cumulative scale, not incremental
    ia.on_pinch_change(1.5, &mut c, &mut act, 0.2);
    assert!((c.room() - 0.875).abs() < EPS);

    ia.on_pinch_change(5.0, &mut c, &mut act, 0.3);
    assert_eq!(c.room(), 1.0);

    ia.on_pinch_change(f32::NAN, &mut c, &mut act, 0.4);
    assert!((c.room() - 0.55).abs() < EPS);
    ia.on_pinch_end(&mut act, 0.5);
    assert_eq!(act.last_active(), Some(0.5));
}

#[test]
fn hit_test_finds_actors_then_cube() {
    let (_, c, _, layout) = setup();
    assert_eq!(
        layout.hit_test(&c, 0.0, Vec2::new(720.0, 246.4)),
        Some(HitTarget::Actor(1))
    );
    assert_eq!(
        layout.hit_test(&c, 0.0, Vec2::new(280.0, 250.0)),
        Some(HitTarget::Actor(0))
    );
    assert_eq!(
        layout.hit_test(&c, 0.0, Vec2::new(500.0, 496.0)),
        Some(HitTarget::Cube)
    );
    assert_eq!(layout.hit_test(&c, 0.0, Vec2::new(10.0, 10.0)), None);
}

#[test]
fn cube_rect_is_centred_low_on_the_surface() {
    let layout = SurfaceLayout::new(1000.0, 800.0);
    let r = layout.cube_rect();
    assert!((r.size.x - 176.0).abs() < EPS);
    assert!(r.center().abs_diff_eq(Vec2::new(500.0, 496.0), 1e-3));
}

#[test]
fn degenerate_surface_does_not_divide_by_zero() {
    let (mut ia, mut c, mut act, _) = setup();
    let layout = SurfaceLayout::new(0.0, 0.0);
    ia.on_gesture_start(GestureTarget::Macro, Vec2::ZERO, &c, &mut act, 0.0);
    ia.on_gesture_move(Vec2::new(0.0, -0.1), &layout, &mut c, &mut act, 0.1);
    assert!(c.get(Macro::Room).is_finite());
}
