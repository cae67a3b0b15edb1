// Host-side tests for the session context and the diagnostics log.

use glam::Vec2;
use lead_core::diagnostics::format_stamp;
use lead_core::{
    AudioEnergyReading, DebugLog, DriftMode, GestureMode, HitTarget, Macro, Modifiers, Session,
    SessionConfig, StartupError, SurfaceLayout,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME: f64 = 1.0 / 60.0;

#[test]
fn default_session_has_two_voices() {
    let s = Session::new(SessionConfig::default()).unwrap();
    assert_eq!(s.controls().voice_count(), 2);
    assert_eq!(s.config().stems[0].name, "DRUM");
    assert_eq!(s.controls().voice(0).unwrap().pos(), -0.55);
    assert_eq!(s.drift_mode(0.0), DriftMode::IdleDrift);
}

#[test]
fn session_without_stems_fails_to_start() {
    let cfg = SessionConfig {
        stems: Vec::new(),
        ..Default::default()
    };
    assert!(matches!(Session::new(cfg), Err(StartupError::NoVoices)));
}

#[test]
fn ir_uses_the_configured_length() {
    let s = Session::new(SessionConfig::default()).unwrap();
    let ir = s.synthesize_ir(8000.0, &mut StdRng::seed_from_u64(3));
    assert_eq!(ir.len(), 24_000);
}

#[test]
fn ticks_advance_phase_and_map_every_voice() {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    let e = AudioEnergyReading::new(0.2, 0.2, 0.2, 0.2);
    let mut last_phase = 0.0;
    for i in 0..30 {
        let f = s.tick(i as f64 * FRAME, e);
        assert!(f.phase > last_phase);
        assert!(f.drifting);
        assert_eq!(f.params.voices.len(), 2);
        last_phase = f.phase;
    }
    assert_eq!(s.phase(), last_phase);
}

#[test]
fn pointer_gesture_suspends_drift_and_moves_the_voice() {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    let layout = SurfaceLayout::new(1000.0, 800.0);
    let e = AudioEnergyReading::default();

    // phase 0 before the first tick, so the actor sits at its rest position
    let hit = s.pointer_down(Vec2::new(720.0, 246.4), &layout, 0.0);
    assert_eq!(hit, Some(HitTarget::Actor(1)));
    assert_eq!(s.gesture_mode(), GestureMode::VoiceDrag);

    assert!(s.pointer_move(Vec2::new(620.0, 246.4), &layout, 0.1));
    let pos = s.controls().voice(1).unwrap().pos();
    assert!((pos - 0.33).abs() < 1e-5);

    let f = s.tick(0.2, e);
    assert!(!f.drifting);
    assert_eq!(s.controls().voice(1).unwrap().pos(), pos);

    s.pointer_up();
    assert_eq!(s.gesture_mode(), GestureMode::None);
    assert!(!s.tick(0.3, e).drifting);
    assert!(s.tick(1.0, e).drifting);
}

#[test]
fn pointer_down_on_empty_space_starts_nothing() {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    let layout = SurfaceLayout::new(1000.0, 800.0);
    assert_eq!(s.pointer_down(Vec2::new(5.0, 5.0), &layout, 0.0), None);
    assert_eq!(s.gesture_mode(), GestureMode::None);
    assert_eq!(s.drift_mode(0.0), DriftMode::IdleDrift);
}

#[test]
fn wheel_and_pinch_go_through_the_session() {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    s.wheel(90.0, Modifiers::default(), 0.0);
    assert!((s.controls().distance() - 0.45).abs() < 1e-5);
    s.pinch_start(0.1);
    s.pinch_change(1.5, 0.2);
    assert!((s.controls().room() - 0.875).abs() < 1e-5);
    s.pinch_end(0.3);
    assert_eq!(s.drift_mode(0.4), DriftMode::InteractionOverride);
    assert_eq!(s.drift_mode(1.0), DriftMode::IdleDrift);
}

#[test]
fn debug_log_keeps_only_the_newest_lines() {
    let mut log = DebugLog::with_capacity(3);
    assert!(log.is_empty());
    for i in 0..5 {
        log.push(3661 + i, format!("line {i}"));
    }
    assert_eq!(log.len(), 3);
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines[0], "[01:01:03] line 2");
    assert_eq!(lines[2], "[01:01:05] line 4");
    assert_eq!(log.render().lines().count(), 3);
    log.clear();
    assert!(log.is_empty());
}

#[test]
fn stamps_wrap_at_midnight() {
    assert_eq!(format_stamp(0), "00:00:00");
    assert_eq!(format_stamp(3661), "01:01:01");
    assert_eq!(format_stamp(86_400 + 59), "00:00:59");
}

fn session_with_far_voice(distance: f32) -> Session {
    let mut s = Session::new(SessionConfig::default()).unwrap();
    let c = s.controls_mut();
    c.set(Macro::Room, 0.55);
    c.set(Macro::Distance, distance);
    c.set(Macro::Motion, 0.35);
    c.voice_mut(0).unwrap().set_dist(0.1);
    c.voice_mut(1).unwrap().set_dist(0.9);
    // a touch holds drift off so the first tick maps these values as set
    s.pinch_start(0.0);
    s.pinch_end(0.0);
    s
}

#[test]
fn far_voice_feeds_the_room_and_distance_costs_headroom() {
    let e = AudioEnergyReading::new(0.9, 0.4, 0.1, 0.5);
    let frame = session_with_far_voice(0.35).tick(0.0, e);
    assert!(!frame.drifting);
    let near = &frame.params.voices[0];
    let far = &frame.params.voices[1];
    assert!(far.send_gain > near.send_gain);
    assert!(far.dry_gain < near.dry_gain);

    let baseline = session_with_far_voice(0.05).tick(0.0, e);
    assert!(frame.params.master_gain < baseline.params.master_gain);
}
