// Host-side tests for control state clamping and construction.

use lead_core::constants::*;
use lead_core::{ControlState, Macro, StartupError, VoiceParams};

#[test]
fn defaults_match_session_start() {
    let c = ControlState::with_base_positions(&[-0.55, 0.55]).unwrap();
    assert_eq!(c.room(), DEFAULT_ROOM);
    assert_eq!(c.distance(), DEFAULT_DISTANCE);
    assert_eq!(c.motion(), DEFAULT_MOTION);
    assert_eq!(c.focus(), DEFAULT_FOCUS);
    assert_eq!(c.voice_count(), 2);
    let v = c.voice(1).unwrap();
    assert_eq!(v.pos(), 0.55);
    assert_eq!(v.level(), DEFAULT_VOICE_LEVEL);
    assert_eq!(v.dist(), DEFAULT_VOICE_DIST);
    assert!(c.voice(2).is_none());
}

#[test]
fn empty_voice_set_is_rejected() {
    let err = ControlState::new(std::iter::empty()).unwrap_err();
    assert!(matches!(err, StartupError::NoVoices));
    assert!(ControlState::with_base_positions(&[]).is_err());
}

#[test]
fn voice_setters_clamp_to_their_ranges() {
    let mut v = VoiceParams::default();
    v.set_level(5.0);
    assert_eq!(v.level(), VOICE_LEVEL_MAX);
    v.set_level(-1.0);
    assert_eq!(v.level(), 0.0);
    v.set_pos(-3.0);
    assert_eq!(v.pos(), -1.0);
    v.set_dist(1.2);
    assert_eq!(v.dist(), 1.0);
    v.set_width(-0.1);
    assert_eq!(v.width(), 0.0);
    v.set_motion(f32::INFINITY);
    assert_eq!(v.motion(), 1.0);
    v.set_focus(f32::NEG_INFINITY);
    assert_eq!(v.focus(), 0.0);
}

#[test]
fn nan_keeps_the_previous_value() {
    let mut v = VoiceParams::new(0.3);
    v.set_pos(f32::NAN);
    assert_eq!(v.pos(), 0.3);
    assert_eq!(VoiceParams::new(f32::NAN).pos(), 0.0);

    let mut c = ControlState::new([v]).unwrap();
    c.set(Macro::Room, f32::NAN);
    assert_eq!(c.room(), DEFAULT_ROOM);
}

#[test]
fn nudge_accumulates_and_clamps() {
    let mut c = ControlState::new([VoiceParams::default()]).unwrap();
    c.nudge(Macro::Distance, 0.1);
    assert!((c.get(Macro::Distance) - 0.45).abs() < 1e-6);
    c.nudge(Macro::Distance, 5.0);
    assert_eq!(c.distance(), 1.0);
    c.nudge(Macro::Focus, -5.0);
    assert_eq!(c.focus(), 0.0);
}

#[test]
fn voice_mut_cannot_escape_ranges() {
    let mut c = ControlState::with_base_positions(&[0.0, 0.0, 0.0]).unwrap();
    for v in c.voices_mut() {
        v.set_dist(9.0);
    }
    assert!(c.voices().iter().all(|v| v.dist() == 1.0));
    assert!(c.voice_mut(3).is_none());
    assert_eq!(c.voice_count(), 3);
}
