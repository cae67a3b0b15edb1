// Host-side tests for the idle drift engine and its interaction override.

use lead_core::drift::voice_phase_offset;
use lead_core::{
    Activity, AudioEnergyReading, ControlState, DriftEngine, DriftInput, DriftMode, Macro,
};

const FRAME: f64 = 1.0 / 60.0;

fn controls() -> ControlState {
    ControlState::with_base_positions(&[-0.55, 0.55]).unwrap()
}

fn input(frame: u32, energy: AudioEnergyReading) -> DriftInput {
    let now = frame as f64 * FRAME;
    DriftInput {
        now,
        dt: FRAME,
        phase: 1.0 + frame as f64 * 0.02,
        energy,
    }
}

#[test]
fn idle_session_drifts() {
    let mut c = controls();
    let before = c.clone();
    let mut engine = DriftEngine::default();
    let activity = Activity::default();
    let e = AudioEnergyReading::new(0.3, 0.3, 0.3, 0.3);
    for f in 0..120 {
        assert!(engine.apply_drift(&mut c, &activity, &input(f, e)));
    }
    assert_eq!(engine.mode(), DriftMode::IdleDrift);
    assert_ne!(c, before);
    assert_ne!(c.distance(), before.distance());
    assert_ne!(c.room(), before.room());
}

#[test]
fn continuous_interaction_suppresses_all_drift() {
    let mut c = controls();
    let before = c.clone();
    let mut engine = DriftEngine::default();
    let mut activity = Activity::default();
    let e = AudioEnergyReading::new(0.8, 0.8, 0.8, 0.8);
    for f in 0..300 {
        let inp = input(f, e);
        activity.mark_active(inp.now);
        assert!(!engine.apply_drift(&mut c, &activity, &inp));
    }
    assert_eq!(engine.mode(), DriftMode::InteractionOverride);
    assert_eq!(c, before);
}

#[test]
fn held_gesture_overrides_until_idle_threshold_after_release() {
    let mut activity = Activity::new(0.35);
    assert_eq!(activity.mode(0.0), DriftMode::IdleDrift);

    activity.hold(0.0);
    assert!(activity.is_held());
    assert_eq!(activity.mode(10.0), DriftMode::InteractionOverride);

    activity.mark_active(10.0);
    activity.release();
    assert_eq!(activity.mode(10.2), DriftMode::InteractionOverride);
    assert_eq!(activity.mode(10.4), DriftMode::IdleDrift);
}

#[test]
fn drift_resumes_without_resetting_controls() {
    let mut c = controls();
    let mut engine = DriftEngine::default();
    let mut activity = Activity::default();
    activity.mark_active(0.0);
    c.set(Macro::Room, 0.9);

    let e = AudioEnergyReading::default();
    let mut inp = input(0, e);
    inp.now = 0.1;
    assert!(!engine.apply_drift(&mut c, &activity, &inp));
    assert_eq!(c.room(), 0.9);

    inp.now = 1.0;
    assert!(engine.apply_drift(&mut c, &activity, &inp));
    // one frame of drift moves by a tiny amount from where the user left it
    assert!((c.room() - 0.9).abs() < 0.01);
}

#[test]
fn drift_keeps_everything_in_range() {
    let mut c = controls();
    for m in [Macro::Room, Macro::Distance, Macro::Motion, Macro::Focus] {
        c.set(m, 1.0);
    }
    let mut engine = DriftEngine::default();
    let activity = Activity::default();
    for (i, e) in [
        AudioEnergyReading::new(1.0, 1.0, 1.0, 1.0),
        AudioEnergyReading::default(),
    ]
    .into_iter()
    .enumerate()
    {
        for f in 0..5000 {
            let mut inp = input(f, e);
            inp.dt = 0.25;
            inp.phase += i as f64 * 100.0;
            engine.apply_drift(&mut c, &activity, &inp);
            for m in [Macro::Room, Macro::Distance, Macro::Motion, Macro::Focus] {
                assert!((0.0..=1.0).contains(&c.get(m)));
            }
            for v in c.voices() {
                assert!((-1.0..=1.0).contains(&v.pos()));
                for x in [v.dist(), v.width(), v.motion(), v.focus()] {
                    assert!((0.0..=1.0).contains(&x));
                }
            }
        }
    }
}

#[test]
fn long_frame_gaps_are_clamped() {
    let e = AudioEnergyReading::default();
    let activity = Activity::default();

    let mut a = controls();
    let mut inp = input(10, e);
    inp.dt = 0.25;
    DriftEngine::default().apply_drift(&mut a, &activity, &inp);

    let mut b = controls();
    inp.dt = 30.0;
    DriftEngine::default().apply_drift(&mut b, &activity, &inp);

    assert_eq!(a, b);
}

#[test]
fn voices_drift_out_of_step() {
    assert_eq!(voice_phase_offset(0), -1.0);
    assert_eq!(voice_phase_offset(1), 1.0);

    let mut c = controls();
    let mut engine = DriftEngine::default();
    let mut inp = input(0, AudioEnergyReading::default());
    inp.phase = 1.0;
    engine.apply_drift(&mut c, &Activity::default(), &inp);
    let w0 = c.voice(0).unwrap().width();
    let w1 = c.voice(1).unwrap().width();
    assert!((w0 - w1).abs() > 0.05, "widths {w0} and {w1} moved in lockstep");
}

// Phase pinned at zero: the sine terms vanish, so only the energy terms differ between runs
fn drift_at_phase_zero(energy: AudioEnergyReading, frames: u32) -> ControlState {
    let mut c = controls();
    let mut engine = DriftEngine::default();
    let activity = Activity::default();
    for f in 0..frames {
        let inp = DriftInput {
            now: f as f64 * FRAME,
            dt: FRAME,
            phase: 0.0,
            energy,
        };
        assert!(engine.apply_drift(&mut c, &activity, &inp));
    }
    c
}

#[test]
fn macros_follow_their_energy_bands() {
    let quiet = drift_at_phase_zero(AudioEnergyReading::new(0.0, 0.0, 0.0, 0.0), 200);
    let loud = drift_at_phase_zero(AudioEnergyReading::new(1.0, 1.0, 1.0, 1.0), 200);
    assert!(loud.room() > quiet.room(), "bass -> room");
    assert!(loud.distance() > quiet.distance(), "rms -> distance");
    assert!(loud.motion() > quiet.motion(), "high -> motion");
    assert!(loud.focus() > quiet.focus(), "mid -> focus");

    // below baseline pulls down
    let start = controls();
    assert!(quiet.room() < start.room());
    assert!(quiet.distance() < start.distance());
    assert!(quiet.focus() < start.focus());
}

#[test]
fn energy_at_baseline_leaves_sine_driven_macros_still() {
    // bass 0.10, mid 0.12, rms 0.08 sit exactly on their baselines
    let c = drift_at_phase_zero(AudioEnergyReading::new(0.10, 0.12, 0.12, 0.08), 120);
    let start = controls();
    assert_eq!(c.room(), start.room());
    assert_eq!(c.distance(), start.distance());
    assert_eq!(c.focus(), start.focus());
    // motion rides a cosine, which is at its peak at phase zero
    assert!(c.motion() > start.motion());
}
