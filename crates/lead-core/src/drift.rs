//! Autonomous drift that keeps the piece moving when nobody is touching it.
//!
//! Two states: `IdleDrift` and `InteractionOverride`. Any interaction event
//! switches to override immediately; drift resumes only once the idle
//! threshold has passed with no further events and no gesture held.

use crate::constants::{DRIFT_REFERENCE_FPS, IDLE_THRESHOLD_SEC, MAX_FRAME_DT_SEC};
use crate::energy::AudioEnergyReading;
use crate::state::{ControlState, Macro};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriftMode {
    IdleDrift,
    InteractionOverride,
}

/// Session-wide idle tracker, updated by every interaction event.
#[derive(Clone, Copy, Debug)]
pub struct Activity {
    held: bool,
    last_active: Option<f64>,
    idle_threshold: f64,
}

impl Default for Activity {
    fn default() -> Self {
        Self::new(IDLE_THRESHOLD_SEC)
    }
}

impl Activity {
    pub fn new(idle_threshold: f64) -> Self {
        Self {
            held: false,
            last_active: None,
            idle_threshold,
        }
    }

    /// Record an interaction event at `now` (seconds).
    pub fn mark_active(&mut self, now: f64) {
        self.last_active = Some(now);
    }

    /// A gesture started: override holds until `release`.
    pub fn hold(&mut self, now: f64) {
        self.held = true;
        self.mark_active(now);
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn last_active(&self) -> Option<f64> {
        self.last_active
    }

    pub fn mode(&self, now: f64) -> DriftMode {
        if self.held {
            return DriftMode::InteractionOverride;
        }
        match self.last_active {
            Some(t) if now - t < self.idle_threshold => DriftMode::InteractionOverride,
            _ => DriftMode::IdleDrift,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DriftInput {
    pub now: f64,
    pub dt: f64,
    /// Flow phase driving the slow sinusoids.
    pub phase: f64,
    pub energy: AudioEnergyReading,
}

/// One macro's drift: sinusoid plus an energy band minus its baseline.
struct MacroDrift {
    target: Macro,
    rate: f64,
    cosine: bool,
    depth: f32,
    energy_baseline: f32,
    energy_depth: f32,
}

const MACRO_DRIFTS: [MacroDrift; 3] = [
    MacroDrift {
        target: Macro::Distance,
        rate: 0.18,
        cosine: false,
        depth: 0.00045,
        energy_baseline: 0.08,
        energy_depth: 0.00025,
    },
    MacroDrift {
        target: Macro::Motion,
        rate: 0.14,
        cosine: true,
        depth: 0.00040,
        energy_baseline: 0.12,
        energy_depth: 0.00020,
    },
    MacroDrift {
        target: Macro::Focus,
        rate: 0.12,
        cosine: false,
        depth: 0.00040,
        energy_baseline: 0.12,
        energy_depth: 0.00020,
    },
];

// Room breathes with bass on a slower envelope
const ROOM_RATE: f64 = 0.16;
const ROOM_DEPTH: f32 = 0.00055;
const ROOM_BASS_BASELINE: f32 = 0.10;
const ROOM_BASS_DEPTH: f32 = 0.00025;
const BREATHE_RATE: f64 = 0.22;

#[derive(Debug)]
pub struct DriftEngine {
    last_mode: DriftMode,
}

impl Default for DriftEngine {
    fn default() -> Self {
        Self {
            last_mode: DriftMode::InteractionOverride,
        }
    }
}

impl DriftEngine {
    pub fn mode(&self) -> DriftMode {
        self.last_mode
    }

    /// Nudge `controls` along their drift trajectories if the session is idle.
    /// Returns whether drift ran this frame.
    pub fn apply_drift(
        &mut self,
        controls: &mut ControlState,
        activity: &Activity,
        input: &DriftInput,
    ) -> bool {
        let mode = activity.mode(input.now);
        if mode != self.last_mode {
            log::debug!("[drift] {:?} -> {:?}", self.last_mode, mode);
            self.last_mode = mode;
        }
        if mode == DriftMode::InteractionOverride {
            return false;
        }

        // Nudges are tuned per frame at the reference rate
        let k = (input.dt.clamp(0.0, MAX_FRAME_DT_SEC) * DRIFT_REFERENCE_FPS) as f32;
        let t = input.phase;
        let e = &input.energy;

        for d in &MACRO_DRIFTS {
            let wave = if d.cosine {
                (t * d.rate).cos()
            } else {
                (t * d.rate).sin()
            } as f32;
            let band = match d.target {
                Macro::Distance => e.rms,
                Macro::Motion => e.high,
                _ => e.mid,
            };
            let delta = wave * d.depth + (band - d.energy_baseline) * d.energy_depth;
            controls.nudge(d.target, delta * k);
        }

        let breathe = 0.5 + 0.5 * (t * BREATHE_RATE).sin() as f32;
        let room_delta = ((t * ROOM_RATE).sin() as f32 * ROOM_DEPTH
            + (e.bass - ROOM_BASS_BASELINE) * ROOM_BASS_DEPTH)
            * (0.7 + breathe * 0.6);
        controls.nudge(Macro::Room, room_delta * k);

        drift_voices(controls, t, k);
        true
    }
}

/// Phase offset that keeps voices out of step with each other.
#[inline]
pub fn voice_phase_offset(index: usize) -> f64 {
    index as f64 * 2.0 - 1.0
}

fn drift_voices(controls: &mut ControlState, t: f64, k: f32) {
    let motion = controls.motion();
    let distance = controls.distance();
    for (i, v) in controls.voices_mut().enumerate() {
        let fi = i as f64;
        let offset = voice_phase_offset(i);

        let pos_wave = (t * (0.10 + fi * 0.03)).sin() as f32;
        v.set_pos(v.pos() + pos_wave * 0.00055 * (0.7 + motion) * k);

        let dist_wave = (t * (0.09 + fi * 0.025) + offset).cos() as f32;
        v.set_dist(v.dist() + dist_wave * 0.00045 * (0.8 + distance) * k);

        // width/motion/focus follow absolute trajectories rather than nudges
        v.set_width(0.50 + (t * (0.11 + fi * 0.02) + offset).sin() as f32 * 0.10 + motion * 0.18);
        v.set_motion(0.30 + motion * 0.55);
        v.set_focus(0.45 + (t * 0.07 + fi).sin() as f32 * 0.08);
    }
}
