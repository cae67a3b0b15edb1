//! Explicit session context replacing the frame loop's ambient globals.
//!
//! Input handlers call the `pointer_*`/`wheel`/`pinch_*` methods between
//! frames; the frame loop calls [`Session::tick`] once per display refresh.

use crate::constants::*;
use crate::drift::{Activity, DriftEngine, DriftInput, DriftMode};
use crate::energy::AudioEnergyReading;
use crate::error::StartupError;
use crate::interaction::{GestureMode, GestureTarget, InteractionAdapter, Modifiers};
use crate::ir::{self, ImpulseResponseBuffer, ImpulseResponseConfig};
use crate::layout::{HitTarget, SurfaceLayout};
use crate::mapper::{map_parameters, ParameterVector};
use crate::state::{ControlState, VoiceParams};
use crate::transient::{FlowClock, TransientDetector};
use glam::Vec2;
use rand::Rng;

/// One looping audio source.
#[derive(Clone, Debug, PartialEq)]
pub struct StemConfig {
    pub name: String,
    pub url: String,
    pub base_pos: f32,
}

impl StemConfig {
    pub fn new(name: &str, url: &str, base_pos: f32) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            base_pos,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub stems: Vec<StemConfig>,
    pub ir: ImpulseResponseConfig,
    pub idle_threshold_sec: f64,
    pub debug_log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stems: vec![
                StemConfig::new("DRUM", "assets/drum.wav", -0.55),
                StemConfig::new("SYNTH", "assets/synthesizer.wav", 0.55),
            ],
            ir: ImpulseResponseConfig::default(),
            idle_threshold_sec: IDLE_THRESHOLD_SEC,
            debug_log_capacity: DEBUG_LOG_CAPACITY,
        }
    }
}

/// Output of one frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub params: ParameterVector,
    pub energy: AudioEnergyReading,
    pub strobe: f32,
    pub phase: f64,
    pub drifting: bool,
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    controls: ControlState,
    activity: Activity,
    drift: DriftEngine,
    interaction: InteractionAdapter,
    transient: TransientDetector,
    clock: FlowClock,
    last_now: Option<f64>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, StartupError> {
        let controls = ControlState::new(config.stems.iter().map(|s| VoiceParams::new(s.base_pos)))?;
        log::info!(
            "[session] voices={} idle_threshold={:.2}s",
            controls.voice_count(),
            config.idle_threshold_sec
        );
        Ok(Self {
            activity: Activity::new(config.idle_threshold_sec),
            config,
            controls,
            drift: DriftEngine::default(),
            interaction: InteractionAdapter::default(),
            transient: TransientDetector::default(),
            clock: FlowClock::default(),
            last_now: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlState {
        &mut self.controls
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn drift_mode(&self, now: f64) -> DriftMode {
        self.activity.mode(now)
    }

    pub fn gesture_mode(&self) -> GestureMode {
        self.interaction.mode()
    }

    pub fn phase(&self) -> f64 {
        self.clock.phase()
    }

    pub fn strobe(&self) -> f32 {
        self.transient.strobe()
    }

    /// Build the room kernel. Call once per session, before the first tick.
    pub fn synthesize_ir<R: Rng + ?Sized>(&self, sample_rate: f32, rng: &mut R) -> ImpulseResponseBuffer {
        ir::synthesize(&self.config.ir, sample_rate, rng)
    }

    /// Advance one frame: strobe, flow phase, drift, then mapping.
    pub fn tick(&mut self, now: f64, energy: AudioEnergyReading) -> Frame {
        let dt = match self.last_now {
            Some(prev) => (now - prev).max(MIN_FRAME_DT_SEC),
            None => MIN_FRAME_DT_SEC,
        };
        self.last_now = Some(now);

        let strobe = self.transient.update(&energy);
        let phase = self.clock.advance(self.controls.motion(), &energy);
        let drifting = self.drift.apply_drift(
            &mut self.controls,
            &self.activity,
            &DriftInput {
                now,
                dt,
                phase,
                energy,
            },
        );
        Frame {
            params: map_parameters(&self.controls, &energy),
            energy,
            strobe,
            phase,
            drifting,
        }
    }

    /// Pointer down at `p`: actors first, then the cube. Returns what was grabbed.
    pub fn pointer_down(&mut self, p: Vec2, layout: &SurfaceLayout, now: f64) -> Option<HitTarget> {
        let hit = layout.hit_test(&self.controls, self.clock.phase(), p)?;
        let target = match hit {
            HitTarget::Actor(i) => GestureTarget::Voice(i),
            HitTarget::Cube => GestureTarget::Macro,
        };
        self.interaction
            .on_gesture_start(target, p, &self.controls, &mut self.activity, now)
            .then_some(hit)
    }

    pub fn pointer_move(&mut self, p: Vec2, layout: &SurfaceLayout, now: f64) -> bool {
        self.interaction
            .on_gesture_move(p, layout, &mut self.controls, &mut self.activity, now)
    }

    pub fn pointer_up(&mut self) {
        self.interaction.on_gesture_end(&mut self.activity);
    }

    pub fn wheel(&mut self, delta_y: f32, modifiers: Modifiers, now: f64) {
        self.interaction
            .on_wheel(delta_y, modifiers, &mut self.controls, &mut self.activity, now);
    }

    pub fn pinch_start(&mut self, now: f64) {
        self.interaction
            .on_pinch_start(&self.controls, &mut self.activity, now);
    }

    pub fn pinch_change(&mut self, scale: f32, now: f64) {
        self.interaction
            .on_pinch_change(scale, &mut self.controls, &mut self.activity, now);
    }

    pub fn pinch_end(&mut self, now: f64) {
        self.interaction.on_pinch_end(&mut self.activity, now);
    }
}
