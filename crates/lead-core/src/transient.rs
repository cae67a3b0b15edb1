use crate::constants::*;
use crate::energy::AudioEnergyReading;

/// Onset detector driving the white strobe flash.
///
/// A rise in RMS above a bass-dependent threshold kicks the strobe; it decays
/// geometrically every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransientDetector {
    prev_rms: f32,
    strobe: f32,
}

impl TransientDetector {
    pub fn update(&mut self, energy: &AudioEnergyReading) -> f32 {
        let d_rms = energy.rms - self.prev_rms;
        self.prev_rms = energy.rms;
        if d_rms > STROBE_THRESHOLD + energy.bass * STROBE_BASS_THRESHOLD {
            self.strobe = (self.strobe + STROBE_KICK).min(1.0);
        }
        self.strobe *= STROBE_DECAY;
        self.strobe
    }

    pub fn strobe(&self) -> f32 {
        self.strobe
    }
}

/// Phase shared by drift sinusoids and visual animation. Runs faster with
/// more motion and brighter audio.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlowClock {
    phase: f64,
}

impl FlowClock {
    pub fn advance(&mut self, motion: f32, energy: &AudioEnergyReading) -> f64 {
        self.phase +=
            FLOW_BASE_STEP + motion as f64 * FLOW_MOTION_STEP + energy.high as f64 * FLOW_HIGH_STEP;
        self.phase
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}
