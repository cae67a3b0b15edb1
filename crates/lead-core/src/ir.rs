//! Procedural stereo impulse response for the room convolver.
//!
//! The kernel is sparse early reflections followed by an enveloped, damped
//! noise tail. Left and right draw independent noise so the convolved wet
//! signal comes out decorrelated (wide) rather than a panned mono tail.

use crate::constants::*;
use crate::curve::clamp01;
use rand::Rng;
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpulseResponseConfig {
    pub duration_seconds: f32,
    pub decay_exponent: f32,
    pub damping_cutoff_hz: f32,
    pub early_reflection_count: usize,
    pub stereo_width: f32,
}

impl Default for ImpulseResponseConfig {
    fn default() -> Self {
        Self {
            duration_seconds: IR_SECONDS,
            decay_exponent: IR_DECAY,
            damping_cutoff_hz: IR_DAMP_HZ,
            early_reflection_count: IR_EARLY_REFLECTIONS,
            stereo_width: IR_STEREO_WIDTH,
        }
    }
}

impl ImpulseResponseConfig {
    /// Number of frames the synthesized buffer will hold at `sample_rate`.
    pub fn frame_count(&self, sample_rate: f32) -> usize {
        let n = (self.duration_seconds * sample_rate).round();
        if n.is_finite() && n >= 1.0 {
            n as usize
        } else {
            1
        }
    }
}

/// Two equal-length channels. Immutable once built.
#[derive(Clone, Debug)]
pub struct ImpulseResponseBuffer {
    sample_rate: f32,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl ImpulseResponseBuffer {
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
    pub fn len(&self) -> usize {
        self.left.len()
    }
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
    pub fn left(&self) -> &[f32] {
        &self.left
    }
    pub fn right(&self) -> &[f32] {
        &self.right
    }
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        match index {
            0 => Some(&self.left),
            1 => Some(&self.right),
            _ => None,
        }
    }
}

/// One-pole low-pass used for the tail's air/material damping.
#[derive(Clone, Copy, Debug)]
struct OnePole {
    alpha: f32,
    state: f32,
}

impl OnePole {
    fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let dt = 1.0 / sample_rate;
        let rc = 1.0 / (2.0 * PI * cutoff_hz.max(IR_MIN_DAMP_HZ));
        Self {
            alpha: dt / (rc + dt),
            state: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        self.state += self.alpha * (x - self.state);
        self.state
    }
}

/// Slow random walk mixed under the white noise so the tail does not sound static.
#[derive(Clone, Copy, Debug, Default)]
struct Walk {
    value: f32,
}

impl Walk {
    #[inline]
    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        self.value = self.value * IR_WALK_RETAIN + bipolar(rng) * IR_WALK_STEP;
        self.value
    }
}

#[inline]
fn bipolar<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(-1.0f32..1.0)
}

/// Synthesize a stereo room impulse response.
///
/// The shape is fixed by `config`; the fine structure comes from `rng`, so a
/// seeded generator gives a reproducible buffer.
pub fn synthesize<R: Rng + ?Sized>(
    config: &ImpulseResponseConfig,
    sample_rate: f32,
    rng: &mut R,
) -> ImpulseResponseBuffer {
    let len = config.frame_count(sample_rate);
    let mut left = vec![0.0f32; len];
    let mut right = vec![0.0f32; len];
    let width = config.stereo_width;

    add_early_reflections(config, sample_rate, rng, &mut left, &mut right);

    let mut lp_l = OnePole::new(config.damping_cutoff_hz, sample_rate);
    let mut lp_r = OnePole::new(config.damping_cutoff_hz, sample_rate);
    let mut walk_l = Walk::default();
    let mut walk_r = Walk::default();
    let tail_gain = 0.85 + width * 0.25;

    for i in 0..len {
        let x = i as f32 / len as f32;
        let env = (1.0 - x).powf(config.decay_exponent);

        let wl = walk_l.step(rng);
        let wr = walk_r.step(rng);
        let nl = bipolar(rng) * IR_NOISE_MIX + wl * IR_WALK_MIX;
        let nr = bipolar(rng) * IR_NOISE_MIX + wr * IR_WALK_MIX;

        left[i] += lp_l.process(nl) * env * tail_gain;
        right[i] += lp_r.process(nr) * env * tail_gain;
    }

    log::debug!(
        "[ir] synthesized {} frames @ {}Hz (decay={:.2} damp={:.0}Hz width={:.2})",
        len,
        sample_rate,
        config.decay_exponent,
        config.damping_cutoff_hz,
        width
    );

    ImpulseResponseBuffer {
        sample_rate,
        left,
        right,
    }
}

/// Sparse impulses in the first ~130ms, added onto `left`/`right`.
///
/// Panning is one-sided: a reflection panned fully right contributes nothing
/// to the left channel.
pub fn add_early_reflections<R: Rng + ?Sized>(
    config: &ImpulseResponseConfig,
    sample_rate: f32,
    rng: &mut R,
    left: &mut [f32],
    right: &mut [f32],
) {
    let len = left.len();
    for i in 0..config.early_reflection_count {
        let t = IR_EARLY_MIN_SEC + rng.gen::<f32>() * IR_EARLY_SPAN_SEC;
        let idx = (t * sample_rate).floor() as usize;
        // Draw the remaining values even when skipping so the stream stays aligned
        let amp = (IR_EARLY_AMP / (1 + i) as f32) * rng.gen_range(0.75f32..1.30);
        let pan = bipolar(rng) * config.stereo_width;
        if idx >= len {
            continue;
        }
        let (lw, rw) = one_sided_pan(pan);
        left[idx] += amp * lw;
        right[idx] += amp * rw;
    }
}

/// Left/right weights for a pan in `[-1, 1]`; the near side stays at unity.
#[inline]
pub fn one_sided_pan(pan: f32) -> (f32, f32) {
    (clamp01(1.0 - pan.max(0.0)), clamp01(1.0 + pan.min(0.0)))
}
