//! Live energy readings derived from the output analyser.

use crate::constants::{BASS_BAND, HIGH_BAND, MID_BAND};

/// Band energies and waveform RMS, each normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioEnergyReading {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub rms: f32,
}

impl AudioEnergyReading {
    pub fn new(bass: f32, mid: f32, high: f32, rms: f32) -> Self {
        Self {
            bass,
            mid,
            high,
            rms,
        }
        .clamped()
    }

    /// Reading from byte frequency bins (0..=255) and byte time-domain samples
    /// (128 = zero), as produced by a WebAudio-style analyser.
    pub fn from_analyser(freq: &[u8], time: &[u8]) -> Self {
        Self {
            bass: band_energy(freq, BASS_BAND.0, BASS_BAND.1),
            mid: band_energy(freq, MID_BAND.0, MID_BAND.1),
            high: band_energy(freq, HIGH_BAND.0, HIGH_BAND.1),
            rms: waveform_rms(time),
        }
    }

    fn clamped(self) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            bass: c(self.bass),
            mid: c(self.mid),
            high: c(self.high),
            rms: c(self.rms),
        }
    }
}

/// Mean bin magnitude over the fractional range `[start, end)` of `freq`.
pub fn band_energy(freq: &[u8], start: f32, end: f32) -> f32 {
    let n = freq.len();
    if n == 0 {
        return 0.0;
    }
    let a = ((n as f32 * start).floor() as usize).min(n - 1);
    let b = ((n as f32 * end).floor() as usize).max(a + 1).min(n);
    let sum: u32 = freq[a..b].iter().map(|&v| v as u32).sum();
    (sum as f32 / (b - a) as f32) / 255.0
}

/// RMS of byte time-domain samples centred on 128, capped at 1.
pub fn waveform_rms(time: &[u8]) -> f32 {
    if time.is_empty() {
        return 0.0;
    }
    let sum: f32 = time
        .iter()
        .map(|&v| {
            let x = (v as f32 - 128.0) / 128.0;
            x * x
        })
        .sum();
    (sum / time.len() as f32).sqrt().min(1.0)
}
