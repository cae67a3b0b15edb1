//! Scalar helpers used by every mapping formula.

#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Power-law response curve: `clamp01(x)^p`.
///
/// Linear gestures feel linear only for perceptually linear quantities;
/// wetness, cutoff and send level want `p > 1`.
#[inline]
pub fn curve(x: f32, p: f32) -> f32 {
    clamp01(x).powf(p)
}

/// Blend a per-voice value towards the global one with weight `w`:
/// `voice * (1 - w) + global * w`.
#[inline]
pub fn blend(voice: f32, global: f32, w: f32) -> f32 {
    voice * (1.0 - w) + global * w
}
