// Host-side tests for the response curve and blend law.

use lead_core::constants::{FOCUS_BLEND_WEIGHT, MOTION_BLEND_WEIGHT};
use lead_core::{blend, clamp01, curve, lerp};

const EXPONENTS: [f32; 7] = [0.5, 1.0, 1.05, 1.25, 1.6, 1.7, 3.0];

#[test]
fn curve_endpoints_are_fixed() {
    for p in EXPONENTS {
        assert_eq!(curve(0.0, p), 0.0, "curve(0, {p})");
        assert_eq!(curve(1.0, p), 1.0, "curve(1, {p})");
    }
}

#[test]
fn curve_stays_in_unit_range_and_is_monotonic() {
    for p in EXPONENTS {
        let mut prev = curve(0.0, p);
        for step in 1..=200 {
            let x = step as f32 / 200.0;
            let y = curve(x, p);
            assert!((0.0..=1.0).contains(&y), "curve({x}, {p}) = {y}");
            assert!(y >= prev, "curve not monotonic at x={x}, p={p}");
            prev = y;
        }
    }
}

#[test]
fn curve_clamps_out_of_range_input() {
    assert_eq!(curve(-0.5, 1.6), 0.0);
    assert_eq!(curve(2.0, 1.6), 1.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(3.0), 1.0);
}

#[test]
fn steeper_exponent_bends_further_below_linear() {
    let x = 0.5;
    assert!(curve(x, 1.7) < curve(x, 1.25));
    assert!(curve(x, 1.25) < x);
}

#[test]
fn blend_law_matches_weights() {
    let voice = 0.2;
    let global = 0.9;
    let m = blend(voice, global, MOTION_BLEND_WEIGHT);
    assert!((m - (voice * 0.4 + global * 0.6)).abs() < 1e-6);
    let f = blend(voice, global, FOCUS_BLEND_WEIGHT);
    assert!((f - (voice * 0.75 + global * 0.25)).abs() < 1e-6);
}

#[test]
fn blend_endpoints_reproduce_inputs_exactly() {
    for (voice, global) in [(0.0, 1.0), (0.3, 0.7), (0.91, 0.12)] {
        assert_eq!(blend(voice, global, 0.0), voice);
        assert_eq!(blend(voice, global, 1.0), global);
    }
}

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(0.05, 1.0, 0.0), 0.05);
    assert_eq!(lerp(1.0, 0.18, 0.0), 1.0);
    assert!((lerp(1.0, 0.18, 1.0) - 0.18).abs() < 1e-6);
}
