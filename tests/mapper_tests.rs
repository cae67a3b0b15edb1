// Host-side tests for the parameter mapper.

use lead_core::constants::*;
use lead_core::{
    map_parameters, AudioEnergyReading, ControlState, Macro, ParamId, VoiceParamId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn two_voices() -> ControlState {
    ControlState::with_base_positions(&[-0.55, 0.55]).unwrap()
}

fn random_controls(rng: &mut StdRng) -> ControlState {
    let mut c = two_voices();
    for m in [Macro::Room, Macro::Distance, Macro::Motion, Macro::Focus] {
        c.set(m, rng.gen_range(0.0..=1.0));
    }
    for v in c.voices_mut() {
        v.set_level(rng.gen_range(0.0..=VOICE_LEVEL_MAX));
        v.set_pos(rng.gen_range(-1.0..=1.0));
        v.set_dist(rng.gen_range(0.0..=1.0));
        v.set_width(rng.gen_range(0.0..=1.0));
        v.set_motion(rng.gen_range(0.0..=1.0));
        v.set_focus(rng.gen_range(0.0..=1.0));
    }
    c
}

#[test]
fn every_output_stays_inside_its_declared_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let c = random_controls(&mut rng);
        let e = AudioEnergyReading::new(rng.gen(), rng.gen(), rng.gen(), rng.gen());
        let p = map_parameters(&c, &e);
        for (id, v) in p.entries() {
            let (lo, hi) = id.range();
            assert!(v.is_finite(), "{id} is not finite");
            assert!(v >= lo && v <= hi, "{id} = {v} outside [{lo}, {hi}]");
        }
    }
}

#[test]
fn extreme_corners_stay_in_range() {
    for x in [0.0f32, 1.0] {
        let mut c = two_voices();
        for m in [Macro::Room, Macro::Distance, Macro::Motion, Macro::Focus] {
            c.set(m, x);
        }
        for v in c.voices_mut() {
            v.set_level(x * VOICE_LEVEL_MAX);
            v.set_dist(x);
            v.set_width(x);
            v.set_motion(x);
            v.set_focus(x);
        }
        let p = map_parameters(&c, &AudioEnergyReading::default());
        for (id, v) in p.entries() {
            let (lo, hi) = id.range();
            assert!(v >= lo && v <= hi, "{id} = {v} at corner {x}");
        }
    }
}

#[test]
fn mapping_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    let c = random_controls(&mut rng);
    let e = AudioEnergyReading::new(0.4, 0.3, 0.2, 0.5);
    let a = map_parameters(&c, &e);
    let b = map_parameters(&c, &e);
    assert_eq!(a, b);
    for ((ia, va), (ib, vb)) in a.entries().into_iter().zip(b.entries()) {
        assert_eq!(ia, ib);
        assert_eq!(va.to_bits(), vb.to_bits(), "{ia} differs between calls");
    }
}

#[test]
fn far_voice_sends_more_and_stays_less_present() {
    let mut c = two_voices();
    c.voice_mut(0).unwrap().set_dist(0.1);
    c.voice_mut(1).unwrap().set_dist(0.9);
    let e = AudioEnergyReading::new(0.9, 0.4, 0.1, 0.5);
    let p = map_parameters(&c, &e);
    let near = &p.voices[0];
    let far = &p.voices[1];
    assert!(far.send_gain > near.send_gain);
    assert!(far.dry_gain < near.dry_gain);
    assert!(far.tone_hz < near.tone_hz);
}

#[test]
fn distance_macro_lowers_master_headroom() {
    let mut c = two_voices();
    c.set(Macro::Distance, 0.0);
    let base = map_parameters(&c, &AudioEnergyReading::default()).master_gain;
    assert!((base - 0.84).abs() < 1e-6);

    c.set(Macro::Distance, DEFAULT_DISTANCE);
    let cut = map_parameters(&c, &AudioEnergyReading::default()).master_gain;
    assert!(cut < base);
    let expected = 0.84 - DEFAULT_DISTANCE.powf(DISTANCE_CURVE) * 0.16;
    assert!((cut - expected).abs() < 1e-5);
}

#[test]
fn motion_blend_uses_sixty_percent_global() {
    let mut c = two_voices();
    c.set(Macro::Motion, 1.0);
    c.voice_mut(0).unwrap().set_motion(0.0);
    let p = map_parameters(&c, &AudioEnergyReading::default());
    let expected = 0.95 * 0.6f32.powf(VOICE_MOTION_CURVE) * 1.05;
    assert!((p.voices[0].lfo_depth - expected).abs() < 1e-5);
}

#[test]
fn focus_blend_uses_quarter_global() {
    let mut c = two_voices();
    c.set(Macro::Focus, 1.0);
    c.voice_mut(0).unwrap().set_focus(0.0);
    let p = map_parameters(&c, &AudioEnergyReading::default());
    assert!((p.voices[0].focus_gain_db - 6.75).abs() < 1e-5);
}

#[test]
fn voice_outputs_follow_voice_inputs() {
    let mut c = two_voices();
    c.voice_mut(1).unwrap().set_pos(-0.3);
    c.voice_mut(1).unwrap().set_level(0.4);
    let p = map_parameters(&c, &AudioEnergyReading::default());
    assert_eq!(p.voices.len(), 2);
    assert_eq!(p.voices[1].pan, -0.3);
    assert_eq!(p.voices[1].level, 0.4);
    assert_eq!(p.voices[0].pan, -0.55);
}

#[test]
fn wider_voice_gets_more_side_and_longer_haas() {
    let mut c = two_voices();
    c.voice_mut(0).unwrap().set_width(0.1);
    c.voice_mut(1).unwrap().set_width(0.9);
    let p = map_parameters(&c, &AudioEnergyReading::default());
    assert!(p.voices[1].side_gain > p.voices[0].side_gain);
    assert!(p.voices[1].haas_delay_sec > p.voices[0].haas_delay_sec);
}

#[test]
fn named_lookup_matches_entries() {
    let c = two_voices();
    let p = map_parameters(&c, &AudioEnergyReading::default());
    let named = p.named();
    assert_eq!(named.len(), 5 + 2 * VoiceParamId::ALL.len());
    let id = ParamId::Voice(1, VoiceParamId::SendGain);
    assert_eq!(named.get(&id).copied(), p.get(id));
    assert_eq!(id.to_string(), "voice1.send");
    assert_eq!(p.get(ParamId::Voice(5, VoiceParamId::Pan)), None);
}
