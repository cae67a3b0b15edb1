//! Macro + per-voice controls -> every audio node parameter and visual layer.
//!
//! The mapper is a pure function of its inputs. It holds no state, so two
//! calls with identical inputs produce bit-identical vectors.

use crate::constants::*;
use crate::curve::{blend, clamp01, curve, lerp};
use crate::energy::AudioEnergyReading;
use crate::state::{ControlState, VoiceParams};
use crate::viz::{self, VizParams};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::fmt;

// Room bus: (near/dry end, far/wet end) of each lerp
const WET_GAIN: (f32, f32) = (0.10, 0.78);
const WET_ROOM_SCALE: (f32, f32) = (0.70, 1.05);
const PREDELAY_SEC: (f32, f32) = (0.012, 0.16);
const PREDELAY_ROOM_SCALE: (f32, f32) = (0.75, 1.20);
const ROOM_LP_HZ: (f32, f32) = (9800.0, 3200.0);
const ROOM_LP_DIST_SPAN: f32 = 0.92;
const ROOM_LP_ROOM_SCALE: (f32, f32) = (1.05, 0.80);
const ROOM_HP_HZ: (f32, f32) = (130.0, 280.0);
const ROOM_HP_ROOM_SCALE: (f32, f32) = (0.90, 1.10);

// Master headroom
const MASTER_GAIN_BASE: f32 = 0.84;
const MASTER_GAIN_DISTANCE_CUT: f32 = 0.16;

// Per-voice distance
const DRY_GAIN: (f32, f32) = (1.0, 0.18);
const DRY_GLOBAL_SCALE: (f32, f32) = (1.0, 0.78);
const SEND_GAIN: (f32, f32) = (0.05, 1.0);
const SEND_GLOBAL_SCALE: (f32, f32) = (0.65, 1.0);
const TONE_HZ: (f32, f32) = (18000.0, 2200.0);

// Focus EQ
const FOCUS_HZ: (f32, f32) = (180.0, 7200.0);
const FOCUS_VOICE_SHARE: f32 = 0.78;
const FOCUS_GLOBAL_SHARE: f32 = 0.22;
const FOCUS_GAIN_DB: (f32, f32) = (4.0, 15.0);

// Width (Haas side chain)
const SIDE_AMOUNT: (f32, f32) = (0.0, 0.85);
const SIDE_GAIN_SCALE: f32 = 0.62;
const HAAS_DELAY_SEC: (f32, f32) = (0.002, 0.026);
const HAAS_VOICE_MOTION_SEC: f32 = 0.004;
const HAAS_GLOBAL_MOTION_SEC: f32 = 0.002;

// Auto-pan LFO
const LFO_RATE_HZ: (f32, f32) = (0.05, 1.8);
const LFO_RATE_GLOBAL_SCALE: (f32, f32) = (0.8, 1.25);
const LFO_DEPTH: (f32, f32) = (0.0, 0.95);
const LFO_DEPTH_GLOBAL_SCALE: (f32, f32) = (0.85, 1.05);

/// Per-voice output parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoiceParamId {
    Level,
    Pan,
    DryGain,
    SendGain,
    ToneHz,
    FocusHz,
    FocusGainDb,
    SideGain,
    HaasDelaySec,
    LfoRateHz,
    LfoDepth,
}

impl VoiceParamId {
    pub const ALL: [VoiceParamId; 11] = [
        VoiceParamId::Level,
        VoiceParamId::Pan,
        VoiceParamId::DryGain,
        VoiceParamId::SendGain,
        VoiceParamId::ToneHz,
        VoiceParamId::FocusHz,
        VoiceParamId::FocusGainDb,
        VoiceParamId::SideGain,
        VoiceParamId::HaasDelaySec,
        VoiceParamId::LfoRateHz,
        VoiceParamId::LfoDepth,
    ];

    fn name(self) -> &'static str {
        match self {
            VoiceParamId::Level => "level",
            VoiceParamId::Pan => "pan",
            VoiceParamId::DryGain => "dry",
            VoiceParamId::SendGain => "send",
            VoiceParamId::ToneHz => "tone_hz",
            VoiceParamId::FocusHz => "focus_hz",
            VoiceParamId::FocusGainDb => "focus_db",
            VoiceParamId::SideGain => "side",
            VoiceParamId::HaasDelaySec => "haas_sec",
            VoiceParamId::LfoRateHz => "lfo_hz",
            VoiceParamId::LfoDepth => "lfo_depth",
        }
    }

    fn range(self) -> (f32, f32) {
        match self {
            VoiceParamId::Level => (0.0, VOICE_LEVEL_MAX),
            VoiceParamId::Pan => (-1.0, 1.0),
            VoiceParamId::DryGain => (0.08, 1.0),
            VoiceParamId::SendGain => (0.0, 1.2),
            VoiceParamId::ToneHz => (20.0, 20000.0),
            VoiceParamId::FocusHz => FOCUS_HZ,
            VoiceParamId::FocusGainDb => FOCUS_GAIN_DB,
            VoiceParamId::SideGain => (0.0, 1.0),
            // side delay line holds 60ms
            VoiceParamId::HaasDelaySec => (0.0, 0.06),
            VoiceParamId::LfoRateHz => (0.0, 4.0),
            VoiceParamId::LfoDepth => (0.0, 1.0),
        }
    }
}

/// Name of one value in a [`ParameterVector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    MasterGain,
    RoomWetGain,
    RoomPredelaySec,
    RoomLowpassHz,
    RoomHighpassHz,
    Voice(usize, VoiceParamId),
}

impl ParamId {
    /// Declared output domain. Every mapped value lies inside it.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParamId::MasterGain => (
                MASTER_GAIN_BASE - MASTER_GAIN_DISTANCE_CUT,
                MASTER_GAIN_BASE,
            ),
            ParamId::RoomWetGain => (0.0, 1.0),
            // predelay line holds 350ms
            ParamId::RoomPredelaySec => (0.0, 0.35),
            ParamId::RoomLowpassHz => (200.0, 20000.0),
            ParamId::RoomHighpassHz => (20.0, 1000.0),
            ParamId::Voice(_, p) => p.range(),
        }
    }

    #[inline]
    fn clamp(self, v: f32) -> f32 {
        let (lo, hi) = self.range();
        if v.is_nan() {
            lo
        } else {
            v.clamp(lo, hi)
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamId::MasterGain => write!(f, "master.gain"),
            ParamId::RoomWetGain => write!(f, "room.wet"),
            ParamId::RoomPredelaySec => write!(f, "room.predelay_sec"),
            ParamId::RoomLowpassHz => write!(f, "room.lp_hz"),
            ParamId::RoomHighpassHz => write!(f, "room.hp_hz"),
            ParamId::Voice(i, p) => write!(f, "voice{}.{}", i, p.name()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoomBusParams {
    pub wet_gain: f32,
    pub predelay_sec: f32,
    pub lowpass_hz: f32,
    pub highpass_hz: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoiceChannelParams {
    pub level: f32,
    pub pan: f32,
    pub dry_gain: f32,
    pub send_gain: f32,
    pub tone_hz: f32,
    pub focus_hz: f32,
    pub focus_gain_db: f32,
    /// Gain of each hard-panned side of the width enhancer.
    pub side_gain: f32,
    pub haas_delay_sec: f32,
    pub lfo_rate_hz: f32,
    pub lfo_depth: f32,
}

impl VoiceChannelParams {
    pub fn get(&self, id: VoiceParamId) -> f32 {
        match id {
            VoiceParamId::Level => self.level,
            VoiceParamId::Pan => self.pan,
            VoiceParamId::DryGain => self.dry_gain,
            VoiceParamId::SendGain => self.send_gain,
            VoiceParamId::ToneHz => self.tone_hz,
            VoiceParamId::FocusHz => self.focus_hz,
            VoiceParamId::FocusGainDb => self.focus_gain_db,
            VoiceParamId::SideGain => self.side_gain,
            VoiceParamId::HaasDelaySec => self.haas_delay_sec,
            VoiceParamId::LfoRateHz => self.lfo_rate_hz,
            VoiceParamId::LfoDepth => self.lfo_depth,
        }
    }
}

/// Everything one frame applies downstream. Replaced wholesale every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterVector {
    pub master_gain: f32,
    pub room: RoomBusParams,
    pub voices: SmallVec<[VoiceChannelParams; 4]>,
    pub viz: VizParams,
}

impl ParameterVector {
    pub fn get(&self, id: ParamId) -> Option<f32> {
        match id {
            ParamId::MasterGain => Some(self.master_gain),
            ParamId::RoomWetGain => Some(self.room.wet_gain),
            ParamId::RoomPredelaySec => Some(self.room.predelay_sec),
            ParamId::RoomLowpassHz => Some(self.room.lowpass_hz),
            ParamId::RoomHighpassHz => Some(self.room.highpass_hz),
            ParamId::Voice(i, p) => self.voices.get(i).map(|v| v.get(p)),
        }
    }

    /// All audio parameters as `(name, value)` pairs in a stable order.
    pub fn entries(&self) -> Vec<(ParamId, f32)> {
        let mut out = Vec::with_capacity(5 + self.voices.len() * VoiceParamId::ALL.len());
        out.push((ParamId::MasterGain, self.master_gain));
        out.push((ParamId::RoomWetGain, self.room.wet_gain));
        out.push((ParamId::RoomPredelaySec, self.room.predelay_sec));
        out.push((ParamId::RoomLowpassHz, self.room.lowpass_hz));
        out.push((ParamId::RoomHighpassHz, self.room.highpass_hz));
        for (i, v) in self.voices.iter().enumerate() {
            for p in VoiceParamId::ALL {
                out.push((ParamId::Voice(i, p), v.get(p)));
            }
        }
        out
    }

    pub fn named(&self) -> FnvHashMap<ParamId, f32> {
        self.entries().into_iter().collect()
    }
}

/// Global macros after their response curves.
#[derive(Clone, Copy, Debug)]
struct GlobalCurves {
    room: f32,
    distance: f32,
    motion: f32,
    focus: f32,
}

impl GlobalCurves {
    fn new(controls: &ControlState) -> Self {
        Self {
            room: curve(controls.room(), ROOM_CURVE),
            distance: curve(controls.distance(), DISTANCE_CURVE),
            motion: curve(controls.motion(), MOTION_CURVE),
            focus: clamp01(controls.focus()),
        }
    }
}

/// Map the current controls (and live energy, for the visual layers) to a
/// full parameter vector.
pub fn map_parameters(controls: &ControlState, energy: &AudioEnergyReading) -> ParameterVector {
    let g = GlobalCurves::new(controls);
    let voices = controls
        .voices()
        .iter()
        .enumerate()
        .map(|(i, v)| map_voice(i, v, controls, &g))
        .collect();
    ParameterVector {
        master_gain: ParamId::MasterGain
            .clamp(MASTER_GAIN_BASE - g.distance * MASTER_GAIN_DISTANCE_CUT),
        room: map_room(&g),
        voices,
        viz: viz::map_viz(controls, energy),
    }
}

fn map_room(g: &GlobalCurves) -> RoomBusParams {
    let wet = lerp(WET_GAIN.0, WET_GAIN.1, g.distance)
        * lerp(WET_ROOM_SCALE.0, WET_ROOM_SCALE.1, g.room);
    let predelay = lerp(PREDELAY_SEC.0, PREDELAY_SEC.1, g.distance)
        * lerp(PREDELAY_ROOM_SCALE.0, PREDELAY_ROOM_SCALE.1, g.room);
    let lp = lerp(ROOM_LP_HZ.0, ROOM_LP_HZ.1, g.distance * ROOM_LP_DIST_SPAN)
        * lerp(ROOM_LP_ROOM_SCALE.0, ROOM_LP_ROOM_SCALE.1, g.room);
    let hp = lerp(ROOM_HP_HZ.0, ROOM_HP_HZ.1, g.distance)
        * lerp(ROOM_HP_ROOM_SCALE.0, ROOM_HP_ROOM_SCALE.1, g.room);
    RoomBusParams {
        wet_gain: ParamId::RoomWetGain.clamp(wet),
        predelay_sec: ParamId::RoomPredelaySec.clamp(predelay),
        lowpass_hz: ParamId::RoomLowpassHz.clamp(lp),
        highpass_hz: ParamId::RoomHighpassHz.clamp(hp),
    }
}

/// Voice motion after blending with the global macro and applying its curve.
#[inline]
pub fn effective_motion(voice: &VoiceParams, controls: &ControlState, exponent: f32) -> f32 {
    curve(
        blend(voice.motion(), controls.motion(), MOTION_BLEND_WEIGHT),
        exponent,
    )
}

/// Voice focus after blending with the global macro.
#[inline]
pub fn effective_focus(voice: &VoiceParams, controls: &ControlState) -> f32 {
    clamp01(blend(
        voice.focus(),
        clamp01(controls.focus()),
        FOCUS_BLEND_WEIGHT,
    ))
}

fn map_voice(
    index: usize,
    v: &VoiceParams,
    controls: &ControlState,
    g: &GlobalCurves,
) -> VoiceChannelParams {
    let id = |p| ParamId::Voice(index, p);
    let dist = curve(v.dist(), VOICE_DIST_CURVE);
    let width = curve(v.width(), VOICE_WIDTH_CURVE);
    let mot = effective_motion(v, controls, VOICE_MOTION_CURVE);
    let foc = effective_focus(v, controls);

    // Proximity and send are not complements: dry bottoms out at 0.18 while
    // the send climbs from 0.05.
    let dry = lerp(DRY_GAIN.0, DRY_GAIN.1, dist)
        * lerp(DRY_GLOBAL_SCALE.0, DRY_GLOBAL_SCALE.1, g.distance);
    let send = lerp(SEND_GAIN.0, SEND_GAIN.1, dist)
        * lerp(SEND_GLOBAL_SCALE.0, SEND_GLOBAL_SCALE.1, g.distance);

    let focus_hz = lerp(
        FOCUS_HZ.0,
        FOCUS_HZ.1,
        clamp01(foc * FOCUS_VOICE_SHARE + g.focus * FOCUS_GLOBAL_SHARE),
    );
    let side = lerp(SIDE_AMOUNT.0, SIDE_AMOUNT.1, width) * SIDE_GAIN_SCALE;
    let haas = lerp(HAAS_DELAY_SEC.0, HAAS_DELAY_SEC.1, width)
        + mot * HAAS_VOICE_MOTION_SEC
        + g.motion * HAAS_GLOBAL_MOTION_SEC;
    let lfo_rate = lerp(LFO_RATE_HZ.0, LFO_RATE_HZ.1, mot)
        * lerp(LFO_RATE_GLOBAL_SCALE.0, LFO_RATE_GLOBAL_SCALE.1, g.motion);
    let lfo_depth = lerp(LFO_DEPTH.0, LFO_DEPTH.1, mot)
        * lerp(LFO_DEPTH_GLOBAL_SCALE.0, LFO_DEPTH_GLOBAL_SCALE.1, g.motion);

    VoiceChannelParams {
        level: id(VoiceParamId::Level).clamp(v.level()),
        pan: id(VoiceParamId::Pan).clamp(v.pos()),
        dry_gain: id(VoiceParamId::DryGain).clamp(dry),
        send_gain: id(VoiceParamId::SendGain).clamp(send),
        tone_hz: id(VoiceParamId::ToneHz).clamp(lerp(TONE_HZ.0, TONE_HZ.1, dist)),
        focus_hz: id(VoiceParamId::FocusHz).clamp(focus_hz),
        focus_gain_db: id(VoiceParamId::FocusGainDb)
            .clamp(lerp(FOCUS_GAIN_DB.0, FOCUS_GAIN_DB.1, foc)),
        side_gain: id(VoiceParamId::SideGain).clamp(side),
        haas_delay_sec: id(VoiceParamId::HaasDelaySec).clamp(haas),
        lfo_rate_hz: id(VoiceParamId::LfoRateHz).clamp(lfo_rate),
        lfo_depth: id(VoiceParamId::LfoDepth).clamp(lfo_depth),
    }
}
