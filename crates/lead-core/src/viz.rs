//! Visual-layer parameters computed alongside the audio mapping.
//!
//! Values here are per-frame scalars for the canvas layers. Factors that
//! depend on the strobe level or the flow phase are applied by the renderer,
//! which owns those per-frame animations.

use crate::curve::{clamp01, curve};
use crate::energy::AudioEnergyReading;
use crate::mapper::effective_motion;
use crate::state::ControlState;
use smallvec::SmallVec;

const ACTOR_DIST_CURVE: f32 = 1.4;
const ACTOR_MOTION_CURVE: f32 = 1.2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridLayer {
    pub line_count: u32,
    pub line_alpha: f32,
    /// Wobble amplitude in px before the strobe factor.
    pub wobble: f32,
    /// Focus line position as a fraction of the surface width.
    pub focus_x: f32,
    pub focus_alpha: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterfallLayer {
    pub alpha: f32,
    /// Visible block height as a fraction of the surface height.
    pub block_height: f32,
    pub row_gain: f32,
    pub rgb_split: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticleLayer {
    /// Attractor x as a fraction of the surface width.
    pub focus_x: f32,
    pub pull: f32,
    pub speed: f32,
    pub jitter: f32,
    pub heading_bias: f32,
    pub size_gain: f32,
    pub alpha_boost: f32,
    pub link_radius: f32,
    pub link_count: u32,
    pub links_enabled: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScopeLayer {
    pub amplitude: f32,
    pub x_scale: f32,
    pub rotation_depth: f32,
    pub phase_offset: u32,
    pub line_width: f32,
    pub alpha: f32,
    pub ghost_offset: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlitchLayer {
    pub scanline_count: u32,
    pub scanline_alpha: f32,
    pub scanline_wobble: f32,
    pub slice_chance: f32,
    pub slice_shift: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubeLayer {
    pub scale: f32,
    pub depth: f32,
    pub glow: f32,
    pub fill_alpha: f32,
    pub wobble: f32,
}

/// Per-voice "actor" node drawn above the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActorNode {
    pub radius: f32,
    pub alpha: f32,
    pub halo_scale: f32,
    pub orbit: f32,
    pub orbit_rate: [f32; 2],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VizParams {
    /// Alpha of the black fill laid over the previous frame (distance = fog).
    pub fog_fade: f32,
    pub grid: GridLayer,
    pub waterfall: WaterfallLayer,
    pub particles: ParticleLayer,
    pub scope: ScopeLayer,
    pub glitch: GlitchLayer,
    pub cube: CubeLayer,
    pub actors: SmallVec<[ActorNode; 4]>,
}

pub fn map_viz(c: &ControlState, e: &AudioEnergyReading) -> VizParams {
    let room = clamp01(c.room());
    let distance = clamp01(c.distance());
    let motion = clamp01(c.motion());
    let focus = clamp01(c.focus());

    let actors = c
        .voices()
        .iter()
        .map(|v| {
            let dist = curve(v.dist(), ACTOR_DIST_CURVE);
            let mot = effective_motion(v, c, ACTOR_MOTION_CURVE);
            ActorNode {
                radius: 7.0 + clamp01(v.level()) * 11.0 + e.bass * 10.0,
                alpha: 0.10 + (1.0 - dist) * 0.16,
                halo_scale: 1.9 + dist * 1.6,
                orbit: mot * (18.0 + e.high * 24.0),
                orbit_rate: [0.8 + mot * 1.6, 0.7 + mot * 1.4],
            }
        })
        .collect();

    VizParams {
        fog_fade: 0.18 + distance * 0.34,
        grid: GridLayer {
            line_count: 14 + (e.high * 20.0).floor() as u32,
            line_alpha: 0.045 + e.high * 0.085,
            wobble: motion * 18.0 + e.bass * 22.0,
            focus_x: 0.5 + (focus - 0.5) * 0.75,
            focus_alpha: 0.06 + e.high * 0.16,
        },
        waterfall: WaterfallLayer {
            alpha: 0.22 + room * 0.20,
            block_height: 0.26 + distance * 0.24,
            row_gain: (0.70 + e.high * 0.9) * (1.0 - distance * 0.28),
            rgb_split: motion > 0.55,
        },
        particles: ParticleLayer {
            focus_x: 0.5 + (focus - 0.5) * 0.90,
            pull: (0.0008 + e.mid * 0.0027) * (0.35 + room * 0.65),
            speed: 0.44 + motion * 2.3 + e.high * 1.5,
            jitter: distance * 0.55 + 0.08,
            heading_bias: e.bass * 2.1 - e.high * 1.55 + motion * 1.75,
            size_gain: 0.75 + e.rms * 2.2 + e.bass * 1.2,
            alpha_boost: e.high * 0.10,
            link_radius: 78.0 + room * 220.0,
            link_count: 34 + (e.high * 120.0).floor() as u32,
            links_enabled: e.high > 0.20,
        },
        scope: ScopeLayer {
            amplitude: (22.0 + e.bass * 120.0 + e.rms * 140.0) * (0.75 + (1.0 - distance) * 0.55),
            x_scale: 0.24 + room * 0.45,
            rotation_depth: motion * 0.35,
            phase_offset: ((motion * 0.35 + e.high * 0.25) * 180.0).floor() as u32,
            line_width: 1.5 + e.bass * 2.2,
            alpha: 0.08 + e.high * 0.10,
            ghost_offset: 6.0 + motion * 14.0,
        },
        glitch: GlitchLayer {
            scanline_count: 6 + (e.high * 16.0).floor() as u32,
            scanline_alpha: 0.02 + e.high * 0.05,
            scanline_wobble: 2.0 + motion * 6.0,
            slice_chance: 0.008 + motion * 0.02 + e.bass * 0.02,
            slice_shift: 1.0 + motion,
        },
        cube: CubeLayer {
            scale: (0.55 + room * 0.85) * (1.0 + e.bass * 0.28),
            depth: 0.55 + room * 0.55,
            glow: 0.06 + (1.0 - distance) * 0.08,
            fill_alpha: 0.02 + room * 0.03,
            wobble: e.high * 8.0 + e.rms * 10.0,
        },
        actors,
    }
}
