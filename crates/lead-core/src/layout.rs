//! Geometry of the touch surface: the ROOM cube and the per-voice actor nodes.

use crate::constants::*;
use crate::curve::clamp01;
use crate::state::{ControlState, VoiceParams};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.min + self.size;
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }
}

/// What a pointer-down landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Cube,
    Actor(usize),
}

/// Surface size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceLayout {
    pub size: Vec2,
}

impl SurfaceLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    /// Size with each side at least one pixel, for normalizing drag distances.
    #[inline]
    pub fn safe_size(&self) -> Vec2 {
        self.size.max(Vec2::ONE)
    }

    pub fn cube_rect(&self) -> Rect {
        let side = self.size.x.min(self.size.y) * CUBE_SIZE_FRAC;
        let center = Vec2::new(self.size.x * CUBE_CENTER[0], self.size.y * CUBE_CENTER[1]);
        Rect {
            min: center - Vec2::splat(side * 0.5),
            size: Vec2::splat(side),
        }
    }

    /// Actor node centre: x follows `pos`, y follows `dist` (up = near), with
    /// a small per-voice bob driven by the flow phase.
    pub fn actor_center(&self, voice: &VoiceParams, index: usize, motion: f32, phase: f64) -> Vec2 {
        let bob = (phase * (0.7 + index as f64 * 0.17)).sin() as f32 * (2.0 + motion * 8.0);
        Vec2::new(
            self.size.x * 0.5 + voice.pos() * self.size.x * ACTOR_SPREAD_X,
            self.size.y * ACTOR_BASE_Y + (voice.dist() - 0.5) * self.size.y * ACTOR_SPREAD_Y + bob,
        )
    }

    /// Nearest actor whose hit circle contains `p`.
    pub fn hit_actor(&self, controls: &ControlState, phase: f64, p: Vec2) -> Option<usize> {
        let mut best = None::<(usize, f32)>;
        for (i, v) in controls.voices().iter().enumerate() {
            let c = self.actor_center(v, i, controls.motion(), phase);
            let r = ACTOR_HIT_RADIUS + clamp01(v.level()) * ACTOR_HIT_LEVEL_RADIUS;
            let d2 = c.distance_squared(p);
            if d2 < r * r {
                match best {
                    Some((_, bd)) if d2 >= bd => {}
                    _ => best = Some((i, d2)),
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Actors take priority over the cube.
    pub fn hit_test(&self, controls: &ControlState, phase: f64, p: Vec2) -> Option<HitTarget> {
        if let Some(i) = self.hit_actor(controls, phase, p) {
            return Some(HitTarget::Actor(i));
        }
        self.cube_rect().contains(p).then_some(HitTarget::Cube)
    }
}
