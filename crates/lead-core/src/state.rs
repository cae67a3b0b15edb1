//! Control state mutated by interaction and drift, read by the mapper.
//!
//! Every field is private and every setter clamps, so the declared ranges
//! hold after any mutation regardless of who performed it.

use crate::constants::*;
use crate::error::StartupError;
use smallvec::SmallVec;

/// The four macro knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Macro {
    Room,
    Distance,
    Motion,
    Focus,
}

/// Per-voice spatial and character parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceParams {
    level: f32,
    pos: f32,
    dist: f32,
    width: f32,
    motion: f32,
    focus: f32,
}

impl VoiceParams {
    /// Defaults for a source whose home stereo position is `base_pos`.
    pub fn new(base_pos: f32) -> Self {
        Self {
            level: DEFAULT_VOICE_LEVEL,
            pos: clamp_finite(base_pos, -1.0, 1.0, 0.0),
            dist: DEFAULT_VOICE_DIST,
            width: DEFAULT_VOICE_WIDTH,
            motion: DEFAULT_VOICE_MOTION,
            focus: DEFAULT_VOICE_FOCUS,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }
    pub fn pos(&self) -> f32 {
        self.pos
    }
    pub fn dist(&self) -> f32 {
        self.dist
    }
    pub fn width(&self) -> f32 {
        self.width
    }
    pub fn motion(&self) -> f32 {
        self.motion
    }
    pub fn focus(&self) -> f32 {
        self.focus
    }

    pub fn set_level(&mut self, v: f32) {
        self.level = clamp_finite(v, 0.0, VOICE_LEVEL_MAX, self.level);
    }
    pub fn set_pos(&mut self, v: f32) {
        self.pos = clamp_finite(v, -1.0, 1.0, self.pos);
    }
    pub fn set_dist(&mut self, v: f32) {
        self.dist = clamp_finite(v, 0.0, 1.0, self.dist);
    }
    pub fn set_width(&mut self, v: f32) {
        self.width = clamp_finite(v, 0.0, 1.0, self.width);
    }
    pub fn set_motion(&mut self, v: f32) {
        self.motion = clamp_finite(v, 0.0, 1.0, self.motion);
    }
    pub fn set_focus(&mut self, v: f32) {
        self.focus = clamp_finite(v, 0.0, 1.0, self.focus);
    }
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Macro controls plus a fixed-length set of voices.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlState {
    room: f32,
    distance: f32,
    motion: f32,
    focus: f32,
    voices: SmallVec<[VoiceParams; 4]>,
}

impl ControlState {
    /// Session-default macros with the given voices. The voice count is fixed
    /// for the lifetime of the state.
    pub fn new(voices: impl IntoIterator<Item = VoiceParams>) -> Result<Self, StartupError> {
        let voices: SmallVec<[VoiceParams; 4]> = voices.into_iter().collect();
        if voices.is_empty() {
            return Err(StartupError::NoVoices);
        }
        Ok(Self {
            room: DEFAULT_ROOM,
            distance: DEFAULT_DISTANCE,
            motion: DEFAULT_MOTION,
            focus: DEFAULT_FOCUS,
            voices,
        })
    }

    /// Default voices at the given home positions.
    pub fn with_base_positions(base_positions: &[f32]) -> Result<Self, StartupError> {
        Self::new(base_positions.iter().map(|&p| VoiceParams::new(p)))
    }

    pub fn room(&self) -> f32 {
        self.room
    }
    pub fn distance(&self) -> f32 {
        self.distance
    }
    pub fn motion(&self) -> f32 {
        self.motion
    }
    pub fn focus(&self) -> f32 {
        self.focus
    }

    pub fn get(&self, which: Macro) -> f32 {
        match which {
            Macro::Room => self.room,
            Macro::Distance => self.distance,
            Macro::Motion => self.motion,
            Macro::Focus => self.focus,
        }
    }

    pub fn set(&mut self, which: Macro, v: f32) {
        let slot = match which {
            Macro::Room => &mut self.room,
            Macro::Distance => &mut self.distance,
            Macro::Motion => &mut self.motion,
            Macro::Focus => &mut self.focus,
        };
        *slot = clamp_finite(v, 0.0, 1.0, *slot);
    }

    /// Add `delta` to a macro, clamping the result.
    pub fn nudge(&mut self, which: Macro, delta: f32) {
        self.set(which, self.get(which) + delta);
    }

    pub fn voices(&self) -> &[VoiceParams] {
        &self.voices
    }

    pub fn voice(&self, index: usize) -> Option<&VoiceParams> {
        self.voices.get(index)
    }

    /// Mutable access to one voice; the collection itself cannot grow or shrink.
    pub fn voice_mut(&mut self, index: usize) -> Option<&mut VoiceParams> {
        self.voices.get_mut(index)
    }

    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut VoiceParams> {
        self.voices.iter_mut()
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

// NaN keeps the previous value; everything else is clamped into range.
#[inline]
fn clamp_finite(v: f32, lo: f32, hi: f32, prev: f32) -> f32 {
    if v.is_nan() {
        prev
    } else {
        v.clamp(lo, hi)
    }
}
