//! Pointer, wheel and pinch input -> direct ControlState overwrites.
//!
//! Drags are relative: the touched parameters are frozen at gesture start
//! and the pointer's travel is added to that baseline, so grabbing a control
//! picks it up where it is instead of jumping to the pointer.

use crate::constants::*;
use crate::drift::Activity;
use crate::layout::SurfaceLayout;
use crate::state::{ControlState, Macro};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureTarget {
    /// The ROOM cube.
    Macro,
    Voice(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    None,
    MacroDrag,
    VoiceDrag,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Baseline {
    Room(f32),
    Voice { index: usize, pos: f32, dist: f32 },
}

/// One active drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionState {
    origin: Vec2,
    baseline: Baseline,
}

impl InteractionState {
    pub fn mode(&self) -> GestureMode {
        match self.baseline {
            Baseline::Room(_) => GestureMode::MacroDrag,
            Baseline::Voice { .. } => GestureMode::VoiceDrag,
        }
    }

    pub fn voice_index(&self) -> Option<usize> {
        match self.baseline {
            Baseline::Voice { index, .. } => Some(index),
            Baseline::Room(_) => None,
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }
}

#[derive(Debug)]
pub struct InteractionAdapter {
    gesture: Option<InteractionState>,
    pinch_base_room: f32,
}

impl Default for InteractionAdapter {
    fn default() -> Self {
        Self {
            gesture: None,
            pinch_base_room: DEFAULT_ROOM,
        }
    }
}

impl InteractionAdapter {
    pub fn mode(&self) -> GestureMode {
        self.gesture.map_or(GestureMode::None, |g| g.mode())
    }

    pub fn gesture(&self) -> Option<&InteractionState> {
        self.gesture.as_ref()
    }

    /// Begin a drag on `target`, freezing its current values as the baseline.
    /// Returns false (and changes nothing) for an unknown voice.
    pub fn on_gesture_start(
        &mut self,
        target: GestureTarget,
        origin: Vec2,
        controls: &ControlState,
        activity: &mut Activity,
        now: f64,
    ) -> bool {
        let baseline = match target {
            GestureTarget::Macro => Baseline::Room(controls.room()),
            GestureTarget::Voice(index) => match controls.voice(index) {
                Some(v) => Baseline::Voice {
                    index,
                    pos: v.pos(),
                    dist: v.dist(),
                },
                None => return false,
            },
        };
        self.gesture = Some(InteractionState { origin, baseline });
        activity.hold(now);
        log::info!("[input] begin {:?} drag", target);
        true
    }

    /// Apply the pointer's travel since gesture start. No-op without a gesture.
    pub fn on_gesture_move(
        &mut self,
        current: Vec2,
        layout: &SurfaceLayout,
        controls: &mut ControlState,
        activity: &mut Activity,
        now: f64,
    ) -> bool {
        let Some(g) = self.gesture else {
            return false;
        };
        let size = layout.safe_size();
        match g.baseline {
            Baseline::Room(room0) => {
                // drag up = bigger room
                let dy = (g.origin.y - current.y) / size.y;
                controls.set(Macro::Room, room0 + dy * CUBE_DRAG_GAIN);
            }
            Baseline::Voice { index, pos, dist } => {
                let Some(v) = controls.voice_mut(index) else {
                    return false;
                };
                let d = (current - g.origin) / size;
                v.set_pos(pos + d.x * VOICE_POS_DRAG_GAIN);
                // drag up = nearer = smaller dist
                v.set_dist(dist + d.y * VOICE_DIST_DRAG_GAIN);
            }
        }
        activity.mark_active(now);
        true
    }

    pub fn on_gesture_end(&mut self, activity: &mut Activity) {
        if let Some(g) = self.gesture.take() {
            log::info!("[input] end {:?}", g.mode());
        }
        activity.release();
    }

    /// Two-finger scroll: distance; shift: motion; ctrl (pinch on trackpads): room.
    pub fn on_wheel(
        &mut self,
        delta_y: f32,
        modifiers: Modifiers,
        controls: &mut ControlState,
        activity: &mut Activity,
        now: f64,
    ) {
        let dy = delta_y.clamp(-WHEEL_DELTA_CLAMP, WHEEL_DELTA_CLAMP) / WHEEL_DIVISOR;
        if modifiers.ctrl {
            controls.nudge(Macro::Room, -dy);
        } else if modifiers.shift {
            controls.nudge(Macro::Motion, -dy);
        } else {
            controls.nudge(Macro::Distance, dy);
        }
        activity.mark_active(now);
    }

    pub fn on_pinch_start(&mut self, controls: &ControlState, activity: &mut Activity, now: f64) {
        self.pinch_base_room = controls.room();
        activity.mark_active(now);
    }

    /// `scale` is the gesture's cumulative scale factor (1 = unchanged).
    pub fn on_pinch_change(
        &mut self,
        scale: f32,
        controls: &mut ControlState,
        activity: &mut Activity,
        now: f64,
    ) {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        let amount = (scale.clamp(PINCH_SCALE_MIN, PINCH_SCALE_MAX) - 1.0) * PINCH_GAIN;
        controls.set(Macro::Room, self.pinch_base_room + amount);
        activity.mark_active(now);
    }

    pub fn on_pinch_end(&mut self, activity: &mut Activity, now: f64) {
        activity.mark_active(now);
    }
}
