// Tuning constants shared by the core and the web frontend.

// Session defaults for the macro controls
pub const DEFAULT_ROOM: f32 = 0.55;
pub const DEFAULT_DISTANCE: f32 = 0.35;
pub const DEFAULT_MOTION: f32 = 0.35;
pub const DEFAULT_FOCUS: f32 = 0.50;

// Per-voice defaults
pub const DEFAULT_VOICE_LEVEL: f32 = 0.85;
pub const DEFAULT_VOICE_DIST: f32 = 0.30;
pub const DEFAULT_VOICE_WIDTH: f32 = 0.55;
pub const DEFAULT_VOICE_MOTION: f32 = 0.35;
pub const DEFAULT_VOICE_FOCUS: f32 = 0.55;
pub const VOICE_LEVEL_MAX: f32 = 1.2;

// Response curve exponents (curve(x, p) = x^p)
pub const ROOM_CURVE: f32 = 1.25;
pub const DISTANCE_CURVE: f32 = 1.60;
pub const MOTION_CURVE: f32 = 1.35;
pub const VOICE_DIST_CURVE: f32 = 1.70;
pub const VOICE_WIDTH_CURVE: f32 = 1.05;
pub const VOICE_MOTION_CURVE: f32 = 1.35;

// Voice/global blend weights. Hand-tuned; keep exact.
pub const MOTION_BLEND_WEIGHT: f32 = 0.6;
pub const FOCUS_BLEND_WEIGHT: f32 = 0.25;

// Idle detection
pub const IDLE_THRESHOLD_SEC: f64 = 0.35;
pub const DRIFT_REFERENCE_FPS: f64 = 60.0;
pub const MIN_FRAME_DT_SEC: f64 = 0.001;
// Clamp for frame gaps (tab switches) so one frame cannot apply minutes of drift
pub const MAX_FRAME_DT_SEC: f64 = 0.25;

// Impulse response defaults (wide, dark-ish hall)
pub const IR_SECONDS: f32 = 3.0;
pub const IR_DECAY: f32 = 3.4;
pub const IR_DAMP_HZ: f32 = 7800.0;
pub const IR_EARLY_REFLECTIONS: usize = 18;
pub const IR_STEREO_WIDTH: f32 = 0.95;
pub const IR_MIN_DAMP_HZ: f32 = 200.0;
pub const IR_EARLY_MIN_SEC: f32 = 0.008;
pub const IR_EARLY_SPAN_SEC: f32 = 0.12;
pub const IR_EARLY_AMP: f32 = 0.36;
pub const IR_WALK_RETAIN: f32 = 0.98;
pub const IR_WALK_STEP: f32 = 0.02;
pub const IR_NOISE_MIX: f32 = 0.92;
pub const IR_WALK_MIX: f32 = 0.60;

// Energy analysis bands (fractions of the analyser's bin range)
pub const BASS_BAND: (f32, f32) = (0.00, 0.12);
pub const MID_BAND: (f32, f32) = (0.12, 0.45);
pub const HIGH_BAND: (f32, f32) = (0.45, 1.00);

// Transient -> strobe
pub const STROBE_THRESHOLD: f32 = 0.030;
pub const STROBE_BASS_THRESHOLD: f32 = 0.028;
pub const STROBE_KICK: f32 = 0.85;
pub const STROBE_DECAY: f32 = 0.86;

// Visual flow clock advance per frame
pub const FLOW_BASE_STEP: f64 = 0.006;
pub const FLOW_MOTION_STEP: f64 = 0.02;
pub const FLOW_HIGH_STEP: f64 = 0.012;

// Interaction scaling
pub const CUBE_DRAG_GAIN: f32 = 1.6;
pub const VOICE_POS_DRAG_GAIN: f32 = 2.2;
pub const VOICE_DIST_DRAG_GAIN: f32 = 1.6;
pub const WHEEL_DELTA_CLAMP: f32 = 160.0;
pub const WHEEL_DIVISOR: f32 = 900.0;
pub const PINCH_SCALE_MIN: f32 = 0.4;
pub const PINCH_SCALE_MAX: f32 = 2.2;
pub const PINCH_GAIN: f32 = 0.65;

// Surface layout (fractions of the surface size)
pub const CUBE_SIZE_FRAC: f32 = 0.22;
pub const CUBE_CENTER: [f32; 2] = [0.5, 0.62];
pub const ACTOR_SPREAD_X: f32 = 0.40;
pub const ACTOR_BASE_Y: f32 = 0.36;
pub const ACTOR_SPREAD_Y: f32 = 0.26;
pub const ACTOR_HIT_RADIUS: f32 = 16.0;
pub const ACTOR_HIT_LEVEL_RADIUS: f32 = 10.0;

// Diagnostics
pub const DEBUG_LOG_CAPACITY: usize = 80;
