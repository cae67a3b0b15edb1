// Host-side constants for the browser front end. Mapping and drift tuning
// lives in lead_core::constants.

// DOM element ids
pub const CANVAS_ID: &str = "viz";
pub const OVERLAY_ID: &str = "overlay";
pub const START_BUTTON_ID: &str = "start";
pub const STATUS_ID: &str = "status";
pub const DEBUG_ID: &str = "debug";

pub const STATUS_LOADING: &str = "Loading...";
pub const STATUS_PLAYING: &str =
    "Playing - drag cube(ROOM), scroll(DIST), shift+scroll(MOTION), drag actors(STEMS)";
pub const STATUS_FAILED: &str = "Error: check assets/drum.wav and assets/synthesizer.wav";

// Canvas backing store
pub const DPR_MAX: f64 = 2.0;

// Master chain
pub const MASTER_INITIAL_GAIN: f32 = 0.82;
pub const ANALYSER_FFT_SIZE: u32 = 2048;
pub const ANALYSER_SMOOTHING: f64 = 0.86;

#[derive(Clone, Copy, Debug)]
pub struct CompressorSettings {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack_sec: f32,
    pub release_sec: f32,
}

pub const MASTER_COMPRESSOR: CompressorSettings = CompressorSettings {
    threshold_db: -18.0,
    knee_db: 24.0,
    ratio: 5.0,
    attack_sec: 0.006,
    release_sec: 0.14,
};

pub const MASTER_LIMITER: CompressorSettings = CompressorSettings {
    threshold_db: -7.0,
    knee_db: 0.0,
    ratio: 20.0,
    attack_sec: 0.003,
    release_sec: 0.09,
};

// Room bus (initial values are overwritten by the first mapped frame)
pub const ROOM_PREDELAY_MAX_SEC: f64 = 0.35;
pub const ROOM_PREDELAY_INITIAL_SEC: f32 = 0.03;
pub const ROOM_HP_INITIAL_HZ: f32 = 160.0;
pub const ROOM_LP_INITIAL_HZ: f32 = 9000.0;
pub const ROOM_POST_LP_HZ: f32 = 11000.0;
pub const ROOM_WET_INITIAL: f32 = 0.25;
// Wet-only L/R decorrelation
pub const DECORR_MAX_SEC: f64 = 0.03;
pub const DECORR_LEFT_SEC: f32 = 0.011;
pub const DECORR_RIGHT_SEC: f32 = 0.017;
pub const DECORR_GAIN: f32 = 0.92;

// Per-stem chain
pub const STEM_PRE_GAIN: f32 = 0.70;
pub const FOCUS_EQ_Q: f32 = 1.0;
pub const FOCUS_EQ_INITIAL_DB: f32 = 10.0;
pub const FOCUS_EQ_INITIAL_HZ: f32 = 1400.0;
pub const STEM_LP_INITIAL_HZ: f32 = 18000.0;
pub const STEM_LP_Q: f32 = 0.7;
pub const SIDE_DELAY_MAX_SEC: f64 = 0.06;
pub const SIDE_DELAY_INITIAL_SEC: f32 = 0.010;
pub const LFO_INITIAL_HZ: f32 = 0.15;

// Canvas layers
pub const PARTICLE_AREA_PX: f32 = 13000.0; // one particle per this many css px^2
pub const WATERFALL_FADE_ALPHA: f32 = 0.35;
pub const STROBE_FLASH_MIN: f32 = 0.02;
pub const STROBE_FLASH_ALPHA: f32 = 0.12;
pub const LABEL_FONT: &str = "10px ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace";
pub const CUBE_LABEL_FONT: &str =
    "11px ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace";
