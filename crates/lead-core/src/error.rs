use thiserror::Error;

/// Everything that can go wrong before the frame loop starts.
///
/// Once a session is running nothing in the core is fallible; out-of-range
/// values are clamped where they are computed instead of being reported.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("session needs at least one voice")]
    NoVoices,
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("fetch failed: {url} :: {reason}")]
    Fetch { url: String, reason: String },
    #[error("HTTP {status} {status_text} :: {url}")]
    Http {
        url: String,
        status: u16,
        status_text: String,
    },
    #[error("decode failed: {url} :: {reason}")]
    Decode { url: String, reason: String },
}
