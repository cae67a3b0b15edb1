pub mod constants;
pub mod curve;
pub mod diagnostics;
pub mod drift;
pub mod energy;
pub mod error;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod mapper;
pub mod session;
pub mod state;
pub mod transient;
pub mod viz;

pub use curve::*;
pub use diagnostics::DebugLog;
pub use drift::{Activity, DriftEngine, DriftInput, DriftMode};
pub use energy::AudioEnergyReading;
pub use error::StartupError;
pub use interaction::{GestureMode, GestureTarget, InteractionAdapter, InteractionState, Modifiers};
pub use ir::{synthesize, ImpulseResponseBuffer, ImpulseResponseConfig};
pub use layout::{HitTarget, SurfaceLayout};
pub use mapper::{map_parameters, ParamId, ParameterVector, VoiceChannelParams, VoiceParamId};
pub use session::{Frame, Session, SessionConfig, StemConfig};
pub use state::{ControlState, Macro, VoiceParams};
pub use transient::{FlowClock, TransientDetector};
pub use viz::VizParams;
