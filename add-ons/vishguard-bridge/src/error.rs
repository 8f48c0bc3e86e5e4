//! Per-request bridge errors, reported as `{ok:false, error}` payloads.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("sessionId and userProfile are required for init")]
    InitFieldsMissing,

    #[error("sessionId and userInput are required for chat")]
    ChatFieldsMissing,

    #[error("Unknown action")]
    UnknownAction,

    #[error("simulator unavailable: {0}")]
    SimulatorUnavailable(String),

    #[error("simulator failure: {0}")]
    Simulator(String),
}
