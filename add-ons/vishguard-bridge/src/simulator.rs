//! The simulator seam: the conversation engine the bridge drives.
//!
//! The bridge owns session lifetimes but never looks inside a simulator; a
//! backend implements these traits and is wired in at startup. When no
//! backend is linked, [`UnavailableFactory`] keeps the bridge responsive and
//! reports the reason per request.

use async_trait::async_trait;

use crate::error::BridgeError;

/// One simulator reply: scammer line, drill status, optional synthesized audio.
pub struct SimulatorTurn {
    pub response_text: String,
    pub status: String,
    pub audio: Option<Vec<u8>>,
}

/// A live conversation simulator bound to one session.
#[async_trait]
pub trait Simulator: Send {
    async fn chat_turn(&mut self, user_input: &str) -> Result<SimulatorTurn, BridgeError>;
}

/// Builds a simulator from a JSON-encoded user profile.
pub trait SimulatorFactory: Send {
    fn create(&self, profile_json: &str) -> Result<Box<dyn Simulator>, BridgeError>;
}

/// Factory installed when no simulator backend is available. Every create
/// fails with the recorded reason; the read loop stays up.
pub struct UnavailableFactory {
    reason: String,
}

impl UnavailableFactory {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SimulatorFactory for UnavailableFactory {
    fn create(&self, _profile_json: &str) -> Result<Box<dyn Simulator>, BridgeError> {
        Err(BridgeError::SimulatorUnavailable(self.reason.clone()))
    }
}
