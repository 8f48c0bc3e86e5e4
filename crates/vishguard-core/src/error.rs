//! Error types for the judging pipeline.

use thiserror::Error;

/// Result type alias for judge operations.
pub type JudgeResult<T> = Result<T, JudgeError>;

/// Failures raised while obtaining a verdict from the judgment model.
///
/// None of these escape [`crate::FeedbackAgent::analyze`]; the agent folds
/// every variant into the fixed failure report.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("no OpenRouter API key configured")]
    MissingApiKey,

    #[error("judge request failed: {0}")]
    Request(String),

    #[error("judge API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("judge returned a malformed verdict: {0}")]
    Malformed(String),
}
