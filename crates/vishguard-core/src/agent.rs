//! FeedbackAgent: the public analyze contract.
//!
//! Judge first, then ground-truth correction. `analyze` is total: every
//! judge failure folds into the fixed failure report, never an error.

use crate::corrector::correct;
use crate::facts::{fact_matrix, ScenarioType};
use crate::judge::{request_verdict, JudgeBackend, JudgeClient};
use crate::transcript::{flatten_turns, CallTurn};
use crate::verdict::VerdictReport;

/// Orchestrates judge → corrector for one transcript at a time.
pub struct FeedbackAgent<B: JudgeBackend = JudgeClient> {
    backend: B,
}

impl FeedbackAgent<JudgeClient> {
    /// Agent backed by the OpenRouter judge; `None` without an API key.
    pub fn from_env() -> Option<Self> {
        JudgeClient::from_env().map(Self::new)
    }
}

impl<B: JudgeBackend> FeedbackAgent<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Evaluate a completed (or in-progress) drill transcript.
    ///
    /// Always returns a well-formed report. On judge failure the report is
    /// [`VerdictReport::failure`] with the error text in the advice field.
    pub async fn analyze(&self, turns: &[CallTurn], scenario: ScenarioType) -> VerdictReport {
        let facts = fact_matrix(scenario);

        match request_verdict(&self.backend, turns, scenario).await {
            Ok(mut report) => {
                correct(&mut report, &flatten_turns(turns), facts);
                tracing::info!(
                    scenario = scenario.as_str(),
                    score = report.score,
                    "transcript analyzed"
                );
                report
            }
            Err(e) => {
                tracing::warn!(error = %e, "judge unavailable; returning failure report");
                VerdictReport::failure(&e.to_string())
            }
        }
    }
}
