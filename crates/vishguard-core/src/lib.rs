//! vishguard-core: post-hoc evaluation of simulated voice-phishing calls.
//!
//! A completed drill transcript goes through two layers:
//! 1. an LLM judge (OpenRouter, OpenAI-compatible chat completions) that
//!    grades the trainee's defense and returns a structured [`VerdictReport`];
//! 2. a deterministic correction pass ([`correct`]) that re-scans the raw
//!    transcript for fatal disclosure phrases and overrides the judge when
//!    the transcript proves the trainee was already compromised before
//!    hanging up.
//!
//! The corrector only lowers scores, never raises them: it is a safety net
//! against false leniency, not a second opinion.

mod agent;
mod config;
mod corrector;
mod error;
mod facts;
mod judge;
pub mod prompts;
mod transcript;
mod verdict;

pub use agent::FeedbackAgent;
pub use config::UserConfig;
pub use corrector::{correct, CLAMPED_SCORE, CLAMP_THRESHOLD, FATAL_TRIGGERS, MIN_ADVICE_CHARS};
pub use error::{JudgeError, JudgeResult};
pub use facts::{fact_matrix, ScenarioType};
pub use judge::{request_verdict, JudgeBackend, JudgeClient};
pub use transcript::{flatten_turns, turns_to_json, CallTurn, SpeakerRole};
pub use verdict::{DetailedAnalysis, VerdictReport};
