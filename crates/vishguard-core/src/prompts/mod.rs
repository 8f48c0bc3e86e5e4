//! Prompt templates for the verdict judge.

pub mod verdict_judge;

pub use verdict_judge::{verdict_system_prompt, VERDICT_SYSTEM_TEMPLATE};
