//! Verdict requests against the judgment model (OpenRouter, OpenAI-compatible).
//!
//! The client submits the scenario-conditioned grading instruction plus the
//! serialized transcript and expects a strict JSON object back
//! (`response_format: json_object`, temperature 0). Shape trust stops at the
//! document level: the reply must parse as JSON, after which field-level
//! coercion in [`VerdictReport::from_value`] takes over.
//!
//! API key: `user_config.toml` or `OPENROUTER_API_KEY`. Default model:
//! `openai/gpt-4o-mini`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::UserConfig;
use crate::error::{JudgeError, JudgeResult};
use crate::facts::{fact_matrix, ScenarioType};
use crate::prompts::verdict_system_prompt;
use crate::transcript::{turns_to_json, CallTurn};
use crate::verdict::VerdictReport;

const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_JUDGE_MODEL: &str = "openai/gpt-4o-mini";

// OpenAI-compatible request/response for OpenRouter
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// The seam to the judgment model: system instruction plus serialized
/// transcript in, raw reply text out. [`JudgeClient`] is the production
/// implementation; tests script their own.
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> JudgeResult<String>;
}

/// HTTP client for the judgment model.
pub struct JudgeClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl JudgeClient {
    /// Create a client using key and model from UserConfig, falling back to
    /// environment. Returns `None` if no key is found.
    pub fn from_env() -> Option<Self> {
        let config = UserConfig::load().unwrap_or_default();
        let key = config.get_api_key()?.trim().to_string();
        if key.is_empty() {
            return None;
        }
        let mut client = Self::new(key);
        if let Some(model) = config.get_judge_model() {
            client = client.with_model(&model);
        }
        Some(client)
    }

    /// Create a client with an explicit API key.
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            model: DEFAULT_JUDGE_MODEL.to_string(),
            client,
        }
    }

    /// Set the model (e.g. `openai/gpt-4o-mini`, `anthropic/claude-3.5-sonnet`).
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl JudgeBackend for JudgeClient {
    async fn complete(&self, system: &str, user: &str) -> JudgeResult<String> {
        let url = format!("{}/chat/completions", OPENROUTER_API_BASE);
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.0,
            max_tokens: Some(1024),
            response_format: ResponseFormat { kind: "json_object" },
        };

        let res = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", "https://vishguard.local")
            .header("X-Title", "Vishguard-Judge")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| JudgeError::Request(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(JudgeError::Api { status, body });
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| JudgeError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| JudgeError::Malformed("empty choices in judge response".to_string()))
    }
}

/// Submit the transcript for judgment and coerce the reply into a report.
///
/// Transport, auth, and document-parse failures surface as [`JudgeError`];
/// translating those into a user-visible report is the caller's job.
pub async fn request_verdict<B: JudgeBackend>(
    backend: &B,
    turns: &[CallTurn],
    scenario: ScenarioType,
) -> JudgeResult<VerdictReport> {
    let system = verdict_system_prompt(scenario, fact_matrix(scenario));
    let user = turns_to_json(turns);

    tracing::debug!(scenario = scenario.as_str(), turns = turns.len(), "requesting verdict");

    let content = backend.complete(&system, &user).await?;
    let document: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| JudgeError::Malformed(e.to_string()))?;

    Ok(VerdictReport::from_value(&document))
}
