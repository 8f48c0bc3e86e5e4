//! Session bridge: line-delimited JSON requests in, one response per line out.
//!
//! Each input line is an independent request envelope. The loop parses,
//! dispatches, writes, and flushes one line fully before reading the next;
//! a failing request answers `{ok:false, error}` and never tears down the
//! loop. Sessions live in a map owned by the bridge for the process
//! lifetime; the same session id always observes the same simulator.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::BridgeError;
use crate::simulator::{Simulator, SimulatorFactory};

/// Profile used when a chat arrives for an unknown session without one.
pub const DEFAULT_USER_PROFILE: &str =
    r#"{"user_profile": {"name": "사용자", "scenario_type": "default"}}"#;

/// Request envelope. The `id` is echoed verbatim into the response so the
/// caller can correlate; it may be any JSON value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeRequest {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    user_profile: Option<String>,
    #[serde(default)]
    user_input: Option<String>,
}

pub struct SessionBridge<F: SimulatorFactory> {
    factory: F,
    sessions: HashMap<String, Box<dyn Simulator>>,
}

impl<F: SimulatorFactory> SessionBridge<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            sessions: HashMap::new(),
        }
    }

    /// Read requests until EOF, answering each on its own line, in order.
    pub async fn run_loop<R, W>(&mut self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut out = serde_json::to_string(&response)
                .unwrap_or_else(|_| r#"{"id":null,"ok":false,"error":"unserializable response"}"#.to_string());
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }
        Ok(())
    }

    /// Handle one raw input line. Blank lines yield `None`; everything else
    /// yields exactly one response carrying the request's id (or null when
    /// the envelope itself did not parse).
    pub async fn handle_line(&mut self, line: &str) -> Option<Value> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let request: BridgeRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request line");
                return Some(json!({ "id": null, "ok": false, "error": format!("invalid request: {e}") }));
            }
        };

        let payload = match self.dispatch(&request).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "request failed");
                json!({ "ok": false, "error": e.to_string() })
            }
        };

        Some(with_id(payload, &request.id))
    }

    async fn dispatch(&mut self, request: &BridgeRequest) -> Result<Value, BridgeError> {
        match request.action.as_deref() {
            Some("init") => self.handle_init(request),
            Some("chat") => self.handle_chat(request).await,
            _ => Err(BridgeError::UnknownAction),
        }
    }

    fn handle_init(&mut self, request: &BridgeRequest) -> Result<Value, BridgeError> {
        let (session_id, profile) = match (&request.session_id, &request.user_profile) {
            (Some(s), Some(p)) => (s.as_str(), p.as_str()),
            _ => return Err(BridgeError::InitFieldsMissing),
        };
        self.ensure_session(session_id, profile)?;
        Ok(json!({ "ok": true }))
    }

    async fn handle_chat(&mut self, request: &BridgeRequest) -> Result<Value, BridgeError> {
        let session_id = request
            .session_id
            .as_deref()
            .ok_or(BridgeError::ChatFieldsMissing)?;
        let user_input = request
            .user_input
            .as_deref()
            .ok_or(BridgeError::ChatFieldsMissing)?;
        let profile = request.user_profile.as_deref().unwrap_or(DEFAULT_USER_PROFILE);

        let simulator = self.ensure_session(session_id, profile)?;
        let turn = simulator.chat_turn(user_input).await?;

        let audio_b64 = turn.audio.as_deref().map(|bytes| STANDARD.encode(bytes));
        Ok(json!({
            "ok": true,
            "responseText": turn.response_text,
            "status": turn.status,
            "audioBase64": audio_b64,
        }))
    }

    /// Create-on-first-reference: one simulator per session id, stable for
    /// the process lifetime.
    fn ensure_session(
        &mut self,
        session_id: &str,
        profile_json: &str,
    ) -> Result<&mut Box<dyn Simulator>, BridgeError> {
        match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!(session_id, "creating simulator session");
                Ok(entry.insert(self.factory.create(profile_json)?))
            }
        }
    }
}

fn with_id(mut payload: Value, id: &Value) -> Value {
    if let Some(object) = payload.as_object_mut() {
        object.insert("id".to_string(), id.clone());
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{SimulatorTurn, UnavailableFactory};
    use async_trait::async_trait;

    struct MockSimulator {
        profile_json: String,
        turns_taken: u32,
        audio: Option<Vec<u8>>,
    }

    #[async_trait]
    impl Simulator for MockSimulator {
        async fn chat_turn(&mut self, user_input: &str) -> Result<SimulatorTurn, BridgeError> {
            self.turns_taken += 1;
            Ok(SimulatorTurn {
                response_text: format!(
                    "turn {} reply to: {} [profile: {}]",
                    self.turns_taken, user_input, self.profile_json
                ),
                status: "ongoing".to_string(),
                audio: self.audio.clone(),
            })
        }
    }

    struct MockFactory {
        audio: Option<Vec<u8>>,
    }

    impl SimulatorFactory for MockFactory {
        fn create(&self, profile_json: &str) -> Result<Box<dyn Simulator>, BridgeError> {
            Ok(Box::new(MockSimulator {
                profile_json: profile_json.to_string(),
                turns_taken: 0,
                audio: self.audio.clone(),
            }))
        }
    }

    fn bridge() -> SessionBridge<MockFactory> {
        SessionBridge::new(MockFactory { audio: None })
    }

    #[tokio::test]
    async fn test_init_ok_and_id_echo() {
        let mut bridge = bridge();
        let response = bridge
            .handle_line(r#"{"id": 7, "action": "init", "sessionId": "s1", "userProfile": "{}"}"#)
            .await
            .unwrap();
        assert_eq!(response["ok"], json!(true));
        assert_eq!(response["id"], json!(7));
    }

    #[tokio::test]
    async fn test_init_missing_fields() {
        let mut bridge = bridge();
        let response = bridge
            .handle_line(r#"{"id": "a", "action": "init", "sessionId": "s1"}"#)
            .await
            .unwrap();
        assert_eq!(response["ok"], json!(false));
        assert_eq!(response["id"], json!("a"));
        assert_eq!(
            response["error"],
            json!("sessionId and userProfile are required for init")
        );
    }

    #[tokio::test]
    async fn test_chat_lazily_creates_session_with_default_profile() {
        let mut bridge = bridge();
        let response = bridge
            .handle_line(r#"{"id": 1, "action": "chat", "sessionId": "s9", "userInput": "여보세요"}"#)
            .await
            .unwrap();
        assert_eq!(response["ok"], json!(true));
        assert_eq!(response["status"], json!("ongoing"));
        assert_eq!(response["audioBase64"], json!(null));
        let text = response["responseText"].as_str().unwrap();
        assert!(text.contains("여보세요"));
        // Lazy creation used the default profile.
        assert!(text.contains("scenario_type"));
        assert!(bridge.sessions.contains_key("s9"));
    }

    #[tokio::test]
    async fn test_chat_reuses_same_session_instance() {
        let mut bridge = bridge();
        bridge
            .handle_line(r#"{"id": 1, "action": "chat", "sessionId": "s1", "userInput": "a"}"#)
            .await
            .unwrap();
        let second = bridge
            .handle_line(r#"{"id": 2, "action": "chat", "sessionId": "s1", "userInput": "b"}"#)
            .await
            .unwrap();
        assert!(second["responseText"].as_str().unwrap().starts_with("turn 2"));
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let mut bridge = bridge();
        let first = r#"{"id": 1, "action": "init", "sessionId": "s1", "userProfile": "{\"a\":1}"}"#;
        let again = r#"{"id": 2, "action": "init", "sessionId": "s1", "userProfile": "{\"a\":2}"}"#;
        assert_eq!(bridge.handle_line(first).await.unwrap()["ok"], json!(true));
        assert_eq!(bridge.handle_line(again).await.unwrap()["ok"], json!(true));
        // First profile wins; the session was not rebuilt.
        assert_eq!(bridge.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_audio_payload_base64_encoded() {
        let mut bridge = SessionBridge::new(MockFactory {
            audio: Some(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        });
        let response = bridge
            .handle_line(r#"{"id": 1, "action": "chat", "sessionId": "s1", "userInput": "x"}"#)
            .await
            .unwrap();
        let encoded = response["audioBase64"].as_str().unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let mut bridge = bridge();
        let response = bridge
            .handle_line(r#"{"id": 3, "action": "reset"}"#)
            .await
            .unwrap();
        assert_eq!(response["ok"], json!(false));
        assert_eq!(response["error"], json!("Unknown action"));
        assert_eq!(response["id"], json!(3));
    }

    #[tokio::test]
    async fn test_blank_line_skipped() {
        let mut bridge = bridge();
        assert!(bridge.handle_line("   ").await.is_none());
        assert!(bridge.handle_line("").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_line_answers_with_null_id() {
        let mut bridge = bridge();
        let response = bridge.handle_line("{not json").await.unwrap();
        assert_eq!(response["ok"], json!(false));
        assert_eq!(response["id"], json!(null));
        assert!(response["error"].as_str().unwrap().contains("invalid request"));
    }

    #[tokio::test]
    async fn test_unavailable_factory_reports_per_request() {
        let mut bridge = SessionBridge::new(UnavailableFactory::new("backend not linked"));
        let response = bridge
            .handle_line(r#"{"id": 1, "action": "chat", "sessionId": "s1", "userInput": "x"}"#)
            .await
            .unwrap();
        assert_eq!(response["ok"], json!(false));
        assert!(response["error"].as_str().unwrap().contains("backend not linked"));
    }

    #[tokio::test]
    async fn test_run_loop_isolation_and_ordering() {
        let mut bridge = bridge();
        let input = concat!(
            "{\"id\": 1, \"action\": \"init\", \"sessionId\": \"s1\", \"userProfile\": \"{}\"}\n",
            "{broken\n",
            "\n",
            "{\"id\": 2, \"action\": \"chat\", \"sessionId\": \"s1\", \"userInput\": \"hi\"}\n",
        );
        let mut output: Vec<u8> = Vec::new();
        bridge
            .run_loop(input.as_bytes(), &mut output)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        // Blank line produced no response; the broken line did not stop the loop.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], json!(1));
        assert_eq!(lines[0]["ok"], json!(true));
        assert_eq!(lines[1]["id"], json!(null));
        assert_eq!(lines[1]["ok"], json!(false));
        assert_eq!(lines[2]["id"], json!(2));
        assert_eq!(lines[2]["ok"], json!(true));
    }

    #[tokio::test]
    async fn test_supplied_profile_reaches_the_factory() {
        let mut bridge = bridge();
        let response = bridge
            .handle_line(
                r#"{"id": 1, "action": "chat", "sessionId": "s1", "userInput": "x", "userProfile": "{\"name\":\"김\"}"}"#,
            )
            .await
            .unwrap();
        assert!(response["responseText"].as_str().unwrap().contains("김"));
    }
}
