//! Drill-call transcript: ordered turns of a simulated phishing conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who spoke a turn: the scam-caller simulator or the trainee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    Caller,
    User,
}

impl fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerRole::Caller => write!(f, "caller"),
            SpeakerRole::User => write!(f, "user"),
        }
    }
}

/// A single turn of the call (who, what).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallTurn {
    pub role: SpeakerRole,
    pub text: String,
}

impl CallTurn {
    pub fn new(role: SpeakerRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Serialize the turns for the judge's user message.
pub fn turns_to_json(turns: &[CallTurn]) -> String {
    serde_json::to_string(turns).unwrap_or_else(|_| "[]".to_string())
}

/// Flatten the whole transcript into one text blob for marker scanning.
///
/// Every turn is included regardless of speaker; the disclosure scan runs
/// over caller framing too.
pub fn flatten_turns(turns: &[CallTurn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_includes_every_role() {
        let turns = vec![
            CallTurn::new(SpeakerRole::Caller, "서울중앙지검입니다"),
            CallTurn::new(SpeakerRole::User, "누구시라고요?"),
        ];
        let flat = flatten_turns(&turns);
        assert!(flat.contains("caller: 서울중앙지검입니다"));
        assert!(flat.contains("user: 누구시라고요?"));
    }

    #[test]
    fn test_turns_to_json_roundtrip() {
        let turns = vec![CallTurn::new(SpeakerRole::User, "앱 설치했어요")];
        let json = turns_to_json(&turns);
        let back: Vec<CallTurn> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].text, "앱 설치했어요");
        assert_eq!(back[0].role, SpeakerRole::User);
    }
}
