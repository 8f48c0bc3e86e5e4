//! The scored, explained evaluation of a drill transcript.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Secondary analysis fields attached to a verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    /// Free-text sentiment label (e.g. "취약함", "시스템 오류").
    pub sentiment: String,
    /// Risk-behavior keywords; grows monotonically during correction.
    pub risk_keywords: Vec<String>,
    /// How much control the trainee kept. 0 = total loss, higher = better.
    pub dominance_score: i64,
}

/// The judge's evaluation of one transcript; after correction, the final
/// result handed to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerdictReport {
    /// Defense quality, 0–100.
    pub score: i64,
    pub summary: String,
    pub good_points: Vec<String>,
    pub bad_points: Vec<String>,
    pub advice: String,
    pub detailed_analysis: DetailedAnalysis,
}

impl VerdictReport {
    /// Coerce a loosely-typed judge reply into a report.
    ///
    /// The model output is untrusted: any missing or mis-typed field becomes
    /// a safe empty default instead of an error. The correction pass runs on
    /// the result, so a half-empty report is still serviceable.
    pub fn from_value(value: &Value) -> Self {
        let detail = value.get("detailed_analysis");
        Self {
            score: int_field(value, "score"),
            summary: str_field(value, "summary"),
            good_points: list_field(value, "good_points"),
            bad_points: list_field(value, "bad_points"),
            advice: str_field(value, "advice"),
            detailed_analysis: DetailedAnalysis {
                sentiment: detail.map(|d| str_field(d, "sentiment")).unwrap_or_default(),
                risk_keywords: detail
                    .map(|d| list_field(d, "risk_keywords"))
                    .unwrap_or_default(),
                dominance_score: detail
                    .map(|d| int_field(d, "dominance_score"))
                    .unwrap_or_default(),
            },
        }
    }

    /// Fixed report returned when the judge call fails entirely.
    pub fn failure(error_text: &str) -> Self {
        Self {
            score: 0,
            summary: "분석 실패".to_string(),
            good_points: Vec::new(),
            bad_points: Vec::new(),
            advice: format!("오류: {error_text}"),
            detailed_analysis: DetailedAnalysis {
                sentiment: "시스템 오류".to_string(),
                risk_keywords: Vec::new(),
                dominance_score: 0,
            },
        }
    }
}

fn int_field(value: &Value, key: &str) -> i64 {
    value
        .get(key)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn list_field(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
