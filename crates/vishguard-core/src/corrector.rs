//! Ground-truth correction of a raw judge verdict.
//!
//! The judge is unreliable at penalizing a trainee who hung up *after*
//! already installing an app, submitting a form, or wiring money. This pass
//! re-checks the raw transcript for literal disclosure phrases and forces
//! the verdict into line with what the transcript proves. It only ever
//! lowers a score; a harsh judge verdict is left standing.

use crate::verdict::VerdictReport;

/// Literal phrases proving irreversible compromise before the hang-up.
///
/// Matching is plain case-sensitive substring search over the flattened
/// transcript. No tokenization, no negation handling: "설치 안 했어요" still
/// trips the scan, failing safe toward suspicion.
pub const FATAL_TRIGGERS: [&str; 8] = [
    "눌렀어요",
    "깔았어요",
    "설치",
    "제출",
    "비밀번호",
    "입금",
    "보냈어요",
    "작성",
];

/// Raw scores above this are clamped when the transcript shows compromise.
pub const CLAMP_THRESHOLD: i64 = 30;
/// The clamped score for a compromised call the judge graded leniently.
pub const CLAMPED_SCORE: i64 = 10;
/// Advice shorter than this many characters is replaced with the fact matrix.
pub const MIN_ADVICE_CHARS: usize = 20;

const COMPROMISED_SENTIMENT: &str = "취약함 (사후약방문)";
const COMPROMISED_SUMMARY: &str =
    "마지막에 전화를 끊으셨지만, 이미 위험한 행동(앱 설치/제출)을 하셨기에 사실상 모든 정보가 탈취되었습니다.";

/// Correct `report` in place against the flattened transcript text.
///
/// `fact_matrix` backfills the advice field when the judge left it empty or
/// too short to be useful.
pub fn correct(report: &mut VerdictReport, log_text: &str, fact_matrix: &str) {
    let mut is_compromised = false;

    for trigger in FATAL_TRIGGERS {
        if log_text.contains(trigger) {
            is_compromised = true;
            let keywords = &mut report.detailed_analysis.risk_keywords;
            if !keywords.iter().any(|k| k == trigger) {
                keywords.push(trigger.to_string());
            }
        }
    }

    if is_compromised {
        // Hang-up does not undo the disclosure; cancel any lenient grade.
        if report.score > CLAMP_THRESHOLD {
            report.score = CLAMPED_SCORE;
        }
        report.detailed_analysis.dominance_score = 1;
        report.detailed_analysis.sentiment = COMPROMISED_SENTIMENT.to_string();

        if !report.summary.contains("이미") {
            report.summary = COMPROMISED_SUMMARY.to_string();
        }
    }

    if report.advice.chars().count() < MIN_ADVICE_CHARS {
        report.advice = fact_matrix.trim().to_string();
    }
}
