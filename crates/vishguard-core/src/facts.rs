//! Scenario tags and their fact-check matrices.
//!
//! The fact matrix grounds the judge's grading and doubles as the fallback
//! advice block when the model returns nothing usable.

/// Which drill scenario the transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioType {
    /// Fake loan-refinancing call.
    Loan,
    /// Prosecutor-impersonation call.
    Prosecutor,
}

impl Default for ScenarioType {
    fn default() -> Self {
        ScenarioType::Prosecutor
    }
}

impl ScenarioType {
    /// Parse a scenario label; anything unrecognized falls back to
    /// [`ScenarioType::Prosecutor`].
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "loan" => ScenarioType::Loan,
            _ => ScenarioType::Prosecutor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Loan => "loan",
            ScenarioType::Prosecutor => "prosecutor",
        }
    }
}

/// Ground truth for the loan-scam scenario.
pub const LOAN_FACT_MATRIX: &str = r#"[대출 사기 팩트체크]
1. 기존 대출 상환 요구: 은행은 절대 개인 계좌 입금을 요구하지 않음.
2. 위약금/전산 락: 전형적인 사기 수법.
3. 앱 설치: 문자로 온 URL 설치는 100% 해킹."#;

/// Ground truth for the prosecutor-impersonation scenario.
pub const PROSECUTOR_FACT_MATRIX: &str = r#"[검찰 사칭 팩트체크]
1. 이중구속 파훼: '구속 vs 약식' 강요는 사기.
2. 자산 검수: 존재하지 않는 절차.
3. 공무집행방해: 전화 끊는다고 체포 안 됨."#;

/// Total lookup: every scenario maps to a fixed fact block.
pub fn fact_matrix(scenario: ScenarioType) -> &'static str {
    match scenario {
        ScenarioType::Loan => LOAN_FACT_MATRIX,
        ScenarioType::Prosecutor => PROSECUTOR_FACT_MATRIX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parse() {
        assert_eq!(ScenarioType::from_str("loan"), ScenarioType::Loan);
        assert_eq!(ScenarioType::from_str("  Loan "), ScenarioType::Loan);
        assert_eq!(ScenarioType::from_str("prosecutor"), ScenarioType::Prosecutor);
        assert_eq!(ScenarioType::from_str(""), ScenarioType::Prosecutor);
        assert_eq!(ScenarioType::from_str("unknown"), ScenarioType::Prosecutor);
    }

    #[test]
    fn test_fact_matrix_total() {
        assert!(fact_matrix(ScenarioType::Loan).contains("대출 사기"));
        assert!(fact_matrix(ScenarioType::Prosecutor).contains("검찰 사칭"));
    }
}
