// Score Aggregator
// Folds triggered signal weights into a bounded score and maps it to a risk label.

use serde::{Deserialize, Serialize};

use super::catalog::Signal;

/// Score before any signal contributes
pub const BASE_SCORE: i32 = 20;
pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

const HIGH_RISK_THRESHOLD: u8 = 70;
const MEDIUM_RISK_THRESHOLD: u8 = 40;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Low risk")]
    Low,
    #[serde(rename = "Medium risk")]
    Medium,
    #[serde(rename = "High risk")]
    High,
}

impl RiskLabel {
    /// Threshold ladder, evaluated high to low
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLabel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Low => "Low risk",
            RiskLabel::Medium => "Medium risk",
            RiskLabel::High => "High risk",
        }
    }
}

/// `clamp(BASE_SCORE + sum of triggered weights, 0, 100)`
///
/// Every triggered signal counts, including ones that are later cut from the
/// reported signal list.
pub fn aggregate_score(signals: &[Signal]) -> u8 {
    let total = signals
        .iter()
        .filter(|s| s.triggered)
        .fold(BASE_SCORE, |acc, s| acc.saturating_add(s.weight));
    total.clamp(MIN_SCORE, MAX_SCORE) as u8
}
