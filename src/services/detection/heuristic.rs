// Heuristic Assessment Builder
// Deterministic, dependency-free scoring route: catalog -> score -> assessment

use tracing::debug;

use crate::models::{HeuristicAssessment, RiskLabel};

use super::catalog::{detect_signals, reported_labels};
use super::error::{require_text, AnalysisError};
use super::scoring::aggregate_score;

/// Static verification guidance, independent of which signals fired
pub const VERIFICATION_TIPS: [&str; 3] = [
    "Look for a primary source (official statement, study, data).",
    "Check if multiple reputable outlets report the same core facts.",
    "Be cautious with screenshots/quotes without context.",
];

/// Score `text` with the pattern catalog.
///
/// Fails only with [`AnalysisError::InvalidInput`] when the trimmed text is empty.
pub fn analyze(text: &str) -> Result<HeuristicAssessment, AnalysisError> {
    let text = require_text(text)?;

    let signals = detect_signals(text);
    let score = aggregate_score(&signals);
    let label = RiskLabel::from_score(score);

    debug!(
        "[HEURISTIC] chars={} triggered={} score={} label={}",
        text.chars().count(),
        signals.len(),
        score,
        label.as_str()
    );

    Ok(HeuristicAssessment {
        score,
        label,
        signals: reported_labels(&signals),
        tips: VERIFICATION_TIPS.iter().map(|t| t.to_string()).collect(),
    })
}
