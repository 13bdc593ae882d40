// Detection Module
// Misinformation risk engine organized into specialized submodules:
// - catalog: Pattern catalog and signal detector
// - scoring: Folds signal weights into a bounded score and risk label
// - heuristic: Builds the deterministic heuristic assessment
// - assistant: Delegates analysis to an external text generator with schema fallback
// - error: Failure taxonomy shared by both paths

pub mod catalog;
pub mod scoring;
pub mod heuristic;
pub mod assistant;
pub mod error;

// Re-export commonly used functions
pub use catalog::{detect_signals, evaluate_catalog, Signal, SignalCategory, MAX_REPORTED_SIGNALS};
pub use scoring::{aggregate_score, RiskLabel};
pub use heuristic::{analyze, VERIFICATION_TIPS};
pub use assistant::{build_instruction, parse_reply, AssistantAnalyzer};
pub use error::AnalysisError;
