// Misinfo Risk Core Services

pub mod config_store;
pub mod providers;
pub mod detection;

pub use config_store::*;
pub use providers::*;

// Re-export detection module functions
pub use detection::{
    analyze,
    detect_signals,
    AnalysisError,
    AssistantAnalyzer,
    RiskLabel,
    SignalCategory,
};
