// Analysis Errors
// Failure taxonomy shared by the heuristic and assistant paths

use thiserror::Error;

use crate::services::providers::ProviderError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Missing text")]
    InvalidInput,
    #[error(
        "OPENAI_API_KEY is not set (or is still YOUR_KEY_HERE). Export your real key and restart the server."
    )]
    ConfigurationMissing,
    #[error("{0}")]
    UpstreamFailure(String),
}

impl AnalysisError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput => "invalid_input",
            AnalysisError::ConfigurationMissing => "configuration_missing",
            AnalysisError::UpstreamFailure(_) => "upstream_failure",
        }
    }

    /// Whether the caller is at fault (client error) or the service is (server error)
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidInput)
    }
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        AnalysisError::UpstreamFailure(err.to_string())
    }
}

/// Trim input text, rejecting empty or whitespace-only input
pub fn require_text(text: &str) -> Result<&str, AnalysisError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidInput);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("  hello \n"), Ok("hello"));
        assert_eq!(require_text(""), Err(AnalysisError::InvalidInput));
        assert_eq!(require_text(" \t\n "), Err(AnalysisError::InvalidInput));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AnalysisError::InvalidInput.kind(), "invalid_input");
        assert_eq!(AnalysisError::ConfigurationMissing.kind(), "configuration_missing");
        assert!(AnalysisError::InvalidInput.is_client_error());
        assert!(!AnalysisError::UpstreamFailure("x".to_string()).is_client_error());
    }

    #[test]
    fn test_provider_error_maps_to_upstream() {
        let err: AnalysisError = ProviderError::ApiError {
            status: 401,
            message: "bad key".to_string(),
        }
        .into();
        assert_eq!(
            err,
            AnalysisError::UpstreamFailure("API error: 401 - bad key".to_string())
        );
    }
}
