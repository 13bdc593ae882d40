// Misinfo Risk Data Models
// Wire shapes shared by the engine, the HTTP layer and the CLI

use serde::{Deserialize, Deserializer, Serialize};

pub use crate::services::detection::scoring::RiskLabel;

// ============ Requests ============

/// Body of `/analyze` and `/analyze-llm`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalyzeRequest {
    /// Missing or non-string values read as empty text
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

// ============ Heuristic Assessment ============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeuristicAssessment {
    pub score: u8,
    pub label: RiskLabel,
    pub signals: Vec<String>,
    pub tips: Vec<String>,
}

// ============ Assistant Assessment ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AssistantRisk {
    Low,
    Medium,
    High,
}

/// Structured analysis returned by the text-generation assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantAssessment {
    pub risk: AssistantRisk,
    pub summary: String,
    pub red_flags: Vec<String>,
    pub what_to_verify: Vec<String>,
    pub suggested_search_queries: Vec<String>,
    pub trusted_source_types: Vec<String>,
    pub neutral_rewrite: String,
    /// Further fields the assistant added, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Conservative result used when the assistant reply cannot be read as an assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FallbackAssessment {
    #[serde(flatten)]
    pub assessment: AssistantAssessment,
    pub raw: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AssistantOutcome {
    // Fallback first: it is the only variant carrying `raw`
    Fallback(FallbackAssessment),
    Structured(AssistantAssessment),
}

impl AssistantOutcome {
    pub fn risk(&self) -> AssistantRisk {
        match self {
            AssistantOutcome::Structured(a) => a.risk,
            AssistantOutcome::Fallback(f) => f.assessment.risk,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AssistantOutcome::Fallback(_))
    }
}

// ============ Service Responses ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tolerates_missing_or_wrong_type() {
        let req: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.text, "");
        let req: AnalyzeRequest = serde_json::from_str(r#"{"text": 42}"#).unwrap();
        assert_eq!(req.text, "");
        let req: AnalyzeRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(req.text, "hi");
    }

    #[test]
    fn test_fallback_serializes_flat() {
        let outcome = AssistantOutcome::Fallback(FallbackAssessment {
            assessment: AssistantAssessment {
                risk: AssistantRisk::Medium,
                summary: "s".to_string(),
                red_flags: vec![],
                what_to_verify: vec![],
                suggested_search_queries: vec![],
                trusted_source_types: vec![],
                neutral_rewrite: String::new(),
                extra: serde_json::Map::new(),
            },
            raw: "not json".to_string(),
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["risk"], "Medium");
        assert_eq!(value["raw"], "not json");
        assert!(value["redFlags"].as_array().unwrap().is_empty());
        assert_eq!(value["neutralRewrite"], "");
        assert_eq!(value.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_extra_assessment_fields_serialize_flat() {
        let reply = r#"{"risk":"Low","summary":"s","redFlags":[],"whatToVerify":[],
            "suggestedSearchQueries":[],"trustedSourceTypes":[],"neutralRewrite":"",
            "confidence":"low"}"#;
        let assessment: AssistantAssessment = serde_json::from_str(reply).unwrap();
        assert_eq!(assessment.extra["confidence"], "low");

        let value = serde_json::to_value(AssistantOutcome::Structured(assessment)).unwrap();
        assert_eq!(value["confidence"], "low");
        assert!(value.get("extra").is_none());
    }
}
