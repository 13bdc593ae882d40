// HTTP API
// Thin axum layer over the detection engine: liveness check plus the two analysis routes

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AnalyzeRequest, AssistantOutcome, ErrorResponse, HealthResponse, HeuristicAssessment};
use crate::services::detection::{self, AnalysisError, AssistantAnalyzer};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub assistant: AssistantAnalyzer,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze_text))
        .route("/analyze-llm", post(analyze_with_assistant))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    Analysis(AnalysisError),
    /// Body was not a readable JSON request (wrong content type, malformed, too large)
    Rejected(JsonRejection),
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        ApiError::Analysis(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Analysis(err) => {
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (
                    status,
                    ErrorResponse {
                        error: err.to_string(),
                        kind: err.kind().to_string(),
                    },
                )
            }
            ApiError::Rejected(rejection) => (
                rejection.status(),
                ErrorResponse {
                    error: rejection.body_text(),
                    kind: "invalid_request".to_string(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

fn request_text(payload: Result<Json<AnalyzeRequest>, JsonRejection>) -> Result<String, ApiError> {
    payload.map(|Json(req)| req.text).map_err(ApiError::Rejected)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// `POST /analyze`: heuristic path
pub async fn analyze_text(
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<HeuristicAssessment>, ApiError> {
    let request_id = Uuid::new_v4();
    let text = request_text(payload)?;

    match detection::analyze(&text) {
        Ok(result) => {
            info!(
                %request_id,
                chars = text.chars().count(),
                score = result.score,
                label = result.label.as_str(),
                "[API] analyze.ok"
            );
            Ok(Json(result))
        }
        Err(e) => {
            warn!(%request_id, kind = e.kind(), "[API] analyze.rejected");
            Err(e.into())
        }
    }
}

/// `POST /analyze-llm`: assistant path
pub async fn analyze_with_assistant(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AssistantOutcome>, ApiError> {
    let request_id = Uuid::new_v4();
    let text = request_text(payload)?;

    match state.assistant.analyze(&text).await {
        Ok(outcome) => {
            info!(
                %request_id,
                chars = text.chars().count(),
                fallback = outcome.is_fallback(),
                "[API] analyze_llm.ok"
            );
            Ok(Json(outcome))
        }
        Err(e) => {
            warn!(%request_id, kind = e.kind(), error = %e, "[API] analyze_llm.failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{ChatResult, ProviderError, TextGenerator};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _instruction: &str) -> Result<ChatResult, ProviderError> {
            Ok(ChatResult {
                content: self.0.to_string(),
                latency_ms: 0,
            })
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _instruction: &str) -> Result<ChatResult, ProviderError> {
            Err(ProviderError::ApiError {
                status: 503,
                message: "upstream unavailable".to_string(),
            })
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    fn body(text: &str) -> Result<Json<AnalyzeRequest>, JsonRejection> {
        Ok(Json(AnalyzeRequest {
            text: text.to_string(),
        }))
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn state_with(generator: Arc<dyn TextGenerator>) -> State<AppState> {
        State(AppState {
            assistant: AssistantAnalyzer::with_generator(generator),
        })
    }

    #[tokio::test]
    async fn test_health() {
        let Json(resp) = health().await;
        assert!(resp.ok);
    }

    #[tokio::test]
    async fn test_analyze_ok() {
        let response = analyze_text(body("Experts said the results were preliminary and unclear."))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert_eq!(value["score"], 10);
        assert_eq!(value["label"], "Low risk");
        assert_eq!(value["tips"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_analyze_empty_is_bad_request() {
        let response = analyze_text(body("   ")).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let value = json_body(response).await;
        assert_eq!(value["error"], "Missing text");
        assert_eq!(value["kind"], "invalid_input");
    }

    #[tokio::test]
    async fn test_analyze_llm_without_key_is_server_error() {
        let state = State(AppState {
            assistant: AssistantAnalyzer::unconfigured(),
        });
        let response = analyze_with_assistant(state, body("some claim"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["kind"], "configuration_missing");
    }

    #[tokio::test]
    async fn test_analyze_llm_empty_is_bad_request() {
        let state = State(AppState {
            assistant: AssistantAnalyzer::unconfigured(),
        });
        let response = analyze_with_assistant(state, body("")).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_llm_fallback_shape() {
        let state = state_with(Arc::new(FixedGenerator("Sorry, I can't produce JSON today.")));
        let response = analyze_with_assistant(state, body("some claim"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert_eq!(value["risk"], "Medium");
        assert_eq!(value["raw"], "Sorry, I can't produce JSON today.");
        assert_eq!(value["suggestedSearchQueries"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_analyze_llm_structured_shape() {
        let reply = r#"{"risk":"Low","summary":"ok","redFlags":[],"whatToVerify":["date"],
            "suggestedSearchQueries":[],"trustedSourceTypes":["court records"],"neutralRewrite":"x"}"#;
        let state = state_with(Arc::new(FixedGenerator(reply)));
        let response = analyze_with_assistant(state, body("some claim"))
            .await
            .into_response();

        let value = json_body(response).await;
        assert_eq!(value["risk"], "Low");
        assert_eq!(value["whatToVerify"][0], "date");
        assert!(value.get("raw").is_none());
    }

    #[tokio::test]
    async fn test_analyze_llm_upstream_failure_carries_message() {
        let state = state_with(Arc::new(FailingGenerator));
        let response = analyze_with_assistant(state, body("some claim"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let value = json_body(response).await;
        assert_eq!(value["kind"], "upstream_failure");
        assert!(value["error"].as_str().unwrap().contains("upstream unavailable"));
    }

    #[test]
    fn test_router_builds() {
        let _router = router(AppState {
            assistant: AssistantAnalyzer::unconfigured(),
        });
    }

    async fn post_analyze(body: impl Into<Body>) -> Response {
        let app = router(AppState {
            assistant: AssistantAnalyzer::unconfigured(),
        });
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_routed_analyze_ok() {
        let response = post_analyze(r#"{"text": "URGENT: share this before it's deleted!"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["score"], 40);
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_request() {
        let response = post_analyze("{not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let value = json_body(response).await;
        assert_eq!(value["kind"], "invalid_request");
        assert!(!value["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_is_invalid_request() {
        let text = "a".repeat(MAX_BODY_BYTES + 1024);
        let payload = serde_json::to_vec(&serde_json::json!({ "text": text })).unwrap();
        assert!(payload.len() > MAX_BODY_BYTES);

        let response = post_analyze(payload).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["kind"], "invalid_request");
    }

    #[tokio::test]
    async fn test_body_just_under_limit_is_accepted() {
        let text = "a".repeat(MAX_BODY_BYTES - 64);
        let payload = serde_json::to_vec(&serde_json::json!({ "text": text })).unwrap();
        assert!(payload.len() <= MAX_BODY_BYTES);

        let response = post_analyze(payload).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
