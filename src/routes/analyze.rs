//! URL analysis endpoint
//!
//! - POST /api/analyze `{"url": "..."}`
//! - GET /api/analyze?url=... (deep links)
//!
//! Input is normalized here before it reaches the analyzer: a missing
//! `http(s)://` prefix becomes `https://`, and the result must parse as an
//! absolute URL with a host.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    middleware,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::middleware::auth_middleware;
use crate::models::{AnalysisResult, AnalyzeRequest, AppState};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(post_analyze).get(get_analyze))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub url: Option<String>,
}

async fn post_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<Json<AnalysisResult>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    run_analysis(&state, &request.url).await
}

async fn get_analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> AppResult<Json<AnalysisResult>> {
    run_analysis(&state, query.url.as_deref().unwrap_or_default()).await
}

async fn run_analysis(state: &AppState, raw_url: &str) -> AppResult<Json<AnalysisResult>> {
    let url = normalize_url(raw_url)?;
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, url = %url, "Analysis request received");

    let result = state.analyzer.analyze(&url).await?;

    info!(request_id = %request_id, cached = result.is_cached, "Analysis response sent");
    Ok(Json(result))
}

/// Trims, defaults the scheme to https and validates the URL.
pub fn normalize_url(input: &str) -> AppResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest("Please enter a URL.".to_string()));
    }

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match url::Url::parse(&candidate) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(candidate),
        _ => Err(AppError::InvalidRequest(
            "Please enter a valid URL (e.g., example.com).".to_string(),
        )),
    }
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, AuthMode};
    use crate::routes::testing::{self, FixedAdapter, ASSESSMENT};
    use crate::types::{ErrorBody, ErrorKind};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("  example.com ").unwrap(), "https://example.com");
        assert_eq!(normalize_url("HTTP://Example.com/a").unwrap(), "HTTP://Example.com/a");
        assert_eq!(normalize_url("http://10.0.0.1/login").unwrap(), "http://10.0.0.1/login");
        assert_eq!(
            normalize_url("").unwrap_err().message(),
            "Please enter a URL."
        );
        assert_eq!(
            normalize_url("https://").unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        assert!(normalize_url("exa mple.com").is_err());
    }

    #[tokio::test]
    async fn test_post_returns_result_with_normalized_url() {
        let state = testing::state(FixedAdapter(Ok(ASSESSMENT.to_string())), true, testing::no_auth());
        let response = router(state).oneshot(post(r#"{"url":"google.com"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value: serde_json::Value = json(response).await;
        assert_eq!(value["url"], "https://google.com");
        assert_eq!(value["riskLevel"], "SAFE");
        assert_eq!(value["score"], 4);
        assert!(value.get("isCached").is_none());
    }

    #[tokio::test]
    async fn test_get_with_query_param() {
        let state = testing::state(FixedAdapter(Ok(ASSESSMENT.to_string())), true, testing::no_auth());
        let request = Request::builder()
            .uri("/api/analyze?url=https%3A%2F%2Fexample.com%2Fpath")
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: AnalysisResult = json(response).await;
        assert_eq!(result.url, "https://example.com/path");
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let state = testing::state(FixedAdapter(Ok(ASSESSMENT.to_string())), true, testing::no_auth());

        let response = router(state.clone()).oneshot(post(r#"{"url":"   "}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = json(response).await;
        assert_eq!(body.kind, ErrorKind::InvalidRequest);

        let response = router(state).oneshot(post("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_quota_failure_maps_to_bad_gateway() {
        let adapter = FixedAdapter(Err((429, "Quota exceeded for quota metric".to_string())));
        let state = testing::state(adapter, true, testing::no_auth());
        let response = router(state).oneshot(post(r#"{"url":"https://example.com"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: ErrorBody = json(response).await;
        assert_eq!(body.kind, ErrorKind::ApiError);
        assert_eq!(body.title, "Analysis Failed");
        assert_eq!(body.message, "The API quota has been exceeded. Please try again later.");
    }

    #[tokio::test]
    async fn test_offline_miss_maps_to_service_unavailable() {
        let adapter = FixedAdapter(Err((503, "unreachable".to_string())));
        let state = testing::state(adapter, false, testing::no_auth());
        let response = router(state).oneshot(post(r#"{"url":"https://example.com"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorBody = json(response).await;
        assert_eq!(body.kind, ErrorKind::NetworkError);
        assert_eq!(body.title, "Network Error");
    }

    #[tokio::test]
    async fn test_token_auth_guards_analysis() {
        let auth = AuthConfig {
            mode: AuthMode::Token,
            access_tokens: vec!["session-123".to_string()],
        };
        let state = testing::state(FixedAdapter(Ok(ASSESSMENT.to_string())), true, auth);

        let response = router(state.clone()).oneshot(post(r#"{"url":"example.com"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorBody = json(response).await;
        assert_eq!(body.kind, ErrorKind::Unauthorized);

        let mut request = post(r#"{"url":"example.com"}"#);
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer session-123".parse().unwrap());
        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
