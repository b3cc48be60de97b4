use axum::{extract::State, routing::get, Json, Router};

use crate::config::CacheBackend;
use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = match state.config.cache.backend {
        CacheBackend::File => "file",
        CacheBackend::Memory => "memory",
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model: state.analyzer.model().to_string(),
        cache: cache.to_string(),
    })
}
