//! API Routes
//!
//! - `/api/analyze` - URL phishing analysis (POST body or `?url=` query)
//! - `/api/health` - Health check

pub mod analyze;
pub mod health;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(analyze::router(state.clone()))
        .merge(health::router(state))
        .layer(TraceLayer::new_for_http());

    apply_cors(api_router, &origins)
}
