//! PhishGuard - URL phishing-risk analysis backed by a structured LLM verdict
//!
//! Library entry points:
//! - [`Analyzer::analyze`] for a single URL, with the offline cache fallback;
//! - [`Analyzer::analyze_latest`] with a [`SubmissionTracker`] when one caller
//!   may submit again before the previous analysis finishes (only the newest
//!   submission's outcome is returned, older ones resolve to `Ok(None)`);
//! - [`create_router`] for the HTTP service.

pub mod config;
pub mod models;
pub mod types;
pub mod llm;
pub mod analysis;
pub mod cache;
pub mod connectivity;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use analysis::{Analyzer, SubmissionTracker};
pub use config::Config;
pub use models::{AnalysisResult, AppState, RiskLevel};
pub use types::{AppError, AppResult, ErrorKind};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
