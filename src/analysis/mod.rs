//! Analysis Client
//!
//! Sends one URL to the model under a fixed instruction and response schema,
//! normalizes the structured answer into an [`AnalysisResult`] and keeps the
//! result cache current.
//!
//! ## Failure policy
//!
//! When the live call fails the connectivity probe is consulted:
//! - offline: the cached entry for the exact URL is served with
//!   `is_cached = true`; a miss (or an unreadable entry) is a network error;
//! - online: the failure is classified into an API or unknown error and the
//!   cache is never touched.
//!
//! Nothing is retried.

pub mod classify;
pub mod prompt;
pub mod schema;
pub mod submission;

pub use classify::classify_failure;
pub use submission::{Submission, SubmissionTracker};

use crate::cache::{FileStore, KeyValueStore, MemoryStore, ResultCache};
use crate::config::{CacheBackend, Config};
use crate::connectivity::{ConnectivityProbe, StaticConnectivity, TcpProbe};
use crate::llm::{GoogleAdapter, LLMAdapter};
use crate::models::{AnalysisResult, Assessment};
use crate::types::{AppResult, LLMError, LLMMessage, LLMRequest};
use schema::AssessmentError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why a live analysis produced no assessment
#[derive(Debug, Error)]
enum LiveFailure {
    #[error(transparent)]
    Service(#[from] LLMError),

    #[error(transparent)]
    Malformed(#[from] AssessmentError),
}

#[derive(Clone)]
pub struct Analyzer {
    llm: Arc<dyn LLMAdapter>,
    cache: ResultCache,
    connectivity: Arc<dyn ConnectivityProbe>,
    model: String,
}

impl Analyzer {
    pub fn new(
        llm: Arc<dyn LLMAdapter>,
        cache: ResultCache,
        connectivity: Arc<dyn ConnectivityProbe>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            cache,
            connectivity,
            model: model.into(),
        }
    }

    /// Wires the Gemini adapter, the configured cache backend and a
    /// connectivity probe aimed at the model service host.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let adapter = GoogleAdapter::from_config(&config.llm)?;

        let store: Arc<dyn KeyValueStore> = match config.cache.backend {
            CacheBackend::File => Arc::new(FileStore::with_path(config.cache.dir.clone())),
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let connectivity: Arc<dyn ConnectivityProbe> = if config.connectivity.force_offline {
            warn!("PHISHGUARD_OFFLINE set, live failures will always take the cache path");
            Arc::new(StaticConnectivity(false))
        } else {
            match adapter.endpoint() {
                Some((host, port)) => Arc::new(TcpProbe::new(
                    host,
                    port,
                    Duration::from_millis(config.connectivity.probe_timeout_ms),
                )),
                None => {
                    warn!(api_base = %config.llm.api_base, "Cannot derive probe target, assuming online");
                    Arc::new(StaticConnectivity(true))
                }
            }
        };

        Ok(Self::new(
            Arc::new(adapter),
            ResultCache::new(store),
            connectivity,
            config.llm.model.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Analyzes `url`, which must already be a normalized absolute URL.
    pub async fn analyze(&self, url: &str) -> AppResult<AnalysisResult> {
        info!(url = %url, "Analyzing URL");

        match self.run_live(url).await {
            Ok(assessment) => {
                let result = AnalysisResult::from_assessment(url, assessment);

                if let Err(e) = self.cache.store(&result) {
                    warn!(url = %url, error = %e, "Failed to cache analysis result");
                }

                info!(
                    url = %url,
                    risk_level = %result.risk_level,
                    score = result.score,
                    "Analysis complete"
                );
                Ok(result)
            }
            Err(failure) => {
                error!(url = %url, error = %failure, "Error analyzing URL");
                self.recover(url, failure).await
            }
        }
    }

    /// Runs [`Analyzer::analyze`] under a fresh submission ticket.
    ///
    /// Returns `Ok(None)` when a newer submission started on the same tracker
    /// before this one finished; its result or error is dropped.
    pub async fn analyze_latest(
        &self,
        tracker: &SubmissionTracker,
        url: &str,
    ) -> AppResult<Option<AnalysisResult>> {
        let submission = tracker.begin();
        let outcome = self.analyze(url).await;

        if !tracker.is_current(submission) {
            debug!(url = %url, generation = submission.generation(), "Discarding superseded analysis");
            return Ok(None);
        }

        outcome.map(Some)
    }

    async fn run_live(&self, url: &str) -> Result<Assessment, LiveFailure> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt::build_prompt(url))],
            max_tokens: None,
            temperature: None,
            system_instruction: Some(prompt::SYSTEM_INSTRUCTION.to_string()),
            response_mime_type: Some(schema::RESPONSE_MIME_TYPE.to_string()),
            response_schema: Some(schema::response_schema()),
        };

        let response = self.llm.create_chat_completion(&request).await?;
        debug!(
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Model responded"
        );

        Ok(schema::parse_assessment(&response.content)?)
    }

    async fn recover(&self, url: &str, failure: LiveFailure) -> AppResult<AnalysisResult> {
        if !self.connectivity.is_online().await {
            match self.cache.load(url) {
                Ok(Some(cached)) => {
                    info!(url = %url, cached_at = ?cached.cached_at, "Serving from cache");
                    return Ok(cached);
                }
                Ok(None) => debug!(url = %url, "No cached result for offline fallback"),
                Err(e) => warn!(url = %url, error = %e, "Failed to retrieve or parse from cache"),
            }
            return Err(classify::offline_error());
        }

        match failure {
            LiveFailure::Service(e) => Err(classify_failure(&e.to_string())),
            LiveFailure::Malformed(_) => Err(classify::unknown_error()),
        }
    }
}
