//! Result Cache
//!
//! Keeps the last successful analysis per exact URL string and hands it back
//! on the offline path. Entries are never expired; each one records when it
//! was written so callers can judge staleness themselves.
//!
//! Every operation returns an explicit `Result`; the analyzer logs and drops
//! cache failures instead of surfacing them.

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

use crate::models::{AnalysisResult, Assessment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const CACHE_KEY_PREFIX: &str = "phishguard:";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cache entry encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Namespaced key for a URL. The URL is used verbatim.
pub fn cache_key(url: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, url)
}

/// What is persisted per URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    url: String,
    #[serde(flatten)]
    assessment: Assessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cached_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Overwrites the entry for `result.url`.
    pub fn store(&self, result: &AnalysisResult) -> Result<(), CacheError> {
        let entry = CacheEntry {
            url: result.url.clone(),
            assessment: result.assessment(),
            cached_at: Some(Utc::now()),
        };
        let value = serde_json::to_string(&entry)?;
        self.store.set(&cache_key(&result.url), &value)?;
        Ok(())
    }

    /// Cached result for `url`, flagged `is_cached`, or `None` on a miss.
    pub fn load(&self, url: &str) -> Result<Option<AnalysisResult>, CacheError> {
        let Some(raw) = self.store.get(&cache_key(url))? else {
            return Ok(None);
        };

        let entry: CacheEntry = serde_json::from_str(&raw)?;
        let mut result = AnalysisResult::from_assessment(url, entry.assessment);
        result.is_cached = true;
        result.cached_at = entry.cached_at;
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisDetails, RiskLevel};
    use tempfile::TempDir;

    fn result(url: &str) -> AnalysisResult {
        AnalysisResult::from_assessment(
            url,
            Assessment {
                risk_level: RiskLevel::Suspicious,
                summary: "Newly registered lookalike domain.".to_string(),
                score: 72,
                details: AnalysisDetails {
                    domain_age: "About two weeks old".to_string(),
                    domain_analysis: "Homoglyph of a bank brand".to_string(),
                    url_structure: "Contains 'login' and 'secure'".to_string(),
                    content_clues: "Likely credential harvesting".to_string(),
                    threat_intelligence: "Matches common kit patterns".to_string(),
                },
            },
        )
    }

    #[test]
    fn test_cache_key_is_prefixed_and_verbatim() {
        assert_eq!(cache_key("https://Example.com/a?b=c"), "phishguard:https://Example.com/a?b=c");
    }

    #[test]
    fn test_store_then_load_flags_cached() {
        let cache = ResultCache::in_memory();
        let original = result("https://examp1e-bank.com/login");
        cache.store(&original).unwrap();

        let loaded = cache.load("https://examp1e-bank.com/login").unwrap().unwrap();
        assert!(loaded.is_cached);
        assert!(loaded.cached_at.is_some());
        assert_eq!(loaded.url, original.url);
        assert_eq!(loaded.assessment(), original.assessment());
    }

    #[test]
    fn test_scheme_difference_is_a_miss() {
        let cache = ResultCache::in_memory();
        cache.store(&result("https://example.com")).unwrap();
        assert!(cache.load("http://example.com").unwrap().is_none());
    }

    #[test]
    fn test_stored_value_has_no_cached_flag() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResultCache::new(store.clone());
        cache.store(&result("https://example.com")).unwrap();

        let raw = store.get("phishguard:https://example.com").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("isCached").is_none());
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["riskLevel"], "SUSPICIOUS");
        assert!(value.get("cachedAt").is_some());
    }

    #[test]
    fn test_entry_without_timestamp_still_loads() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "phishguard:https://legacy.test",
                r#"{"riskLevel":"SAFE","summary":"ok","score":1,"details":{"domainAge":"a","domainAnalysis":"b","urlStructure":"c","contentClues":"d","threatIntelligence":"e"},"url":"https://legacy.test"}"#,
            )
            .unwrap();
        let cache = ResultCache::new(store);

        let loaded = cache.load("https://legacy.test").unwrap().unwrap();
        assert_eq!(loaded.risk_level, RiskLevel::Safe);
        assert!(loaded.cached_at.is_none());
        assert!(loaded.is_cached);
    }

    #[test]
    fn test_malformed_entry_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set("phishguard:https://broken.test", "{not json").unwrap();
        let cache = ResultCache::new(store);

        assert!(matches!(
            cache.load("https://broken.test"),
            Err(CacheError::Encoding(_))
        ));
    }

    #[test]
    fn test_file_backed_cache_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let first = ResultCache::new(Arc::new(FileStore::with_path(temp_dir.path())));
        first.store(&result("https://example.org")).unwrap();

        let second = ResultCache::new(Arc::new(FileStore::with_path(temp_dir.path())));
        let loaded = second.load("https://example.org").unwrap().unwrap();
        assert_eq!(loaded.score, 72);
    }
}
