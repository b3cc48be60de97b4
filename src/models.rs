use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: Config,
}

/// Coarse verdict returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Malicious,
    /// Also the landing spot for any value the model invents
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Safe,
        RiskLevel::Suspicious,
        RiskLevel::Malicious,
        RiskLevel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Suspicious => "SUSPICIOUS",
            RiskLevel::Malicious => "MALICIOUS",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    pub domain_age: String,
    pub domain_analysis: String,
    pub url_structure: String,
    pub content_clues: String,
    pub threat_intelligence: String,
}

/// The object the model is constrained to return. It never includes the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub score: u8,
    pub details: AnalysisDetails,
}

/// Verdict handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub risk_level: RiskLevel,
    pub score: u8,
    pub summary: String,
    pub details: AnalysisDetails,
    /// Only set when served from the offline cache
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<DateTime<Utc>>,
}

impl AnalysisResult {
    pub fn from_assessment(url: impl Into<String>, assessment: Assessment) -> Self {
        Self {
            url: url.into(),
            risk_level: assessment.risk_level,
            score: assessment.score,
            summary: assessment.summary,
            details: assessment.details,
            is_cached: false,
            cached_at: None,
        }
    }

    pub fn assessment(&self) -> Assessment {
        Assessment {
            risk_level: self.risk_level,
            summary: self.summary.clone(),
            score: self.score,
            details: self.details.clone(),
        }
    }
}

// API Request/Response types

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model: String,
    pub cache: String,
}
