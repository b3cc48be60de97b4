//! Structured response contract with the model.
//!
//! [`response_schema`] is sent with every request so the model answers with a
//! fixed JSON object; [`parse_assessment`] turns that text back into an
//! [`Assessment`].

use crate::models::{Assessment, RiskLevel};
use serde_json::{json, Value};
use thiserror::Error;

pub const RESPONSE_MIME_TYPE: &str = "application/json";
pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("model output is not valid assessment JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(u8),
}

/// Gemini schema for the assessment object
pub fn response_schema() -> Value {
    let risk_levels: Vec<&str> = RiskLevel::ALL.iter().map(|l| l.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "riskLevel": {
                "type": "STRING",
                "enum": risk_levels,
                "description": "The overall risk assessment level."
            },
            "summary": {
                "type": "STRING",
                "description": "A concise, one-sentence summary of the findings."
            },
            "score": {
                "type": "INTEGER",
                "description": "A risk score from 0 (safe) to 100 (highly malicious)."
            },
            "details": {
                "type": "OBJECT",
                "properties": {
                    "domainAge": {
                        "type": "STRING",
                        "description": "Analysis of the domain's registration age. Note if it is suspiciously new (e.g., less than 6 months old)."
                    },
                    "domainAnalysis": {
                        "type": "STRING",
                        "description": "Detailed analysis of the domain name, TLD, and subdomains (excluding age)."
                    },
                    "urlStructure": {
                        "type": "STRING",
                        "description": "Analysis of the URL path, query parameters, and overall structure."
                    },
                    "contentClues": {
                        "type": "STRING",
                        "description": "Inference about potential content based on the URL."
                    },
                    "threatIntelligence": {
                        "type": "STRING",
                        "description": "Comparison against known threat patterns and intelligence."
                    }
                },
                "required": ["domainAge", "domainAnalysis", "urlStructure", "contentClues", "threatIntelligence"]
            }
        },
        "required": ["riskLevel", "summary", "score", "details"]
    })
}

pub fn parse_assessment(text: &str) -> Result<Assessment, AssessmentError> {
    let assessment: Assessment = serde_json::from_str(text.trim())?;
    if assessment.score > MAX_SCORE {
        return Err(AssessmentError::ScoreOutOfRange(assessment.score));
    }
    Ok(assessment)
}
