// Type definitions and error enums

use axum::{http::StatusCode, response::IntoResponse, Json};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_instruction: Option<String>,
    /// MIME type the model must answer with, e.g. `application/json`
    pub response_mime_type: Option<String>,
    /// Schema constraining the structured answer (provider-specific dialect)
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user" or "model"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Failures raised by a model adapter before any domain interpretation.
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("request to model service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("model service returned no content")]
    EmptyResponse,

    #[error("failed to decode model service response: {0}")]
    Decode(String),
}

/// Caller-facing error kinds.
///
/// The first three form the analysis taxonomy; the last two are only ever
/// produced at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ApiError,
    NetworkError,
    Unknown,
    InvalidRequest,
    Unauthorized,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ApiError => write!(f, "API_ERROR"),
            ErrorKind::NetworkError => write!(f, "NETWORK_ERROR"),
            ErrorKind::Unknown => write!(f, "UNKNOWN"),
            ErrorKind::InvalidRequest => write!(f, "INVALID_REQUEST"),
            ErrorKind::Unauthorized => write!(f, "UNAUTHORIZED"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    Unknown(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Network(_) => ErrorKind::NetworkError,
            AppError::Api(_) => ErrorKind::ApiError,
            AppError::Unknown(_) => ErrorKind::Unknown,
            AppError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            AppError::Auth(_) => ErrorKind::Unauthorized,
        }
    }

    /// Short heading shown above the message
    pub fn title(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NetworkError => "Network Error",
            ErrorKind::InvalidRequest => "Invalid URL",
            ErrorKind::Unauthorized => "Unauthorized",
            _ => "Analysis Failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NetworkError => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::ApiError => StatusCode::BAD_GATEWAY,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            AppError::Network(m)
            | AppError::Api(m)
            | AppError::Unknown(m)
            | AppError::InvalidRequest(m)
            | AppError::Auth(m) => m,
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub title: String,
    pub message: String,
}

impl From<&AppError> for ErrorBody {
    fn from(error: &AppError) -> Self {
        Self {
            kind: error.kind(),
            title: error.title().to_string(),
            message: error.message().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(ErrorBody::from(&self))).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
