// Access-token authentication
//
// The model credential never leaves the server. Callers present an opaque
// bearer token that is checked against ACCESS_TOKENS when AUTH_MODE=token.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::config::{AuthConfig, AuthMode};
use crate::models::AppState;
use crate::types::AppError;

pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    authorize(&state.config.auth, header)?;
    Ok(next.run(req).await)
}

/// Checks an `Authorization` header value against the configured tokens
pub fn authorize(auth: &AuthConfig, header: Option<&str>) -> Result<(), AppError> {
    if auth.mode == AuthMode::None {
        return Ok(());
    }

    let token = header
        .and_then(bearer_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("A bearer access token is required.".to_string()))?;

    if verify_token(token, &auth.access_tokens) {
        Ok(())
    } else {
        warn!("Rejected request with unknown access token");
        Err(AppError::Auth("The access token is not valid.".to_string()))
    }
}

/// Token part of a `Bearer` credential; the scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Checks every configured token so the time taken does not depend on which one matched.
pub fn verify_token(token: &str, allowed: &[String]) -> bool {
    allowed
        .iter()
        .fold(false, |found, candidate| constant_time_eq(candidate.as_bytes(), token.as_bytes()) | found)
}

/// Byte comparison whose running time depends only on the input lengths
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = u8::from(a.len() != b.len());

    for i in 0..len {
        let byte_a = a.get(i).copied().unwrap_or(0);
        let byte_b = b.get(i).copied().unwrap_or(0);
        diff |= byte_a ^ byte_b;
    }

    diff == 0
}
