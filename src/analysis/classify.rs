//! Maps live-call failures onto the caller-facing error taxonomy.

use crate::types::AppError;

pub const OFFLINE_MESSAGE: &str =
    "You appear to be offline. Please check your internet connection and try again.";
pub const INVALID_KEY_MESSAGE: &str =
    "The configured API key is invalid. Please check the key and try again.";
pub const QUOTA_MESSAGE: &str = "The API quota has been exceeded. Please try again later.";
pub const UNKNOWN_MESSAGE: &str =
    "An unexpected error occurred while communicating with the analysis service. Please try again.";

const INVALID_KEY_MARKERS: [&str; 2] = ["api key not valid", "invalid_api_key"];
const QUOTA_MARKER: &str = "quota";

/// Classifies a failure seen while the network was reachable.
///
/// Matching is case-insensitive and credential problems win over quota.
pub fn classify_failure(message: &str) -> AppError {
    let message = message.to_lowercase();

    if INVALID_KEY_MARKERS.iter().any(|marker| message.contains(marker)) {
        return AppError::Api(INVALID_KEY_MESSAGE.to_string());
    }
    if message.contains(QUOTA_MARKER) {
        return AppError::Api(QUOTA_MESSAGE.to_string());
    }

    unknown_error()
}

pub fn offline_error() -> AppError {
    AppError::Network(OFFLINE_MESSAGE.to_string())
}

pub fn unknown_error() -> AppError {
    AppError::Unknown(UNKNOWN_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn test_invalid_key_variants() {
        for message in [
            "model service error (400): API key not valid. Please pass a valid API key. [INVALID_ARGUMENT]",
            "reason: INVALID_API_KEY",
        ] {
            let err = classify_failure(message);
            assert_eq!(err.kind(), ErrorKind::ApiError);
            assert_eq!(err.message(), INVALID_KEY_MESSAGE);
        }
    }

    #[test]
    fn test_quota() {
        let err = classify_failure("model service error (429): You exceeded your current Quota [RESOURCE_EXHAUSTED]");
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.message(), QUOTA_MESSAGE);
    }

    #[test]
    fn test_credential_wins_over_quota() {
        let err = classify_failure("api key not valid and quota exceeded");
        assert_eq!(err.message(), INVALID_KEY_MESSAGE);
    }

    #[test]
    fn test_everything_else_is_unknown() {
        for message in ["model service error (500): internal", "connection reset by peer", ""] {
            let err = classify_failure(message);
            assert_eq!(err.kind(), ErrorKind::Unknown);
            assert_eq!(err.message(), UNKNOWN_MESSAGE);
        }
    }

    #[test]
    fn test_offline_error() {
        let err = offline_error();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.title(), "Network Error");
    }
}
