//! API-specific error types
//!
//! Every failure surfaced by [`ApiClient`](super::ApiClient) is an
//! [`ApiError`]. The type is `Clone` because a single refresh failure is
//! fanned out to every request queued behind it.

use std::time::Duration;

use kanflow_domain::constants::REFRESH_EXPIRED_MESSAGE;
use kanflow_domain::types::error_message;
use kanflow_domain::KanflowError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Coarse classification of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401/403 and refresh failures; the user has to sign in again
    Authentication,
    /// Client errors (4xx except auth) and rejected envelopes
    Client,
    /// Server errors (5xx) and undecodable responses
    Server,
    /// Transport failures and timeouts
    Network,
    /// Misconfiguration or local credential store failures
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx response. `payload` holds the server's error body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String, payload: Option<Value> },

    /// 2xx envelope with `success: false`
    #[error("Request rejected: {message}")]
    Rejected { message: String, payload: Option<Value> },

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Token refresh was abandoned before it completed")]
    RefreshAborted,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Credential store error: {0}")]
    Store(String),
}

impl ApiError {
    /// Build an [`ApiError::Http`] from a response status and its body.
    ///
    /// The message comes from the body's `message` field when present, then
    /// from a plain-text body, then from the canonical reason phrase.
    pub fn from_status(status: StatusCode, body: Value) -> Self {
        let message = error_message(&body)
            .or_else(|| body.as_str().filter(|text| !text.is_empty()).map(str::to_owned))
            .unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("request failed").to_string()
            });
        let payload = (!body.is_null()).then_some(body);
        Self::Http { status: status.as_u16(), message, payload }
    }

    /// HTTP status for [`ApiError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided body or envelope payload, when there was one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Http { payload, .. } | Self::Rejected { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Http { status: 401 | 403, .. }
            | Self::RefreshFailed(_)
            | Self::RefreshAborted
            | Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Http { .. } if self.signals_expired_refresh() => {
                ApiErrorCategory::Authentication
            }
            Self::Http { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::Http { .. } | Self::Rejected { .. } | Self::InvalidRequest(_) => {
                ApiErrorCategory::Client
            }
            Self::Decode(_) => ApiErrorCategory::Server,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) | Self::Store(_) => ApiErrorCategory::Config,
        }
    }

    /// The backend reports a dead refresh token with this message, whatever
    /// the status code.
    pub fn signals_expired_refresh(&self) -> bool {
        matches!(self, Self::Http { message, .. } if message == REFRESH_EXPIRED_MESSAGE)
    }

    /// Whether the caller has to sign in again.
    pub fn is_session_terminal(&self) -> bool {
        self.category() == ApiErrorCategory::Authentication
    }
}

impl From<KanflowError> for ApiError {
    fn from(err: KanflowError) -> Self {
        match err {
            KanflowError::Config(message) | KanflowError::Internal(message) => {
                Self::Config(message)
            }
            KanflowError::Storage(message) => Self::Store(message),
            KanflowError::Network(message) => Self::Network(message),
            KanflowError::Auth(message) => Self::Auth(message),
            KanflowError::NotFound(message) | KanflowError::InvalidInput(message) => {
                Self::InvalidRequest(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, Value::Null).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::from_status(StatusCode::NOT_FOUND, Value::Null).category(),
            ApiErrorCategory::Client
        );
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, Value::Null).category(),
            ApiErrorCategory::Server
        );
        assert_eq!(ApiError::Timeout(Duration::from_secs(10)).category(), ApiErrorCategory::Network);
        assert_eq!(ApiError::Store("locked".into()).category(), ApiErrorCategory::Config);
        assert_eq!(ApiError::RefreshAborted.category(), ApiErrorCategory::Authentication);
    }

    #[test]
    fn from_status_prefers_server_message() {
        let err = ApiError::from_status(
            StatusCode::FORBIDDEN,
            json!({ "success": false, "message": "Refresh token expired" }),
        );
        assert_eq!(err.status(), Some(403));
        assert!(matches!(&err, ApiError::Http { message, .. } if message == "Refresh token expired"));
        assert_eq!(err.payload().and_then(|p| p.get("message")), Some(&json!("Refresh token expired")));
        assert!(err.is_session_terminal());
    }

    #[test]
    fn expired_refresh_message_is_terminal_on_any_status() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "message": "Refresh token expired" }),
        );
        assert!(err.is_session_terminal());

        let other = ApiError::from_status(StatusCode::BAD_REQUEST, json!({ "message": "bad input" }));
        assert!(!other.is_session_terminal());
    }

    #[test]
    fn from_status_falls_back_to_text_then_reason() {
        let text = ApiError::from_status(StatusCode::BAD_REQUEST, json!("bad input"));
        assert!(matches!(text, ApiError::Http { ref message, .. } if message == "bad input"));

        let empty = ApiError::from_status(StatusCode::NOT_FOUND, Value::Null);
        assert!(matches!(&empty, ApiError::Http { message, payload: None, .. } if message == "Not Found"));
    }

    #[test]
    fn domain_errors_map_onto_api_errors() {
        assert!(matches!(
            ApiError::from(KanflowError::Storage("disk".into())),
            ApiError::Store(_)
        ));
        assert!(matches!(
            ApiError::from(KanflowError::Network("down".into())),
            ApiError::Network(_)
        ));
        assert!(matches!(
            ApiError::from(KanflowError::InvalidInput("x".into())),
            ApiError::InvalidRequest(_)
        ));
    }
}
