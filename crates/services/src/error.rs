//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

use quiz_core::ProtocolViolation;

/// Errors emitted by `QuizApi` implementations.
///
/// Every variant ends a controller transition in `QuizPhase::Errored`; the variant only
/// decides how the failure is labelled for display.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// No usable response: connection refused, timeout, body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the raw body, or `HTTP <code>` when it was empty.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    #[must_use]
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            body
        };
        Self::Status { status, message }
    }
}

/// Errors emitted while reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base url {raw:?}: {source}")]
    BaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url {0:?} must use http or https")]
    Scheme(String),
    #[error("invalid session mode {0:?} (expected `cookie` or `explicit`)")]
    SessionMode(String),
    #[error("invalid timeout {0:?} (expected whole seconds)")]
    Timeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_body_text() {
        let err = ApiError::status(StatusCode::INTERNAL_SERVER_ERROR, "db down");
        assert_eq!(err.to_string(), "db down");
    }

    #[test]
    fn status_error_synthesizes_message_for_empty_body() {
        let err = ApiError::status(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "HTTP 404");

        let err = ApiError::status(StatusCode::BAD_GATEWAY, "  \n");
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn protocol_error_is_transparent() {
        let err = ApiError::from(ProtocolViolation::MissingField("question"));
        assert_eq!(err.to_string(), "response is missing `question`");
    }
}
