//! HTTP client error types.

use campus_commerce::CommerceError;
use thiserror::Error;

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL or header.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl FetchError {
    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_builder() {
            FetchError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

impl From<FetchError> for CommerceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::ParseError(msg) | FetchError::JsonError(msg) => {
                CommerceError::Serialization(msg)
            }
            other => CommerceError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_status() {
        let err = FetchError::HttpError {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(FetchError::Timeout.status(), None);
    }

    #[test]
    fn test_into_commerce_error() {
        let err: CommerceError = FetchError::Timeout.into();
        assert!(matches!(err, CommerceError::Backend(msg) if msg == "Request timed out"));

        let err: CommerceError = FetchError::ParseError("bad".into()).into();
        assert!(matches!(err, CommerceError::Serialization(_)));
    }
}
