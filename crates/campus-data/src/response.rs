//! Buffered HTTP responses.

use crate::FetchError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

/// An HTTP response with its body fully read.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

impl Response {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// The `message` field of a JSON body, as the backend reports errors.
    pub fn message(&self) -> Option<String> {
        self.json::<MessageBody>()
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The error carries the backend's `message` when the body has one,
    /// otherwise the raw body text.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .message()
            .or_else(|| self.text().ok().filter(|t| !t.trim().is_empty()))
            .unwrap_or_else(|| "Unknown error".to_string());
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    #[test]
    fn test_status_classes() {
        assert!(make_response(201, b"").is_success());
        assert!(!make_response(300, b"").is_success());
        assert!(make_response(404, b"").is_not_found());
    }

    #[test]
    fn test_text_invalid_utf8() {
        let resp = make_response(200, &[0xff, 0xfe]);
        assert!(resp.text().is_err());
    }

    #[test]
    fn test_json() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Data {
            value: i32,
        }

        let resp = make_response(200, br#"{"value": 42}"#);
        assert_eq!(resp.json::<Data>().unwrap(), Data { value: 42 });
        assert!(make_response(200, b"not json").json::<Data>().is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(
            make_response(400, br#"{"message":"Product already booked"}"#).message(),
            Some("Product already booked".to_string())
        );
        assert_eq!(make_response(400, br#"{"message":""}"#).message(), None);
        assert_eq!(make_response(400, br#"{"error":"x"}"#).message(), None);
        assert_eq!(make_response(500, b"<html>").message(), None);
    }

    #[test]
    fn test_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let resp = Response::new(200, headers, Vec::new());
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_error_for_status_prefers_backend_message() {
        let err = make_response(401, br#"{"message":"Token expired"}"#)
            .error_for_status()
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::HttpError { status: 401, ref message } if message == "Token expired"
        ));
    }

    #[test]
    fn test_error_for_status_falls_back_to_body() {
        let err = make_response(502, b"Bad Gateway").error_for_status().unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");

        let err = make_response(500, b"").error_for_status().unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: Unknown error");

        assert!(make_response(200, b"OK").error_for_status().is_ok());
    }
}
