//! Error types for the Ollama client
//!
//! Two API failure kinds are distinguished: the server reporting a missing
//! model (HTTP 404) and every other non-success status. Both keep the raw
//! response so callers can inspect what the server actually said.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Snapshot of a failed HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status returned by the server
    pub status: StatusCode,

    /// Final request URL
    pub url: String,

    /// Response body as text (empty if it could not be read)
    pub body: String,
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "HTTP {} from {}", self.status, self.url)
        } else {
            write!(f, "HTTP {} from {}: {}", self.status, self.url, self.body)
        }
    }
}

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server answered 404
    #[error("Model not found ({0})")]
    ModelNotFound(RawResponse),

    /// Server answered with any other non-success status
    #[error("Request failed ({0})")]
    RequestFailed(RawResponse),

    /// A streamed line was not valid JSON (strict decoding only)
    #[error("Failed to decode stream line {line_number}: {source} (line: {line})")]
    Decode {
        line_number: usize,
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// Error object sent in place of a chunk, e.g. `{"error": "..."}`
    #[error("Server error: {0}")]
    Server(String),

    /// A streamed line grew past the configured limit
    #[error("Stream line of {size} bytes exceeds maximum {max} bytes")]
    LineTooLong { size: usize, max: usize },

    /// HTTP transport errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-streaming body was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Build the API error matching a non-success status
    pub fn from_status(raw: RawResponse) -> Self {
        if raw.status == StatusCode::NOT_FOUND {
            ClientError::ModelNotFound(raw)
        } else {
            ClientError::RequestFailed(raw)
        }
    }

    /// Error reported inside a successful body
    ///
    /// The server signals failures that happen after the status line was
    /// sent, such as a pull that stops midway, with an `error` field.
    pub fn embedded(chunk: &Value) -> Option<Self> {
        chunk
            .get("error")
            .and_then(Value::as_str)
            .map(|message| ClientError::Server(message.to_string()))
    }

    /// Pass a chunk through, or turn its `error` field into an error
    pub fn check_chunk(chunk: Value) -> Result<Value> {
        match Self::embedded(&chunk) {
            Some(err) => Err(err),
            None => Ok(chunk),
        }
    }

    /// Raw response attached to API errors
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            ClientError::ModelNotFound(raw) | ClientError::RequestFailed(raw) => Some(raw),
            _ => None,
        }
    }

    /// HTTP status of API errors
    pub fn status(&self) -> Option<StatusCode> {
        self.raw_response().map(|raw| raw.status)
    }

    /// True for the 404 variant
    pub fn is_model_not_found(&self) -> bool {
        matches!(self, ClientError::ModelNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            url: "http://localhost:11434/api/generate".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_404_maps_to_model_not_found() {
        let err = ClientError::from_status(raw(404, "model 'llama3' not found"));
        assert!(err.is_model_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_other_statuses_map_to_request_failed() {
        for status in [400, 401, 409, 500, 503] {
            let err = ClientError::from_status(raw(status, "boom"));
            assert!(matches!(err, ClientError::RequestFailed(_)), "status {}", status);
            assert_eq!(err.status().map(|s| s.as_u16()), Some(status));
        }
    }

    #[test]
    fn test_error_display_carries_status_and_body() {
        let err = ClientError::from_status(raw(500, "internal error"));
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("internal error"));
        assert!(message.contains("/api/generate"));
    }

    #[test]
    fn test_display_without_body() {
        let message = raw(502, "").to_string();
        assert_eq!(message, "HTTP 502 Bad Gateway from http://localhost:11434/api/generate");
    }

    #[test]
    fn test_line_too_long_display() {
        let err = ClientError::LineTooLong { size: 9000, max: 8000 };
        assert!(err.to_string().contains("9000"));
        assert!(err.to_string().contains("8000"));
    }

    #[test]
    fn test_error_chunk_becomes_server_error() {
        let chunk = serde_json::json!({"error": "max retries exceeded: unexpected EOF"});
        match ClientError::check_chunk(chunk) {
            Err(ClientError::Server(message)) => {
                assert_eq!(message, "max retries exceeded: unexpected EOF")
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn test_regular_chunk_passes_check() {
        let chunk = serde_json::json!({"response": "Hi", "done": false});
        assert_eq!(ClientError::check_chunk(chunk.clone()).unwrap(), chunk);

        // Only a string `error` field counts
        let odd = serde_json::json!({"error": null, "status": "success"});
        assert!(ClientError::embedded(&odd).is_none());
    }

    #[test]
    fn test_non_api_errors_have_no_raw_response() {
        let err = ClientError::ConfigError("bad".to_string());
        assert!(err.raw_response().is_none());
        assert!(err.status().is_none());
    }
}
