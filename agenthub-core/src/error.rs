//! Error types for agenthub-core

use serde_json::Value;
use thiserror::Error;

/// Main error type for the agenthub-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request never produced a response (DNS, connect, reset, ...)
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("{}", api_message(*status, detail.as_ref()))]
    Api {
        status: u16,
        /// The `detail` field of a JSON error body, when present
        detail: Option<Value>,
        /// Raw response body
        body: String,
    },

    /// A 2xx response whose body did not have the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Result type alias for agenthub-core
pub type Result<T> = std::result::Result<T, Error>;

/// A failure reduced to the one message a view shows the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
}

impl Error {
    /// Build an API error from a status and raw body, pulling out `detail`
    /// when the body is a JSON object that carries one.
    pub fn from_response(status: u16, body: String) -> Self {
        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").cloned())
            .filter(|d| !d.is_null());
        Error::Api {
            status,
            detail,
            body,
        }
    }

    /// Normalize any error into a [`Failure`].
    ///
    /// An API error renders as its server-supplied detail when there is one,
    /// so the message is the detail text itself rather than a wrapped form.
    pub fn failure(&self) -> Failure {
        Failure {
            message: self.to_string(),
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn api_message(status: u16, detail: Option<&Value>) -> String {
    match detail {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) | None => format!("request failed with status code {status}"),
        Some(other) => other.to_string(),
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_prefers_server_detail() {
        let err = Error::from_response(404, r#"{"detail":"Project not found"}"#.to_string());
        assert_eq!(err.failure().message, "Project not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_failure_without_detail_uses_status_text() {
        let err = Error::from_response(500, "Internal Server Error".to_string());
        assert_eq!(
            err.failure().message,
            "request failed with status code 500"
        );
    }

    #[test]
    fn test_failure_with_structured_detail() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"field required"}]}"#;
        let err = Error::from_response(422, body.to_string());
        let message = err.failure().message;
        assert!(message.contains("field required"), "got {message}");
    }

    #[test]
    fn test_failure_for_transport_error() {
        let err = Error::Transport("connection refused".to_string());
        assert_eq!(err.failure().message, "network error: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_null_detail_is_ignored() {
        let err = Error::from_response(400, r#"{"detail":null}"#.to_string());
        assert!(matches!(err, Error::Api { detail: None, .. }));
    }
}
