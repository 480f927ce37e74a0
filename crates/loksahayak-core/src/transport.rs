//! Seams between the client-side state machines and the external HTTP API.
//!
//! The chat controller and upload handler only see these traits; the
//! `reqwest` implementation lives in `loksahayak-api` and tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::SelectedFile;

/// Failure of a single request against the external API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused, reset, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}{}", suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// The response arrived but could not be read.
    #[error("decode error: {0}")]
    Decode(String),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl TransportError {
    /// Server-supplied message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the server responded at all.
    pub fn has_response(&self) -> bool {
        matches!(self, TransportError::Status { .. })
    }
}

/// `POST /user/chat`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the user's text and return the bot reply, or `None` when the
    /// server answered with an empty payload.
    async fn send_chat(&self, user: &str) -> Result<Option<String>, TransportError>;
}

/// `POST /user/image/upload`.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload_image(&self, file: &SelectedFile) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_with_message() {
        let err = TransportError::Status {
            status: 401,
            message: Some("bad token".into()),
        };
        assert_eq!(err.to_string(), "HTTP 401: bad token");
        assert_eq!(err.server_message(), Some("bad token"));
        assert!(err.has_response());
    }

    #[test]
    fn test_status_display_without_message() {
        let err = TransportError::Status {
            status: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 503");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_network_error_has_no_response() {
        let err = TransportError::Network("refused".into());
        assert!(!err.has_response());
        assert_eq!(err.to_string(), "network error: refused");
    }
}
