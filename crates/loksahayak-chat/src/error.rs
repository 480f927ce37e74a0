//! Error types for the chat send cycle.

use loksahayak_core::error::LokError;
use loksahayak_core::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a message is already being sent")]
    Busy,
    #[error("chat request failed: {0}")]
    Transport(#[from] TransportError),
}

impl From<ChatError> for LokError {
    fn from(err: ChatError) -> Self {
        LokError::Chat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(ChatError::Busy.to_string(), "a message is already being sent");

        let err: ChatError = TransportError::Status {
            status: 503,
            message: Some("down".into()),
        }
        .into();
        assert!(err.to_string().starts_with("chat request failed: HTTP 503"));
    }

    #[test]
    fn test_into_lok_error() {
        let err: LokError = ChatError::Busy.into();
        assert!(matches!(err, LokError::Chat(_)));
    }
}
