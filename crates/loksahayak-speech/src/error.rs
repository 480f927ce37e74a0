//! Error types for speech input.

use loksahayak_core::error::LokError;

use crate::state::SpeechState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech recognition is not supported on this platform")]
    Unsupported,
    #[error("speech recognition is already listening")]
    AlreadyListening,
    #[error("invalid speech state transition: {from} -> {to}")]
    InvalidTransition { from: SpeechState, to: SpeechState },
    #[error("recognizer failed to start: {0}")]
    Recognizer(String),
}

impl From<SpeechError> for LokError {
    fn from(err: SpeechError) -> Self {
        LokError::Speech(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_display() {
        assert_eq!(
            SpeechError::Unsupported.to_string(),
            "speech recognition is not supported on this platform"
        );
        assert_eq!(
            SpeechError::Recognizer("device busy".into()).to_string(),
            "recognizer failed to start: device busy"
        );
    }

    #[test]
    fn test_into_lok_error() {
        let err: LokError = SpeechError::AlreadyListening.into();
        assert!(matches!(err, LokError::Speech(_)));
        assert!(err.to_string().contains("already listening"));
    }
}
