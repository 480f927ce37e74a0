//! Error types for the upload handler.

use loksahayak_core::error::LokError;
use loksahayak_core::transport::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("only image files can be uploaded (got {0:?})")]
    NotAnImage(String),
    #[error("an upload is already in progress")]
    Busy,
    #[error("preview error: {0}")]
    Preview(String),
    #[error("upload failed: {0}")]
    Transport(#[from] TransportError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for LokError {
    fn from(err: UploadError) -> Self {
        LokError::Upload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error_display() {
        assert_eq!(
            UploadError::NotAnImage("application/pdf".into()).to_string(),
            "only image files can be uploaded (got \"application/pdf\")"
        );
        assert_eq!(UploadError::Busy.to_string(), "an upload is already in progress");
    }

    #[test]
    fn test_transport_error_conversion() {
        let err: UploadError = TransportError::Network("reset".into()).into();
        assert!(matches!(err, UploadError::Transport(_)));
        let lok: LokError = err.into();
        assert!(lok.to_string().contains("reset"));
    }
}
