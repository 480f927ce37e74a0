use thiserror::Error;

/// Top-level error type for the LokSahayak client.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for LokError` so that `?` works across crate
/// boundaries in the binary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LokError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Fact check error: {0}")]
    FactCheck(String),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LokError {
    fn from(err: toml::de::Error) -> Self {
        LokError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LokError {
    fn from(err: toml::ser::Error) -> Self {
        LokError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LokError {
    fn from(err: serde_json::Error) -> Self {
        LokError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for LokSahayak operations.
pub type Result<T> = std::result::Result<T, LokError>;
