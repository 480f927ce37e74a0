//! Error types for claim checking.

use loksahayak_core::error::LokError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactCheckError {
    #[error("a claim is already being checked")]
    Busy,
    #[error("fact check backend failed: {0}")]
    Backend(String),
}

impl From<FactCheckError> for LokError {
    fn from(err: FactCheckError) -> Self {
        LokError::FactCheck(err.to_string())
    }
}
