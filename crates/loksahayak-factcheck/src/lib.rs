//! Claim checking.
//!
//! [`PlaceholderChecker`] is a deterministic stand-in that scores a claim by
//! its length. It carries no meaning and exists so the checking flow can be
//! exercised until a real backend is wired in behind [`FactChecker`].

pub mod checker;
pub mod error;
pub mod session;

pub use checker::{
    FactCheckResult, FactChecker, PlaceholderChecker, Reliability, Source, Stance, Verdict,
};
pub use error::FactCheckError;
pub use session::{FactCheckRecord, FactCheckSession};
