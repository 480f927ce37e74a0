//! Shared building blocks for the LokSahayak client.
//!
//! Holds the message model, the localized text catalog, user-facing notices,
//! the transport seams implemented by `loksahayak-api`, configuration, and the
//! top-level error type.

pub mod config;
pub mod error;
pub mod i18n;
pub mod notice;
pub mod transport;
pub mod types;

pub use config::LokConfig;
pub use error::{LokError, Result};
pub use i18n::{Locale, TextKey};
pub use notice::{Notice, NoticeSeverity, Notifier};
pub use transport::{ChatTransport, TransportError, UploadTransport};
pub use types::*;
