//! User-facing notices raised by the upload and speech components.

use crate::i18n::TextKey;

/// How a notice interrupts the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeSeverity {
    /// Must be acknowledged before continuing (a modal alert).
    Blocking,
    /// Shown next to the control that caused it.
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub key: TextKey,
}

impl Notice {
    pub fn blocking(key: TextKey) -> Self {
        Self {
            severity: NoticeSeverity::Blocking,
            key,
        }
    }

    pub fn inline(key: TextKey) -> Self {
        Self {
            severity: NoticeSeverity::Inline,
            key,
        }
    }
}

/// Sink for notices, implemented by the presentation layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
