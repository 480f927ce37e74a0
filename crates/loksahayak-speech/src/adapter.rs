//! Speech adapter owning the recognizer and driving the state machine.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use loksahayak_core::i18n::{Locale, TextKey};
use loksahayak_core::notice::{Notice, Notifier};

use crate::error::SpeechError;
use crate::recognizer::{
    RecognitionConfig, RecognitionErrorCode, RecognitionEvent, Recognizer, SessionEvent,
    SessionEvents,
};
use crate::state::{SpeechState, StateMachine};

/// Receives recognized text, normally the conversation input buffer.
pub trait TranscriptSink: Send + Sync {
    fn set_transcript(&self, text: String);
}

/// Speech input adapter.
///
/// Owns the recognizer for its whole lifetime: acquired at construction and
/// aborted on drop if a session is still active. Events from the recognizer
/// arrive on the receiver returned by [`SpeechAdapter::new`] and must be fed
/// back through [`SpeechAdapter::handle_event`]. Each `start` opens a new
/// session; events stamped with an older session are dropped.
pub struct SpeechAdapter {
    recognizer: Option<Box<dyn Recognizer>>,
    state: StateMachine,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn TranscriptSink>,
    events: UnboundedSender<SessionEvent>,
    session: u64,
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("supported", &self.recognizer.is_some())
            .field("state", &self.state.current())
            .field("session", &self.session)
            .finish()
    }
}

impl SpeechAdapter {
    /// Create an adapter. Pass `None` when the platform has no recognizer;
    /// every `start` then fails with a "not supported" notice.
    pub fn new(
        recognizer: Option<Box<dyn Recognizer>>,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn TranscriptSink>,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let adapter = Self {
            recognizer,
            state: StateMachine::new(),
            notifier,
            sink,
            events,
            session: 0,
        };
        (adapter, rx)
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Shared handle for observers of the listening state.
    pub fn state(&self) -> StateMachine {
        self.state.clone()
    }

    pub fn is_listening(&self) -> bool {
        self.state.is_listening()
    }

    /// Begin a single-shot recognition session in `locale`'s language.
    pub fn start(&mut self, locale: Locale) -> Result<(), SpeechError> {
        let Some(recognizer) = self.recognizer.as_mut() else {
            tracing::warn!("Speech recognition requested but not supported");
            self.notifier
                .notify(Notice::blocking(TextKey::SpeechUnsupported));
            return Err(SpeechError::Unsupported);
        };

        if self.state.is_listening() {
            tracing::debug!("Ignoring start while already listening");
            return Err(SpeechError::AlreadyListening);
        }

        let config = RecognitionConfig::single_shot(locale.speech_code());
        let session = self.session + 1;
        recognizer.start(&config, SessionEvents::new(session, self.events.clone()))?;
        self.session = session;
        self.state.transition(SpeechState::Listening)?;
        tracing::info!(session, language = %config.language, "Speech recognition started");
        Ok(())
    }

    /// Ask the recognizer to stop. The state returns to Idle only when the
    /// recognizer reports [`RecognitionEvent::Ended`]. No-op while Idle.
    pub fn stop(&mut self) {
        if !self.state.is_listening() {
            return;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            tracing::debug!("Requesting speech recognition stop");
            recognizer.stop();
        }
    }

    /// Microphone button: stop when listening, start otherwise.
    pub fn toggle(&mut self, locale: Locale) -> Result<(), SpeechError> {
        if self.state.is_listening() {
            self.stop();
            Ok(())
        } else {
            self.start(locale)
        }
    }

    /// Apply one recognizer event. Events from earlier sessions are ignored.
    pub fn handle_event(&mut self, event: SessionEvent) {
        let SessionEvent { session, event } = event;
        if session != self.session {
            tracing::debug!(
                session,
                current = self.session,
                "Dropping event from a finished session"
            );
            return;
        }
        match event {
            RecognitionEvent::Started => {
                tracing::debug!(state = %self.state.current(), "Recognizer reported start");
            }
            RecognitionEvent::Result(results) => {
                if !self.state.is_listening() {
                    tracing::debug!("Dropping recognition result outside a session");
                    return;
                }
                let transcript = results
                    .last()
                    .and_then(|r| r.alternatives.first())
                    .map(|a| a.transcript.trim().to_string());
                if let Some(text) = transcript {
                    tracing::info!(text_len = text.len(), "Speech transcribed");
                    self.sink.set_transcript(text);
                }
            }
            RecognitionEvent::Error(code) => {
                tracing::error!(error = %code, "Speech recognition error");
                if code == RecognitionErrorCode::NotAllowed {
                    self.notifier
                        .notify(Notice::blocking(TextKey::MicrophoneDenied));
                }
                self.finish();
            }
            RecognitionEvent::Ended => self.finish(),
        }
    }

    fn finish(&mut self) {
        if self.state.is_listening() {
            // Listening -> Idle is always valid.
            let _ = self.state.transition(SpeechState::Idle);
            tracing::info!("Speech recognition ended");
        }
    }
}

impl Drop for SpeechAdapter {
    fn drop(&mut self) {
        if self.state.is_listening() {
            if let Some(recognizer) = self.recognizer.as_mut() {
                recognizer.abort();
            }
            self.state.reset();
        }
    }
}
