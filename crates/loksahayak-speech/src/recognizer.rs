//! The recognizer capability and the events it reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::SpeechError;

/// Settings applied to the recognizer before each session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    /// BCP 47 language tag, e.g. `hi-IN`.
    pub language: String,
    /// Keep listening after the first final result.
    pub continuous: bool,
    /// Report partial hypotheses before the final one.
    pub interim_results: bool,
}

impl RecognitionConfig {
    /// Single-shot configuration: one final result per session.
    pub fn single_shot(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// One hypothesis for a recognized segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: f32,
}

/// A recognized segment, best alternative first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub alternatives: Vec<Alternative>,
    #[serde(default = "default_final")]
    pub is_final: bool,
}

fn default_final() -> bool {
    true
}

impl RecognitionResult {
    pub fn final_transcript(transcript: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Alternative {
                transcript: transcript.into(),
                confidence: 1.0,
            }],
            is_final: true,
        }
    }
}

/// Error codes reported by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecognitionErrorCode {
    /// Microphone permission denied.
    NotAllowed,
    ServiceNotAllowed,
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    LanguageNotSupported,
    Other(String),
}

impl RecognitionErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            RecognitionErrorCode::NotAllowed => "not-allowed",
            RecognitionErrorCode::ServiceNotAllowed => "service-not-allowed",
            RecognitionErrorCode::NoSpeech => "no-speech",
            RecognitionErrorCode::Aborted => "aborted",
            RecognitionErrorCode::AudioCapture => "audio-capture",
            RecognitionErrorCode::Network => "network",
            RecognitionErrorCode::LanguageNotSupported => "language-not-supported",
            RecognitionErrorCode::Other(code) => code,
        }
    }
}

impl fmt::Display for RecognitionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecognitionErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "not-allowed" => RecognitionErrorCode::NotAllowed,
            "service-not-allowed" => RecognitionErrorCode::ServiceNotAllowed,
            "no-speech" => RecognitionErrorCode::NoSpeech,
            "aborted" => RecognitionErrorCode::Aborted,
            "audio-capture" => RecognitionErrorCode::AudioCapture,
            "network" => RecognitionErrorCode::Network,
            "language-not-supported" => RecognitionErrorCode::LanguageNotSupported,
            other => RecognitionErrorCode::Other(other.to_string()),
        })
    }
}

/// Messages a recognizer sends back to its adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Started,
    /// All results of the session so far; the last one is the newest.
    Result(Vec<RecognitionResult>),
    Error(RecognitionErrorCode),
    Ended,
}

/// A recognizer event stamped with the session that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: u64,
    pub event: RecognitionEvent,
}

/// Event sender handed to the recognizer for a single session.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    session: u64,
    tx: UnboundedSender<SessionEvent>,
}

impl SessionEvents {
    pub(crate) fn new(session: u64, tx: UnboundedSender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Returns `false` once the adapter is gone.
    pub fn send(&self, event: RecognitionEvent) -> bool {
        self.tx
            .send(SessionEvent {
                session: self.session,
                event,
            })
            .is_ok()
    }
}

/// A platform speech recognizer.
///
/// `start` must not block; the recognizer reports progress through `events`
/// and always finishes a session with [`RecognitionEvent::Ended`] (possibly
/// preceded by [`RecognitionEvent::Error`]).
pub trait Recognizer: Send {
    fn start(
        &mut self,
        config: &RecognitionConfig,
        events: SessionEvents,
    ) -> Result<(), SpeechError>;

    /// Ask the recognizer to finish the current session.
    fn stop(&mut self);

    /// Tear down the current session without waiting for a result.
    fn abort(&mut self) {
        self.stop();
    }
}
