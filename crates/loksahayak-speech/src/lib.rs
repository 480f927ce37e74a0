//! Speech input adapter: recognizer lifecycle and the Idle/Listening state machine.
//!
//! The platform recognizer is an injected capability. It reports back through
//! explicit [`SessionEvent`] messages which the owner feeds into
//! [`SpeechAdapter::handle_event`]; recognized text is written to a
//! [`TranscriptSink`].

pub mod adapter;
pub mod error;
pub mod recognizer;
pub mod state;

pub use adapter::{SpeechAdapter, TranscriptSink};
pub use error::SpeechError;
pub use recognizer::{
    Alternative, RecognitionConfig, RecognitionErrorCode, RecognitionEvent, RecognitionResult,
    Recognizer, SessionEvent, SessionEvents,
};
pub use state::{SpeechState, StateMachine};
