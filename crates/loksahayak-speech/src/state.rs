//! Speech session state machine with thread-safe transitions.
//!
//! Valid transitions:
//! - Idle -> Listening (recognition started)
//! - Listening -> Idle (recognizer ended or errored)

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SpeechError;

/// Whether a recognition session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpeechState {
    /// No recognition session. Ready to start.
    #[default]
    Idle,
    /// A recognition session is active.
    Listening,
}

impl fmt::Display for SpeechState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechState::Idle => write!(f, "Idle"),
            SpeechState::Listening => write!(f, "Listening"),
        }
    }
}

impl SpeechState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SpeechState) -> bool {
        matches!(
            (self, target),
            (SpeechState::Idle, SpeechState::Listening) | (SpeechState::Listening, SpeechState::Idle)
        )
    }
}

/// Shared handle to the current speech state.
///
/// Clones observe the same state, so the presentation layer can read
/// `is_listening` while the adapter lives in the event loop.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: Arc<Mutex<SpeechState>>,
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SpeechState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_listening(&self) -> bool {
        self.current() == SpeechState::Listening
    }

    /// Attempt to transition to the target state.
    pub fn transition(&self, target: SpeechState) -> Result<(), SpeechError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.can_transition_to(&target) {
            tracing::debug!("Speech state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(SpeechError::InvalidTransition {
                from: *state,
                to: target,
            })
        }
    }

    /// Force the state machine back to Idle.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != SpeechState::Idle {
            tracing::warn!("Speech state machine reset to Idle from {}", *state);
        }
        *state = SpeechState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(SpeechState::Idle.to_string(), "Idle");
        assert_eq!(SpeechState::Listening.to_string(), "Listening");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(SpeechState::Idle.can_transition_to(&SpeechState::Listening));
        assert!(SpeechState::Listening.can_transition_to(&SpeechState::Idle));
    }

    #[test]
    fn test_self_transitions_are_invalid() {
        assert!(!SpeechState::Idle.can_transition_to(&SpeechState::Idle));
        assert!(!SpeechState::Listening.can_transition_to(&SpeechState::Listening));
    }

    #[test]
    fn test_state_machine_round_trip() {
        let sm = StateMachine::new();
        assert_eq!(sm.current(), SpeechState::Idle);
        sm.transition(SpeechState::Listening).unwrap();
        assert!(sm.is_listening());
        sm.transition(SpeechState::Idle).unwrap();
        assert!(!sm.is_listening());
    }

    #[test]
    fn test_invalid_transition_leaves_state() {
        let sm = StateMachine::new();
        let err = sm.transition(SpeechState::Idle).unwrap_err();
        assert!(err.to_string().contains("Idle -> Idle"));
        assert_eq!(sm.current(), SpeechState::Idle);
    }

    #[test]
    fn test_clone_is_shared() {
        let sm1 = StateMachine::new();
        let sm2 = sm1.clone();
        sm1.transition(SpeechState::Listening).unwrap();
        assert_eq!(sm2.current(), SpeechState::Listening);
        sm2.reset();
        assert_eq!(sm1.current(), SpeechState::Idle);
    }
}
