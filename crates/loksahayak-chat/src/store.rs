//! The conversation log, input buffer and sending flag.
//!
//! Index 0 of the log is the greeting and is never shown in history, so
//! history positions are 1-based indices into the full log.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use loksahayak_core::i18n::TextKey;
use loksahayak_core::types::Message;

use crate::error::ChatError;

const EVENT_CAPACITY: usize = 64;

/// Change notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    MessageAppended { index: usize },
    MessageDeleted { index: usize },
    /// The view should scroll to the newest message.
    ScrollToLatest,
    InputChanged,
    SendingChanged(bool),
}

/// Point-in-time copy of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub input: String,
    pub sending: bool,
}

/// Proof that a user message was speculatively committed.
///
/// Only [`ConversationStore::begin_send`] creates one and
/// [`ConversationStore::settle`] consumes it, so each send settles once.
#[must_use = "a pending send must be settled"]
#[derive(Debug)]
pub struct PendingSend {
    text: String,
    index: usize,
}

impl PendingSend {
    /// The trimmed text that was committed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position of the committed user message in the log.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// How a pending send resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Reply(String),
    NoReply,
    Failed,
}

#[derive(Debug)]
pub struct ConversationStore {
    messages: Vec<Message>,
    input: String,
    sending: bool,
    events: broadcast::Sender<ConversationEvent>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// A store holding only the greeting.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            messages: vec![Message::bot_key(TextKey::InitialBotMessage)],
            input: String::new(),
            sending: false,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ConversationEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// The full log, greeting included.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages after the greeting.
    pub fn history(&self) -> &[Message] {
        self.messages.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.messages.clone(),
            input: self.input.clone(),
            sending: self.sending,
        }
    }

    /// Append at the end and return the new message's index.
    pub fn append_message(&mut self, message: Message) -> usize {
        self.messages.push(message);
        let index = self.messages.len() - 1;
        tracing::debug!(index, role = %self.messages[index].role, "Message appended");
        self.emit(ConversationEvent::MessageAppended { index });
        self.emit(ConversationEvent::ScrollToLatest);
        index
    }

    /// Remove the message at `index`. Index 0 and out-of-range indices are ignored.
    pub fn delete_message(&mut self, index: usize) -> Option<Message> {
        if index == 0 || index >= self.messages.len() {
            tracing::debug!(index, len = self.messages.len(), "Delete ignored");
            return None;
        }
        let removed = self.messages.remove(index);
        self.emit(ConversationEvent::MessageDeleted { index });
        Some(removed)
    }

    pub fn set_input_buffer(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.emit(ConversationEvent::InputChanged);
    }

    pub fn clear_input_buffer(&mut self) {
        if !self.input.is_empty() {
            self.input.clear();
            self.emit(ConversationEvent::InputChanged);
        }
    }

    pub fn set_sending(&mut self, sending: bool) {
        if self.sending != sending {
            self.sending = sending;
            self.emit(ConversationEvent::SendingChanged(sending));
        }
    }

    /// Commit the trimmed input as a user message, clear the input and mark
    /// the store as sending.
    pub fn begin_send(&mut self) -> Result<PendingSend, ChatError> {
        if self.sending {
            return Err(ChatError::Busy);
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let index = self.append_message(Message::user(text.clone()));
        self.clear_input_buffer();
        self.set_sending(true);
        Ok(PendingSend { text, index })
    }

    /// Append the bot's side of a pending send and clear the sending flag.
    pub fn settle(&mut self, pending: PendingSend, settlement: Settlement) -> usize {
        let reply = match settlement {
            Settlement::Reply(text) => Message::bot(text),
            Settlement::NoReply => Message::bot_key(TextKey::NoReplyReceived),
            Settlement::Failed => Message::bot_key(TextKey::ChatError),
        };
        tracing::debug!(user_index = pending.index, "Send settled");
        let index = self.append_message(reply);
        self.set_sending(false);
        index
    }
}
