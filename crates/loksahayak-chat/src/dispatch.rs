//! The send-message cycle against the chat endpoint.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use loksahayak_core::transport::ChatTransport;
use loksahayak_speech::TranscriptSink;

use crate::error::ChatError;
use crate::store::{ConversationEvent, ConversationStore, Settlement};

/// Result of [`ChatController::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was sent: the input was blank or a send is in flight.
    Ignored(ChatError),
    /// The server answered; `None` when the reply was empty.
    Delivered(Option<String>),
    /// The request failed and an error message was appended.
    Failed(ChatError),
}

/// Single owner of the conversation store; runs optimistic sends.
pub struct ChatController {
    store: Mutex<ConversationStore>,
    transport: Arc<dyn ChatTransport>,
}

impl ChatController {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self::with_store(ConversationStore::new(), transport)
    }

    pub fn with_store(store: ConversationStore, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            store: Mutex::new(store),
            transport,
        }
    }

    /// Lock the store. Do not hold the guard across an `.await`.
    pub fn store(&self) -> MutexGuard<'_, ConversationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.store().subscribe()
    }

    /// Send the current input buffer.
    ///
    /// The user message is appended before the request goes out. Exactly one
    /// request is made per accepted send; the trimmed text is what is sent.
    pub async fn send_message(&self) -> SendOutcome {
        let begun = self.store().begin_send();
        let pending = match begun {
            Ok(pending) => pending,
            Err(reason) => {
                tracing::debug!(%reason, "Send ignored");
                return SendOutcome::Ignored(reason);
            }
        };
        let mut release = SendingRelease::armed(&self.store);

        tracing::info!(chars = pending.text().chars().count(), "Sending chat message");
        let result = self.transport.send_chat(pending.text()).await;

        let mut store = self.store();
        let outcome = match result {
            Ok(Some(reply)) => {
                store.settle(pending, Settlement::Reply(reply.clone()));
                SendOutcome::Delivered(Some(reply))
            }
            Ok(None) => {
                tracing::warn!("Chat endpoint returned no reply");
                store.settle(pending, Settlement::NoReply);
                SendOutcome::Delivered(None)
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat request failed");
                store.settle(pending, Settlement::Failed);
                SendOutcome::Failed(e.into())
            }
        };
        // Settled under this lock; the flag may already belong to the next send.
        release.disarm();
        outcome
    }
}

impl TranscriptSink for ChatController {
    fn set_transcript(&self, text: String) {
        self.store().set_input_buffer(text);
    }
}

/// Clears the sending flag if the send future is dropped before it settles.
struct SendingRelease<'a> {
    store: &'a Mutex<ConversationStore>,
    armed: bool,
}

impl<'a> SendingRelease<'a> {
    fn armed(store: &'a Mutex<ConversationStore>) -> Self {
        Self { store, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SendingRelease<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.store
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .set_sending(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use loksahayak_core::i18n::{Locale, TextKey};
    use loksahayak_core::transport::TransportError;
    use loksahayak_core::types::{MessageText, Role};
    use tokio::sync::Notify;

    struct FakeChat {
        reply: Result<Option<String>, TransportError>,
        sent: Mutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl FakeChat {
        fn replying(reply: Result<Option<String>, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                sent: Mutex::new(Vec::new()),
                gate: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn gated(gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(Some("late".into())),
                sent: Mutex::new(Vec::new()),
                gate: Some(gate),
                calls: AtomicUsize::new(0),
            })
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for FakeChat {
        async fn send_chat(&self, user: &str) -> Result<Option<String>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(user.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone()
        }
    }

    fn controller(transport: Arc<FakeChat>) -> ChatController {
        ChatController::new(transport)
    }

    #[tokio::test]
    async fn test_send_delivers_reply() {
        let transport = FakeChat::replying(Ok(Some("Namaste!".into())));
        let chat = controller(transport.clone());
        chat.store().set_input_buffer("hello");

        let outcome = chat.send_message().await;

        assert_eq!(outcome, SendOutcome::Delivered(Some("Namaste!".into())));
        let store = chat.store();
        let history: Vec<_> = store
            .history()
            .iter()
            .map(|m| (m.role, m.render(Locale::En).to_string()))
            .collect();
        assert_eq!(
            history,
            vec![
                (Role::User, "hello".to_string()),
                (Role::Bot, "Namaste!".to_string()),
            ]
        );
        assert!(!store.is_sending());
        assert_eq!(store.input(), "");
    }

    #[tokio::test]
    async fn test_trimmed_text_is_sent() {
        let transport = FakeChat::replying(Ok(Some("ok".into())));
        let chat = controller(transport.clone());
        chat.store().set_input_buffer("   spaced out \n");

        chat.send_message().await;

        assert_eq!(transport.sent(), vec!["spaced out"]);
        assert_eq!(chat.store().history()[0].render(Locale::En), "spaced out");
    }

    #[tokio::test]
    async fn test_whitespace_only_sends_nothing() {
        let transport = FakeChat::replying(Ok(Some("never".into())));
        let chat = controller(transport.clone());
        chat.store().set_input_buffer("   ");

        let outcome = chat.send_message().await;

        assert_eq!(outcome, SendOutcome::Ignored(ChatError::EmptyMessage));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(chat.store().history().is_empty());
    }

    #[tokio::test]
    async fn test_empty_reply_appends_no_reply_message() {
        let chat = controller(FakeChat::replying(Ok(None)));
        chat.store().set_input_buffer("hello");

        let outcome = chat.send_message().await;

        assert_eq!(outcome, SendOutcome::Delivered(None));
        assert_eq!(
            chat.store().history()[1].content,
            MessageText::Key(TextKey::NoReplyReceived)
        );
    }

    #[tokio::test]
    async fn test_failure_appends_generic_error() {
        let err = TransportError::Status {
            status: 500,
            message: Some("stack trace here".into()),
        };
        let chat = controller(FakeChat::replying(Err(err.clone())));
        chat.store().set_input_buffer("hello");

        let outcome = chat.send_message().await;

        assert_eq!(outcome, SendOutcome::Failed(ChatError::Transport(err)));
        let store = chat.store();
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history()[1].content, MessageText::Key(TextKey::ChatError));
        assert!(!store.history()[1].render(Locale::En).contains("stack trace"));
        assert!(!store.is_sending());
    }

    #[tokio::test]
    async fn test_overlapping_send_is_ignored() {
        let gate = Arc::new(Notify::new());
        let transport = FakeChat::gated(gate.clone());
        let chat = Arc::new(controller(transport.clone()));
        chat.store().set_input_buffer("first");

        let first = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send_message().await }
        });
        while transport.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(chat.store().is_sending());

        chat.store().set_input_buffer("second");
        let outcome = chat.send_message().await;
        assert_eq!(outcome, SendOutcome::Ignored(ChatError::Busy));
        assert_eq!(chat.store().input(), "second");

        gate.notify_one();
        assert_eq!(
            first.await.unwrap(),
            SendOutcome::Delivered(Some("late".into()))
        );
        assert_eq!(transport.sent(), vec!["first"]);
        assert_eq!(chat.store().history().len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_send_clears_sending() {
        let gate = Arc::new(Notify::new());
        let chat = controller(FakeChat::gated(gate));
        chat.store().set_input_buffer("abandoned");

        let mut pending = Box::pin(chat.send_message());
        let timed_out = tokio::time::timeout(Duration::from_millis(20), &mut pending).await;
        assert!(timed_out.is_err());
        assert!(chat.store().is_sending());

        drop(pending);
        let store = chat.store();
        assert!(!store.is_sending());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_settled_release_leaves_next_send_in_flight() {
        let store = Mutex::new(ConversationStore::new());
        let first = {
            let mut store = store.lock().unwrap();
            store.set_input_buffer("first");
            store.begin_send().unwrap()
        };
        let mut release = SendingRelease::armed(&store);
        {
            let mut store = store.lock().unwrap();
            store.settle(first, Settlement::NoReply);
            release.disarm();
        }

        // Another send starts before the first one's guard goes away.
        let second = {
            let mut store = store.lock().unwrap();
            store.set_input_buffer("second");
            store.begin_send().unwrap()
        };
        drop(release);

        let store = store.lock().unwrap();
        assert!(store.is_sending());
        assert_eq!(second.text(), "second");
    }

    #[test]
    fn test_armed_release_clears_sending() {
        let store = Mutex::new(ConversationStore::new());
        {
            let mut store = store.lock().unwrap();
            store.set_input_buffer("hello");
            let _pending = store.begin_send().unwrap();
        }
        drop(SendingRelease::armed(&store));
        assert!(!store.lock().unwrap().is_sending());
    }

    #[tokio::test]
    async fn test_transcript_fills_input_buffer() {
        let chat = controller(FakeChat::replying(Ok(None)));
        let sink: &dyn TranscriptSink = &chat;
        sink.set_transcript("spoken words".into());
        assert_eq!(chat.store().input(), "spoken words");
    }

    #[tokio::test]
    async fn test_events_follow_send_cycle() {
        let chat = controller(FakeChat::replying(Ok(Some("hi".into()))));
        chat.store().set_input_buffer("hello");
        let mut rx = chat.subscribe();

        chat.send_message().await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                ConversationEvent::MessageAppended { index: 1 },
                ConversationEvent::ScrollToLatest,
                ConversationEvent::InputChanged,
                ConversationEvent::SendingChanged(true),
                ConversationEvent::MessageAppended { index: 2 },
                ConversationEvent::ScrollToLatest,
                ConversationEvent::SendingChanged(false),
            ]
        );
    }
}
