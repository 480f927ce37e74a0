//! Interactive chat loop.
//!
//! Stdin lines, recognizer events and Ctrl-C are multiplexed with
//! `tokio::select!`. Sends and uploads run as background tasks so the loop
//! stays responsive; replies are printed from conversation events.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;

use loksahayak_chat::{ChatController, ChatError, ConversationEvent, SendOutcome};
use loksahayak_core::error::LokError;
use loksahayak_core::i18n::TextKey;
use loksahayak_core::types::Role;
use loksahayak_speech::{RecognitionEvent, SessionEvent, SpeechAdapter, SpeechError};
use loksahayak_upload::{load_file, UploadError, UploadHandler};

use crate::commands::{self, ChatCommand};
use crate::terminal::Terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ChatSession {
    chat: Arc<ChatController>,
    uploads: Arc<UploadHandler>,
    speech: SpeechAdapter,
    speech_enabled: bool,
    terminal: Arc<Terminal>,
    tasks: JoinSet<()>,
}

impl ChatSession {
    pub fn new(
        chat: Arc<ChatController>,
        uploads: Arc<UploadHandler>,
        speech: SpeechAdapter,
        speech_enabled: bool,
        terminal: Arc<Terminal>,
    ) -> Self {
        Self {
            chat,
            uploads,
            speech,
            speech_enabled,
            terminal,
            tasks: JoinSet::new(),
        }
    }

    pub async fn run(
        mut self,
        mut speech_events: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> Result<(), LokError> {
        if let Some(greeting) = self.chat.store().messages().first() {
            self.terminal.print_message(0, greeting);
        }
        println!("  {}", console::style("/help for commands").dim());

        let renderer = tokio::spawn(render_events(
            Arc::clone(&self.chat),
            Arc::clone(&self.terminal),
            self.chat.subscribe(),
        ));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                }
                Some(event) = speech_events.recv() => self.handle_speech_event(event),
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            }
        }

        renderer.abort();
        self.tasks.shutdown().await;
        tracing::info!("Chat session ended");
        Ok(())
    }

    /// Apply one line of user input.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let Some(command) = commands::parse(line) else {
            if !line.trim().is_empty() {
                self.chat.store().set_input_buffer(line);
            }
            self.spawn_send();
            return Flow::Continue;
        };

        match command {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Quit => return Flow::Quit,
            ChatCommand::History => {
                let history = self.chat.store().history().to_vec();
                self.terminal.print_history(&history);
            }
            ChatCommand::Delete(index) => {
                let deleted = self.chat.store().delete_message(index);
                if deleted.is_some() {
                    let history = self.chat.store().history().to_vec();
                    self.terminal.print_history(&history);
                }
            }
            ChatCommand::Lang => {
                let locale = self.terminal.cycle_locale();
                self.terminal.print_info(&format!(
                    "{} | {}",
                    locale.native_name(),
                    locale.text(TextKey::Placeholder)
                ));
            }
            ChatCommand::Image(path) => self.select_image(&path).await,
            ChatCommand::Mic => self.toggle_mic(),
            ChatCommand::Unknown(what) => self
                .terminal
                .print_error(&format!("Unknown command: {what}. Type /help for available commands.")),
        }
        Flow::Continue
    }

    fn spawn_send(&mut self) {
        let chat = Arc::clone(&self.chat);
        let terminal = Arc::clone(&self.terminal);
        self.tasks.spawn(async move {
            if let SendOutcome::Ignored(ChatError::Busy) = chat.send_message().await {
                terminal.print_info(
                    "Still waiting for the previous reply. Press Enter to send this once it arrives.",
                );
            }
        });
    }

    async fn select_image(&mut self, path: &Path) {
        let file = match load_file(path).await {
            Ok(file) => file,
            Err(e) => {
                self.terminal.print_error(&e.to_string());
                return;
            }
        };

        let uploads = Arc::clone(&self.uploads);
        let terminal = Arc::clone(&self.terminal);
        self.tasks.spawn(async move {
            let name = file.name.clone();
            match uploads.select_file(file).await {
                Ok(()) => {
                    let preview = uploads
                        .preview()
                        .map(|p| format!(" (preview: {p})"))
                        .unwrap_or_default();
                    terminal.print_info(&format!("Uploaded {name}{preview}"));
                }
                // Already surfaced as notices.
                Err(UploadError::NotAnImage(_)) | Err(UploadError::Transport(_)) => {}
                Err(e) => terminal.print_error(&e.to_string()),
            }
        });
    }

    fn toggle_mic(&mut self) {
        if !self.speech_enabled {
            self.terminal
                .print_info("Voice input is disabled in the configuration.");
            return;
        }
        match self.speech.toggle(self.terminal.locale()) {
            Ok(()) if self.speech.is_listening() => self.terminal.print_info(&format!(
                "/mic: {}",
                self.terminal.text(TextKey::StopListening)
            )),
            Ok(()) => {}
            // Already surfaced as a notice.
            Err(SpeechError::Unsupported) => {}
            Err(e) => self.terminal.print_error(&e.to_string()),
        }
    }

    fn handle_speech_event(&mut self, event: SessionEvent) {
        let is_result = matches!(event.event, RecognitionEvent::Result(_));
        self.speech.handle_event(event);
        if is_result {
            let input = self.chat.store().input().to_string();
            self.terminal
                .print_info(&format!("{input}  (press Enter to send)"));
        }
    }
}

/// Print bot messages and the typing indicator as the store changes.
async fn render_events(
    chat: Arc<ChatController>,
    terminal: Arc<Terminal>,
    mut events: broadcast::Receiver<ConversationEvent>,
) {
    loop {
        match events.recv().await {
            Ok(ConversationEvent::MessageAppended { index }) => {
                let message = chat.store().messages().get(index).cloned();
                if let Some(message) = message.filter(|m| m.role == Role::Bot) {
                    terminal.print_message(index, &message);
                }
            }
            Ok(ConversationEvent::SendingChanged(true)) => terminal.print_typing(),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind conversation events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
