//! Terminal rendering and the notice sink.

use std::sync::{PoisonError, RwLock};

use console::style;

use loksahayak_core::i18n::{Locale, TextKey};
use loksahayak_core::notice::{Notice, NoticeSeverity, Notifier};
use loksahayak_core::types::{Message, Role};

/// Plain-text line for a message at `index` in the full log.
pub fn format_message(index: usize, message: &Message, locale: Locale) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Bot => locale.text(TextKey::Title),
    };
    format!("[{index}] {speaker}: {}", message.render(locale))
}

/// Shared terminal output, holding the active locale.
#[derive(Debug, Default)]
pub struct Terminal {
    locale: RwLock<Locale>,
}

impl Terminal {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale: RwLock::new(locale),
        }
    }

    pub fn locale(&self) -> Locale {
        *self.locale.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch to the next locale and return it.
    pub fn cycle_locale(&self) -> Locale {
        let mut locale = self.locale.write().unwrap_or_else(PoisonError::into_inner);
        *locale = locale.next();
        tracing::debug!(locale = %locale.code(), "Locale changed");
        *locale
    }

    pub fn text(&self, key: TextKey) -> &'static str {
        self.locale().text(key)
    }

    pub fn print_message(&self, index: usize, message: &Message) {
        let line = format_message(index, message, self.locale());
        match message.role {
            Role::User => println!("  {}", style(line).green()),
            Role::Bot => println!("  {}", style(line).cyan()),
        }
    }

    /// Everything after the greeting, numbered for `/delete`.
    pub fn print_history(&self, history: &[Message]) {
        println!();
        println!("  {}", style(self.text(TextKey::HistoryTitle)).bold());
        if history.is_empty() {
            println!("  {}", style(self.text(TextKey::HistoryEmpty)).dim());
        }
        for (offset, message) in history.iter().enumerate() {
            self.print_message(offset + 1, message);
        }
        println!();
    }

    pub fn print_typing(&self) {
        println!(
            "  {} {}",
            style(self.text(TextKey::Title)).cyan().bold(),
            style(self.text(TextKey::BotTyping)).dim()
        );
    }

    pub fn print_info(&self, text: &str) {
        println!("  {} {}", style("*").cyan().bold(), text);
    }

    pub fn print_error(&self, text: &str) {
        eprintln!("  {} {}", style("!").red().bold(), text);
    }
}

impl Notifier for Terminal {
    fn notify(&self, notice: Notice) {
        let text = self.text(notice.key);
        match notice.severity {
            NoticeSeverity::Blocking => {
                println!();
                println!("  {} {}", style("!").red().bold(), style(text).bold());
                println!();
            }
            NoticeSeverity::Inline => println!("  {} {}", style("?").yellow().bold(), text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let user = Message::user("hello");
        assert_eq!(format_message(1, &user, Locale::En), "[1] You: hello");

        let bot = Message::bot_key(TextKey::NoReplyReceived);
        assert_eq!(
            format_message(2, &bot, Locale::En),
            "[2] LokSahayak: No reply received."
        );
    }

    #[test]
    fn test_bot_keys_follow_locale() {
        let greeting = Message::bot_key(TextKey::InitialBotMessage);
        let en = format_message(0, &greeting, Locale::En);
        let hi = format_message(0, &greeting, Locale::Hi);
        assert_ne!(en, hi);
        assert!(hi.contains(Locale::Hi.text(TextKey::InitialBotMessage)));
    }

    #[test]
    fn test_cycle_locale_wraps() {
        let terminal = Terminal::new(Locale::En);
        assert_eq!(terminal.cycle_locale(), Locale::Hi);
        assert_eq!(terminal.cycle_locale(), Locale::Bn);
        assert_eq!(terminal.cycle_locale(), Locale::En);
        assert_eq!(terminal.locale(), Locale::En);
    }
}
