//! CLI argument definitions for the LokSahayak client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use loksahayak_core::i18n::Locale;

pub const CONFIG_ENV: &str = "LOKSAHAYAK_CONFIG";
pub const BASE_URL_ENV: &str = "LOKSAHAYAK_BASE_URL";

/// LokSahayak: a multilingual document assistant in your terminal.
#[derive(Parser, Debug)]
#[command(name = "loksahayak", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the LokSahayak API.
    #[arg(short = 'u', long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Directory for the auth token and image previews.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Interface language (en, hi, bn).
    #[arg(long = "lang", global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Chat with the assistant (default).
    Chat,
    /// Sign in and store the issued token.
    Login {
        /// Phone number or email address.
        #[arg(short = 'i', long)]
        identifier: Option<String>,
    },
    /// Create an account.
    Signup {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Preferred language, e.g. Hindi.
        #[arg(long)]
        language: Option<String>,
    },
    /// Forget the stored token.
    Logout,
    /// Score a claim with the placeholder fact checker.
    ///
    /// Without a claim, reads claims interactively and keeps a history.
    Factcheck {
        /// The claim to check.
        #[arg(num_args = 0..)]
        claim: Vec<String>,
    },
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > LOKSAHAYAK_CONFIG env var > ~/.loksahayak/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_with(std::env::var(CONFIG_ENV).ok())
    }

    fn resolve_config_path_with(&self, env: Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env.filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API base URL.
    ///
    /// Priority: --base-url flag > LOKSAHAYAK_BASE_URL env var > config file value.
    pub fn resolve_base_url(&self, config_url: &str) -> String {
        self.resolve_base_url_with(std::env::var(BASE_URL_ENV).ok(), config_url)
    }

    fn resolve_base_url_with(&self, env: Option<String>, config_url: &str) -> String {
        if let Some(ref url) = self.base_url {
            return url.clone();
        }
        if let Some(url) = env.filter(|u| !u.trim().is_empty()) {
            return url;
        }
        config_url.to_string()
    }

    /// Resolve the data directory. Returns `None` if not overridden.
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Priority: --lang flag > config file value. Unknown codes fall back to English.
    pub fn resolve_locale(&self, config_locale: Locale) -> Locale {
        match self.lang.as_deref() {
            Some(code) => Locale::from_code_or_default(code),
            None => config_locale,
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".loksahayak").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".loksahayak").join("config.toml");
    }
    PathBuf::from("config.toml")
}
