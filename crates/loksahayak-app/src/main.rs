//! LokSahayak client binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install the tracing subscriber (stderr)
//! 3. Build the API client with the persisted bearer token
//! 4. Run the chosen subcommand (interactive chat by default)

mod account;
mod cli;
mod commands;
mod factcheck;
mod repl;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use loksahayak_api::{ApiClient, TokenStore};
use loksahayak_chat::ChatController;
use loksahayak_core::config::LokConfig;
use loksahayak_speech::SpeechAdapter;
use loksahayak_upload::{DiskPreviewProvider, UploadHandler};

use cli::{CliArgs, Command};
use repl::ChatSession;
use terminal::Terminal;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Loaded before tracing so the file's log level applies.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = match LokConfig::load(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (LokConfig::default(), Some(e)),
    };
    config.api.base_url = args.resolve_base_url(&config.api.base_url);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }

    // Tracing. RUST_LOG wins over flags and config.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting LokSahayak v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config. Using defaults."
        ),
    }

    let data_dir = resolve_data_dir(&config.general.data_dir);
    let token_store = TokenStore::new(data_dir.join("token"));
    let client = Arc::new(ApiClient::new(&config.api)?.with_token_store(token_store));
    tracing::info!(base_url = %client.base_url(), "API client ready");

    match args.command() {
        Command::Chat => {
            let terminal = Arc::new(Terminal::new(args.resolve_locale(config.locale())));
            let chat = Arc::new(ChatController::new(client.clone()));

            let preview_dir = config
                .upload
                .preview_dir
                .as_deref()
                .map(resolve_data_dir)
                .unwrap_or_else(|| data_dir.join("previews"));
            let uploads = Arc::new(UploadHandler::new(
                client.clone(),
                Arc::new(DiskPreviewProvider::new(preview_dir)),
                terminal.clone(),
            ));

            // No speech recognizer is available in a terminal.
            let (speech, speech_events) = SpeechAdapter::new(None, terminal.clone(), chat.clone());

            ChatSession::new(chat, uploads, speech, config.speech.enabled, terminal)
                .run(speech_events)
                .await?;
        }
        Command::Login { identifier } => account::login(&client, identifier).await?,
        Command::Signup {
            full_name,
            username,
            language,
        } => account::signup(&client, full_name, username, language).await?,
        Command::Logout => account::logout(&client),
        Command::Factcheck { claim } => factcheck::run(&config.factcheck, &claim.join(" ")).await?,
    }

    Ok(())
}
