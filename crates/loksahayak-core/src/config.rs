use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LokError, Result};
use crate::i18n::Locale;

/// Top-level configuration for the LokSahayak client.
///
/// Loaded from `~/.loksahayak/config.toml` by default. Every field has a
/// default so a partial (or missing) file is always usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LokConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub factcheck: FactCheckConfig,
}

impl LokConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LokConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LokError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Initial UI locale.
    pub fn locale(&self) -> Locale {
        Locale::from_code_or_default(&self.general.locale)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory for the auth token and image previews.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Initial UI locale: "en", "hi" or "bn".
    pub locale: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.loksahayak/data".to_string(),
            log_level: "info".to_string(),
            locale: "en".to_string(),
        }
    }
}

/// External API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for `/user/chat` and `/user/image/upload`.
    pub base_url: String,
    /// Base URL for `/auth/*`. Defaults to `base_url` when unset.
    pub auth_base_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            auth_base_url: None,
        }
    }
}

impl ApiConfig {
    pub fn auth_base_url(&self) -> &str {
        self.auth_base_url.as_deref().unwrap_or(&self.base_url)
    }
}

/// Image upload settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for preview files. Defaults to `<data_dir>/previews`.
    pub preview_dir: Option<String>,
}

/// Speech input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether the microphone control is offered at all.
    pub enabled: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Placeholder fact checker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    /// Number of past checks kept in the history panel.
    pub history_limit: usize,
    /// Simulated backend latency in milliseconds.
    pub latency_ms: u64,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            latency_ms: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = LokConfig::default();
        assert_eq!(config.general.data_dir, "~/.loksahayak/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.locale(), Locale::En);
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.auth_base_url(), "http://localhost:3000");
        assert!(config.upload.preview_dir.is_none());
        assert!(config.speech.enabled);
        assert_eq!(config.factcheck.history_limit, 10);
        assert_eq!(config.factcheck.latency_ms, 800);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/custom/data"
log_level = "debug"
locale = "bn"

[api]
base_url = "http://api.example.test"
auth_base_url = "https://auth.example.test"

[upload]
preview_dir = "/tmp/previews"

[speech]
enabled = false

[factcheck]
history_limit = 3
latency_ms = 0
"#;
        let file = create_temp_config(content);
        let config = LokConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/custom/data");
        assert_eq!(config.locale(), Locale::Bn);
        assert_eq!(config.api.base_url, "http://api.example.test");
        assert_eq!(config.api.auth_base_url(), "https://auth.example.test");
        assert_eq!(config.upload.preview_dir.as_deref(), Some("/tmp/previews"));
        assert!(!config.speech.enabled);
        assert_eq!(config.factcheck.history_limit, 3);
        assert_eq!(config.factcheck.latency_ms, 0);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = LokConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.locale, "en");
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.factcheck.history_limit, 10);
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        let file = create_temp_config("[general]\nlocale = \"fr\"\n");
        let config = LokConfig::load(file.path()).unwrap();
        assert_eq!(config.locale(), Locale::En);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = LokConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.data_dir, "~/.loksahayak/data");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("[general\nlog_level = ");
        let result = LokConfig::load(file.path());
        assert!(matches!(result, Err(LokError::Config(_))));
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = LokConfig::default();
        config.general.locale = "hi".to_string();
        config.save(&path).unwrap();

        let reloaded = LokConfig::load(&path).unwrap();
        assert_eq!(reloaded.locale(), Locale::Hi);
        assert_eq!(reloaded.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = LokConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert!(config.speech.enabled);
    }
}
