//! `reqwest`-backed client for the chat, upload and auth endpoints.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use loksahayak_core::config::ApiConfig;
use loksahayak_core::transport::{ChatTransport, TransportError, UploadTransport};
use loksahayak_core::types::SelectedFile;

use crate::token::TokenStore;

/// Multipart field name expected by `/user/image/upload`.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    user: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the external API.
///
/// Holds the current bearer token. When a [`TokenStore`] is attached, the
/// token is loaded from it at construction and written back whenever a new
/// one is issued.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_base_url: String,
    token: RwLock<Option<String>>,
    token_store: Option<TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("auth_base_url", &self.auth_base_url)
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `config`. No request timeout is configured; the
    /// transport's own failures are surfaced as-is.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("loksahayak/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_base_url: config.auth_base_url().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            token_store: None,
        })
    }

    /// Attach persistent token storage, adopting any token already saved.
    pub fn with_token_store(mut self, store: TokenStore) -> Self {
        if let Some(token) = store.load() {
            tracing::debug!("Bearer token restored from {}", store.path().display());
            *self.token.get_mut().unwrap_or_else(PoisonError::into_inner) = Some(token);
        }
        self.token_store = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the bearer token used for subsequent requests and persist it.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if let Some(store) = &self.token_store {
            if let Err(e) = store.save(&token) {
                tracing::warn!(error = %e, "Failed to persist bearer token");
            }
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the bearer token, in memory and on disk.
    pub fn clear_token(&self) {
        if let Some(store) = &self.token_store {
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "Failed to remove stored bearer token");
            }
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn post(&self, base: &str, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", base, path.trim_start_matches('/'));
        let builder = self.http.post(url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }
}

/// Send a request, mapping transport failures and non-2xx statuses.
pub(crate) async fn execute(request: RequestBuilder) -> Result<Response, TransportError> {
    let response = request
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Interpret a chat response body as the bot reply.
///
/// A JSON string is unwrapped; JSON `null` and blank bodies count as no
/// reply; anything else is returned verbatim.
pub fn parse_chat_reply(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) => None,
        Ok(Value::String(text)) if text.trim().is_empty() => None,
        Ok(Value::String(text)) => Some(text),
        _ => Some(body.to_string()),
    }
}

#[async_trait]
impl ChatTransport for ApiClient {
    async fn send_chat(&self, user: &str) -> Result<Option<String>, TransportError> {
        let request = self
            .post(&self.base_url, "/user/chat")
            .json(&ChatRequest { user });
        let response = execute(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        tracing::debug!(body_len = body.len(), "Chat reply received");
        Ok(parse_chat_reply(&body))
    }
}

#[async_trait]
impl UploadTransport for ApiClient {
    async fn upload_image(&self, file: &SelectedFile) -> Result<(), TransportError> {
        let part = match Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
        {
            Ok(part) => part,
            Err(e) => {
                tracing::warn!(media_type = %file.media_type, error = %e, "Unparseable media type, sending untyped part");
                Part::bytes(file.bytes.clone()).file_name(file.name.clone())
            }
        };
        let form = Form::new().part(IMAGE_FIELD, part);

        let request = self
            .post(&self.base_url, "/user/image/upload")
            .multipart(form);
        execute(request).await?;
        tracing::info!(file = %file.name, bytes = file.len(), "Image uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text_reply() {
        assert_eq!(parse_chat_reply("Hello there"), Some("Hello there".into()));
    }

    #[test]
    fn test_parse_json_string_reply_is_unwrapped() {
        assert_eq!(parse_chat_reply("\"Hello\""), Some("Hello".into()));
    }

    #[test]
    fn test_parse_empty_replies() {
        assert_eq!(parse_chat_reply(""), None);
        assert_eq!(parse_chat_reply("   \n"), None);
        assert_eq!(parse_chat_reply("null"), None);
        assert_eq!(parse_chat_reply("\"  \""), None);
    }

    #[test]
    fn test_parse_json_object_reply_is_verbatim() {
        let body = r#"{"answer":"42"}"#;
        assert_eq!(parse_chat_reply(body), Some(body.to_string()));
    }

    #[test]
    fn test_new_trims_trailing_slashes() {
        let config = ApiConfig {
            base_url: "http://localhost:3000/".into(),
            auth_base_url: Some("https://auth.test//".into()),
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.auth_base_url(), "https://auth.test");
    }

    #[test]
    fn test_token_roundtrip_without_store() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        assert!(client.token().is_none());
        client.set_token("abc");
        assert_eq!(client.token().as_deref(), Some("abc"));
        client.clear_token();
        assert!(client.token().is_none());
    }

    #[test]
    fn test_token_store_is_adopted_and_updated() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save("saved").unwrap();

        let client = ApiClient::new(&ApiConfig::default())
            .unwrap()
            .with_token_store(TokenStore::new(dir.path().join("token")));
        assert_eq!(client.token().as_deref(), Some("saved"));

        client.set_token("fresh");
        assert_eq!(store.load().as_deref(), Some("fresh"));

        client.clear_token();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        client.set_token("secret-value");
        let dbg = format!("{:?}", client);
        assert!(!dbg.contains("secret-value"));
        assert!(dbg.contains("has_token: true"));
    }
}
