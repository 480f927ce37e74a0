//! Sign-in and sign-up against `/auth/*`.
//!
//! Forms are validated locally before any request is issued. A token in the
//! response is adopted by the [`ApiClient`] and attached as a bearer header
//! to every later request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use loksahayak_core::error::LokError;
use loksahayak_core::transport::TransportError;

use crate::client::{execute, ApiClient};

const SIGNIN_REJECTED: &str = "Invalid credentials. Please try again.";
const SIGNIN_NETWORK: &str = "Login failed. Please check your network connection.";
const SIGNUP_REJECTED: &str = "Signup failed. Please try again.";
const SIGNUP_NETWORK: &str = "An error occurred. Please check your network and try again.";

/// Errors surfaced to the login and signup screens.
///
/// The display text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    /// The server answered and refused the request.
    #[error("{0}")]
    Rejected(String),
    /// No usable response from the server.
    #[error("{0}")]
    Network(String),
}

impl From<AuthError> for LokError {
    fn from(err: AuthError) -> Self {
        LokError::Auth(err.to_string())
    }
}

/// Languages offered on the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignupLanguage {
    #[default]
    English,
    Hindi,
    Marathi,
    Tamil,
    Telugu,
    Gujarati,
    Kannada,
    Bengali,
    Punjabi,
    Urdu,
}

impl SignupLanguage {
    pub const ALL: [SignupLanguage; 10] = [
        SignupLanguage::English,
        SignupLanguage::Hindi,
        SignupLanguage::Marathi,
        SignupLanguage::Tamil,
        SignupLanguage::Telugu,
        SignupLanguage::Gujarati,
        SignupLanguage::Kannada,
        SignupLanguage::Bengali,
        SignupLanguage::Punjabi,
        SignupLanguage::Urdu,
    ];
}

impl fmt::Display for SignupLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for SignupLanguage {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.to_string().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AuthError::Validation(format!("Unsupported language: {wanted}")))
    }
}

/// Login form: phone number or email plus password.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.identifier.trim().is_empty() {
            return Err(AuthError::Validation(
                "Phone number / email address is required.".into(),
            ));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("Password is required.".into()));
        }
        Ok(())
    }
}

/// Account creation form.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub language: SignupLanguage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    full_name: &'a str,
    username: &'a str,
    password: &'a str,
    language: SignupLanguage,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.full_name.trim().is_empty() {
            return Err(AuthError::Validation("Full name is required.".into()));
        }
        if self.username.is_empty() {
            return Err(AuthError::Validation("Username is required.".into()));
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err(AuthError::Validation(
                "Username must not contain spaces.".into(),
            ));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("Password is required.".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    token: Option<String>,
}

/// Result of a successful auth call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    /// Whether the server issued a token (now attached to the client).
    pub token_issued: bool,
}

fn classify(err: TransportError, rejected: &str, network: &str) -> AuthError {
    if err.has_response() {
        AuthError::Rejected(err.server_message().unwrap_or(rejected).to_string())
    } else {
        AuthError::Network(network.to_string())
    }
}

impl ApiClient {
    /// `POST /auth/signin`.
    pub async fn sign_in(&self, form: &SignInForm) -> Result<AuthOutcome, AuthError> {
        form.validate()?;
        let request = self
            .post(self.auth_base_url(), "/auth/signin")
            .json(&SignInRequest {
                username: form.identifier.trim(),
                password: &form.password,
            });

        let response = execute(request).await.map_err(|e| {
            tracing::error!(error = %e, "Login failed");
            classify(e, SIGNIN_REJECTED, SIGNIN_NETWORK)
        })?;
        let body: AuthResponse = response.json().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Login response was not JSON");
            AuthResponse::default()
        });

        tracing::info!(username = %form.identifier.trim(), "Login successful");
        Ok(self.adopt(body))
    }

    /// `POST /auth/signup`.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<AuthOutcome, AuthError> {
        form.validate()?;
        let request = self
            .post(self.auth_base_url(), "/auth/signup")
            .json(&SignUpRequest {
                full_name: form.full_name.trim(),
                username: &form.username,
                password: &form.password,
                language: form.language,
            });

        let response = execute(request).await.map_err(|e| {
            tracing::error!(error = %e, "Signup failed");
            classify(e, SIGNUP_REJECTED, SIGNUP_NETWORK)
        })?;
        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| classify(TransportError::Decode(e.to_string()), SIGNUP_REJECTED, SIGNUP_NETWORK))?;

        if body.token.is_none() {
            tracing::warn!(username = %form.username, "Signup succeeded without a token");
        }
        Ok(self.adopt(body))
    }

    fn adopt(&self, body: AuthResponse) -> AuthOutcome {
        match body.token.filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                self.set_token(token);
                AuthOutcome { token_issued: true }
            }
            None => AuthOutcome {
                token_issued: false,
            },
        }
    }
}
