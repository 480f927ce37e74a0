//! HTTP client for the external LokSahayak API.
//!
//! Implements the chat and upload transports used by the client-side state
//! machines, plus the sign-in/sign-up calls and bearer-token handling.

pub mod auth;
pub mod client;
pub mod token;

pub use auth::{AuthError, AuthOutcome, SignInForm, SignUpForm, SignupLanguage};
pub use client::{parse_chat_reply, ApiClient};
pub use token::TokenStore;
