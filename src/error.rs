//! Error handling for the Firebase auth client

use std::fmt;
use thiserror::Error;

use fireauth_rust_auth::AuthError;

/// Unified error type for the client
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication errors, passed through from the auth controller
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid client or auth configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// The underlying auth error, if any
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            Error::Auth(err) => Some(err),
            _ => None,
        }
    }
}
