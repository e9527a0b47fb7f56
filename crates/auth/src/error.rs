use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::types::AuthMethod;

/// Error value handed to a continuation by the backend. Opaque; never inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendError(pub Value);

impl BackendError {
    pub fn new<V: Into<Value>>(value: V) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("You must include credentials to use the {0} authentication method")]
    MissingCredentials(AuthMethod),

    #[error("You must include a token to use the CustomToken authentication method")]
    MissingToken,

    #[error("You must include a provider to use the {0} authentication method")]
    MissingProvider(AuthMethod),

    #[error("No authentication method was configured or supplied")]
    MissingMethod,

    #[error("{0}")]
    Backend(BackendError),

    #[error("Unrecognized auth provider: {0}")]
    UnrecognizedProvider(String),

    #[error("Backend dropped the login continuation without calling it")]
    ContinuationDropped,
}

impl AuthError {
    /// Raised locally, before anything reached the backend
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials(_)
                | Self::MissingToken
                | Self::MissingProvider(_)
                | Self::MissingMethod
        )
    }

    /// The untouched backend value, when the backend rejected the call.
    pub fn backend_value(&self) -> Option<&Value> {
        match self {
            Self::Backend(err) => Some(err.value()),
            _ => None,
        }
    }
}

impl From<BackendError> for AuthError {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}
