//! Data types shared by the backend adapter and the controller

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::AuthError;

/// How a login is performed. Selects the backend call and the validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMethod {
    #[serde(rename = "popup")]
    Popup,
    #[serde(rename = "redirect")]
    Redirect,
    #[serde(rename = "anonymous")]
    Anonymous,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "customToken")]
    CustomToken,
    #[serde(rename = "oauthToken")]
    OAuthToken,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Popup => "Popup",
            Self::Redirect => "Redirect",
            Self::Anonymous => "Anonymous",
            Self::Password => "Password",
            Self::CustomToken => "CustomToken",
            Self::OAuthToken => "OAuthToken",
        };
        f.write_str(name)
    }
}

/// Identity providers known to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Github,
    Twitter,
    Facebook,
    Google,
    Password,
    Anonymous,
    Custom,
}

impl AuthProvider {
    /// Every provider, in declaration order.
    pub const ALL: [AuthProvider; 7] = [
        Self::Github,
        Self::Twitter,
        Self::Facebook,
        Self::Google,
        Self::Password,
        Self::Anonymous,
        Self::Custom,
    ];

    /// The token the backend expects for this provider.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Google => "google",
            Self::Password => "password",
            Self::Anonymous => "anonymous",
            Self::Custom => "custom",
        }
    }

    /// Exact, case-sensitive lookup of a raw backend provider name.
    pub fn from_raw(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == raw)
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_raw(s).ok_or_else(|| AuthError::UnrecognizedProvider(s.to_string()))
    }
}

/// Session persistence requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remember {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "sessionOnly")]
    SessionOnly,
    #[serde(rename = "none")]
    None,
}

/// Login options. Every field is optional so that options can be layered.
///
/// Fields the backend understands but this crate does not model are kept in
/// `extra` and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AuthMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<AuthProvider>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember: Option<Remember>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoginOptions {
    /// Options selecting `method` and nothing else
    pub fn new(method: AuthMethod) -> Self {
        Self {
            method: Some(method),
            ..Default::default()
        }
    }

    pub fn provider(mut self, provider: AuthProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn remember(mut self, remember: Remember) -> Self {
        self.remember = Some(remember);
        self
    }

    pub fn scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = Some(scope.into_iter().map(Into::into).collect());
        self
    }

    /// Add a backend passthrough field
    pub fn option<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Shallow merge: every key set in `overrides` wins over `base`.
    ///
    /// Collection fields are replaced, never concatenated, and nested objects
    /// in `extra` are not deep-merged.
    pub fn merge(base: Option<&LoginOptions>, overrides: Option<&LoginOptions>) -> LoginOptions {
        let mut merged = base.cloned().unwrap_or_default();
        let Some(overrides) = overrides else {
            return merged;
        };

        if overrides.method.is_some() {
            merged.method = overrides.method;
        }
        if overrides.provider.is_some() {
            merged.provider = overrides.provider;
        }
        if overrides.remember.is_some() {
            merged.remember = overrides.remember;
        }
        if overrides.scope.is_some() {
            merged.scope = overrides.scope.clone();
        }
        for (key, value) in &overrides.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Everything except `method` and `provider`, as the backend's options object.
    pub fn remaining(&self) -> Value {
        let mut out = self.extra.clone();
        out.remove("method");
        out.remove("provider");
        if let Some(remember) = self.remember {
            out.insert("remember".to_string(), json!(remember));
        }
        if let Some(scope) = &self.scope {
            out.insert("scope".to_string(), json!(scope));
        }
        Value::Object(out)
    }
}

/// Credentials, shaped by the login method.
///
/// Fields beyond the typed ones are kept in `extra` and sent to the backend
/// with the rest of the object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    /// `{email, password}` for [`AuthMethod::Password`]
    EmailPassword {
        email: String,
        password: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// `{token}` for [`AuthMethod::CustomToken`] and [`AuthMethod::OAuthToken`]
    Token {
        token: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    /// Provider-specific object, e.g. Twitter's `oauth_token` triple
    Object(Map<String, Value>),
}

impl Credentials {
    pub fn email_password(email: &str, password: &str) -> Self {
        Self::EmailPassword {
            email: email.to_string(),
            password: password.to_string(),
            extra: Map::new(),
        }
    }

    pub fn token(token: &str) -> Self {
        Self::Token {
            token: token.to_string(),
            extra: Map::new(),
        }
    }

    /// The `token` field, if these credentials carry one.
    pub fn token_value(&self) -> Option<&str> {
        match self {
            Self::Token { token, .. } => Some(token),
            Self::Object(map) => map.get("token").and_then(Value::as_str),
            Self::EmailPassword { extra, .. } => extra.get("token").and_then(Value::as_str),
        }
    }

    /// The full credentials object, passthrough fields included.
    pub fn to_value(&self) -> Value {
        match self {
            Self::EmailPassword {
                email,
                password,
                extra,
            } => {
                let mut out = extra.clone();
                out.insert("email".to_string(), Value::String(email.clone()));
                out.insert("password".to_string(), Value::String(password.clone()));
                Value::Object(out)
            }
            Self::Token { token, extra } => {
                let mut out = extra.clone();
                out.insert("token".to_string(), Value::String(token.clone()));
                Value::Object(out)
            }
            Self::Object(map) => Value::Object(map.clone()),
        }
    }
}

/// Auth state exactly as the backend reports it.
///
/// Besides `provider`, `uid` and `auth`, the backend adds a key named after the
/// provider (e.g. `github`) holding provider metadata; it lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAuthState {
    pub provider: String,
    pub uid: String,
    #[serde(default)]
    pub auth: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawAuthState {
    /// Map the provider string onto [`AuthProvider`], leaving everything else as is.
    pub fn normalize(self) -> Result<NormalizedAuthState, AuthError> {
        let provider = self.provider.parse::<AuthProvider>()?;
        Ok(NormalizedAuthState {
            provider,
            uid: self.uid,
            auth: self.auth,
            extra: self.extra,
        })
    }
}

/// Auth state handed to callers: the raw state with `provider` as an enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAuthState {
    pub provider: AuthProvider,
    pub uid: String,
    #[serde(default)]
    pub auth: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedAuthState {
    /// Metadata the backend attached under the provider's own key.
    pub fn provider_data(&self) -> Option<&Value> {
        self.extra.get(self.provider.as_str())
    }
}

impl TryFrom<RawAuthState> for NormalizedAuthState {
    type Error = AuthError;

    fn try_from(raw: RawAuthState) -> Result<Self, Self::Error> {
        raw.normalize()
    }
}

impl From<NormalizedAuthState> for RawAuthState {
    fn from(state: NormalizedAuthState) -> Self {
        RawAuthState {
            provider: state.provider.as_str().to_string(),
            uid: state.uid,
            auth: state.auth,
            extra: state.extra,
        }
    }
}

/// Normalize an optional backend state; `None` (logged out) stays `None`.
pub fn normalize_state(raw: Option<RawAuthState>) -> Result<Option<NormalizedAuthState>, AuthError> {
    raw.map(RawAuthState::normalize).transpose()
}
