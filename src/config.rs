//! Configuration options for the Firebase auth client

use fireauth_rust_auth::{AuthMethod, AuthProvider, LoginOptions, Remember};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::Error;

/// A named, reusable set of login options: method, provider and whatever
/// else the backend should receive on every login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthConfig {
    options: LoginOptions,
}

/// Bind `options` into an [`AuthConfig`].
///
/// # Example
///
/// ```
/// use fireauth_rust::config::firebase_auth_config;
/// use fireauth_rust_auth::{AuthMethod, AuthProvider, LoginOptions};
///
/// let config = firebase_auth_config(
///     LoginOptions::new(AuthMethod::Popup).provider(AuthProvider::Github),
/// );
/// assert_eq!(config.method(), Some(AuthMethod::Popup));
/// ```
pub fn firebase_auth_config(options: LoginOptions) -> AuthConfig {
    AuthConfig { options }
}

impl AuthConfig {
    pub fn new(method: AuthMethod) -> Self {
        firebase_auth_config(LoginOptions::new(method))
    }

    /// Load a configuration from JSON, e.g. `{"method": "popup", "provider": "google"}`.
    ///
    /// The configuration must name a method.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let options: LoginOptions = serde_json::from_str(json)?;
        if options.method.is_none() {
            return Err(Error::config("auth config must name a login method"));
        }
        Ok(firebase_auth_config(options))
    }

    /// Set the login method
    pub fn with_method(mut self, method: AuthMethod) -> Self {
        self.options.method = Some(method);
        self
    }

    /// Set the identity provider
    pub fn with_provider(mut self, provider: AuthProvider) -> Self {
        self.options.provider = Some(provider);
        self
    }

    /// Set the OAuth scopes
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.scope(scope);
        self
    }

    /// Set session persistence
    pub fn with_remember(mut self, remember: Remember) -> Self {
        self.options.remember = Some(remember);
        self
    }

    /// Add a backend passthrough option
    pub fn with_option<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.options = self.options.option(key, value);
        self
    }

    pub fn method(&self) -> Option<AuthMethod> {
        self.options.method
    }

    pub fn login_options(&self) -> &LoginOptions {
        &self.options
    }

    pub fn into_login_options(self) -> LoginOptions {
        self.options
    }
}

impl From<LoginOptions> for AuthConfig {
    fn from(options: LoginOptions) -> Self {
        firebase_auth_config(options)
    }
}

/// Configuration options for the client
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// The backend URL the SDK handle points at.
    ///
    /// Informational only: the SDK handle is already bound to its URL, so the
    /// client validates and reports this value but never connects with it.
    pub url: Option<Url>,

    /// Default login options
    pub auth_config: Option<AuthConfig>,
}

impl ClientOptions {
    /// Set the backend URL
    pub fn with_url(mut self, url: &str) -> Result<Self, Error> {
        self.url = Some(Url::parse(url)?);
        Ok(self)
    }

    /// Set the default login options
    pub fn with_auth_config(mut self, config: AuthConfig) -> Self {
        self.auth_config = Some(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let config = AuthConfig::new(AuthMethod::Popup)
            .with_provider(AuthProvider::Google)
            .with_scope(["email"])
            .with_remember(Remember::SessionOnly)
            .with_option("requestedBy", "login-page");

        let options = config.login_options();
        assert_eq!(options.method, Some(AuthMethod::Popup));
        assert_eq!(options.provider, Some(AuthProvider::Google));
        assert_eq!(
            options.remaining(),
            json!({
                "remember": "sessionOnly",
                "scope": ["email"],
                "requestedBy": "login-page"
            })
        );
    }

    #[test]
    fn test_from_json_str() {
        let config =
            AuthConfig::from_json_str(r#"{"method": "redirect", "provider": "facebook"}"#).unwrap();
        assert_eq!(config.method(), Some(AuthMethod::Redirect));
        assert_eq!(config.login_options().provider, Some(AuthProvider::Facebook));
    }

    #[test]
    fn test_from_json_str_requires_method() {
        let err = AuthConfig::from_json_str(r#"{"provider": "facebook"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = AuthConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_client_options_url() {
        let options = ClientOptions::default()
            .with_url("ws://localhost.firebaseio.test:5000")
            .unwrap();
        assert_eq!(options.url.unwrap().scheme(), "ws");

        let err = ClientOptions::default().with_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }
}
