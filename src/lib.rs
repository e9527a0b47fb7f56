//! Firebase auth client library for Rust
//!
//! Binds a backend SDK handle to a reactive auth controller: a stream of the
//! current auth state plus validated `login`/`logout`.

pub mod config;
pub mod error;

use std::sync::Arc;

use url::Url;

pub use fireauth_rust_auth as auth;
use fireauth_rust_auth::{AuthController, FirebaseSdk, SdkAuthBackend};

use crate::config::ClientOptions;

/// The main entry point for the client
pub struct FireAuth {
    /// The backend URL, when configured. Informational; see [`ClientOptions::url`]
    url: Option<Url>,
    /// Auth controller for login, logout and auth state
    auth: AuthController,
    /// Client options
    options: ClientOptions,
}

impl FireAuth {
    /// Create a new client over an SDK handle
    ///
    /// # Arguments
    ///
    /// * `sdk` - The backend SDK handle (database reference)
    pub fn new<S>(sdk: S) -> Self
    where
        S: FirebaseSdk + 'static,
    {
        Self::new_with_options(sdk, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Arguments
    ///
    /// * `sdk` - The backend SDK handle
    /// * `options` - Client options; `auth_config` becomes the default login options
    pub fn new_with_options<S>(sdk: S, options: ClientOptions) -> Self
    where
        S: FirebaseSdk + 'static,
    {
        let backend = Arc::new(SdkAuthBackend::new(sdk));
        let config = options
            .auth_config
            .as_ref()
            .map(|config| config.login_options().clone());

        if let Some(url) = &options.url {
            log::debug!("Creating auth client for {}", url);
        }

        Self {
            url: options.url.clone(),
            auth: AuthController::new(backend, config),
            options,
        }
    }

    /// Get a reference to the auth controller
    pub fn auth(&self) -> &AuthController {
        &self.auth
    }

    /// The configured backend URL. Reported only; the SDK handle does the connecting.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}
