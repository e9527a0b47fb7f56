//! The auth backend seam and its SDK-backed implementation

use std::fmt;

use log::{debug, info, trace};
use serde_json::Value;
use uuid::Uuid;

use crate::sdk::{Continuation, FirebaseSdk, SdkArg, SdkMethod, StateListener};
use crate::types::{AuthProvider, RawAuthState};

/// A login request, already validated and resolved to a backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Anonymous {
        options: Value,
    },
    Password {
        credentials: Value,
        options: Value,
    },
    CustomToken {
        token: String,
        options: Value,
    },
    OAuthToken {
        provider: AuthProvider,
        credentials: Value,
        options: Value,
    },
    Popup {
        provider: AuthProvider,
        options: Value,
    },
    Redirect {
        provider: AuthProvider,
        options: Value,
    },
}

impl BackendCall {
    pub fn sdk_method(&self) -> SdkMethod {
        match self {
            Self::Anonymous { .. } => SdkMethod::AuthAnonymously,
            Self::Password { .. } => SdkMethod::AuthWithPassword,
            Self::CustomToken { .. } => SdkMethod::AuthWithCustomToken,
            Self::OAuthToken { .. } => SdkMethod::AuthWithOAuthToken,
            Self::Popup { .. } => SdkMethod::AuthWithOAuthPopup,
            Self::Redirect { .. } => SdkMethod::AuthWithOAuthRedirect,
        }
    }

    /// Positional values in call order, without the continuation.
    fn into_values(self) -> Vec<Value> {
        match self {
            Self::Anonymous { options } => vec![options],
            Self::Password {
                credentials,
                options,
            } => vec![credentials, options],
            Self::CustomToken { token, options } => vec![Value::String(token), options],
            Self::OAuthToken {
                provider,
                credentials,
                options,
            } => vec![provider.as_str().into(), credentials, options],
            Self::Popup { provider, options } | Self::Redirect { provider, options } => {
                vec![provider.as_str().into(), options]
            }
        }
    }

    /// Full SDK argument list, with the continuation at the method's index.
    pub fn into_sdk_args(self, continuation: Continuation) -> (SdkMethod, Vec<SdkArg>) {
        let method = self.sdk_method();
        let mut args: Vec<SdkArg> = self.into_values().into_iter().map(SdkArg::Value).collect();
        args.insert(
            method.continuation_index(),
            SdkArg::Continuation(continuation),
        );
        debug_assert_eq!(args.len(), method.arity());
        (method, args)
    }
}

/// Registration returned by [`AuthBackend::on_auth_state_change`]
#[derive(Clone)]
pub struct ListenerHandle {
    id: Uuid,
    listener: StateListener,
}

impl ListenerHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle").field("id", &self.id).finish()
    }
}

/// Uniform auth surface over the backend
pub trait AuthBackend: Send + Sync {
    /// Start a login. `on_complete` runs once when the backend answers.
    fn login(&self, call: BackendCall, on_complete: Continuation);

    /// Log out if the backend currently holds an auth state; otherwise no-op.
    fn logout(&self);

    fn get_auth(&self) -> Option<RawAuthState>;

    /// `listener` is called right away with the current state, then on each change.
    fn on_auth_state_change(&self, listener: StateListener) -> ListenerHandle;

    fn off_auth_state_change(&self, handle: ListenerHandle);
}

/// [`AuthBackend`] over a [`FirebaseSdk`] handle
pub struct SdkAuthBackend<S> {
    sdk: S,
}

impl<S: FirebaseSdk> SdkAuthBackend<S> {
    pub fn new(sdk: S) -> Self {
        Self { sdk }
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }
}

impl<S: FirebaseSdk> AuthBackend for SdkAuthBackend<S> {
    fn login(&self, call: BackendCall, on_complete: Continuation) {
        let (method, args) = call.into_sdk_args(on_complete);
        debug!(
            "Dispatching {} with continuation at position {}",
            method,
            method.continuation_index()
        );
        self.sdk.invoke(method, args);
    }

    fn logout(&self) {
        if self.sdk.get_auth().is_some() {
            info!("Logging out");
            self.sdk.unauth();
        } else {
            trace!("Logout requested while not authenticated");
        }
    }

    fn get_auth(&self) -> Option<RawAuthState> {
        self.sdk.get_auth()
    }

    fn on_auth_state_change(&self, listener: StateListener) -> ListenerHandle {
        let handle = ListenerHandle {
            id: Uuid::new_v4(),
            listener: listener.clone(),
        };
        debug!("Registering auth state listener {}", handle.id);
        self.sdk
            .invoke(SdkMethod::OnAuth, vec![SdkArg::Listener(listener)]);
        handle
    }

    fn off_auth_state_change(&self, handle: ListenerHandle) {
        debug!("Removing auth state listener {}", handle.id);
        self.sdk
            .invoke(SdkMethod::OffAuth, vec![SdkArg::Listener(handle.listener)]);
    }
}
