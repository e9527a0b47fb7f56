//! Auth controller: validated login dispatch and the normalized state stream

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::task::{Context, Poll};

use log::{debug, info, trace, warn};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::backend::{AuthBackend, BackendCall, ListenerHandle, SdkAuthBackend};
use crate::error::AuthError;
use crate::sdk::{Continuation, FirebaseSdk, StateListener};
use crate::stream::{AuthStateEvent, AuthStateStream};
use crate::types::{
    normalize_state, AuthMethod, Credentials, LoginOptions, NormalizedAuthState, RawAuthState,
};

/// Validate the effective options and map them onto a backend call.
///
/// Nothing is sent to the backend when this fails.
pub fn resolve_call(
    credentials: Option<Credentials>,
    effective: &LoginOptions,
) -> Result<BackendCall, AuthError> {
    let method = effective.method.ok_or(AuthError::MissingMethod)?;
    let options = effective.remaining();

    match method {
        AuthMethod::Anonymous => Ok(BackendCall::Anonymous { options }),
        AuthMethod::Password => {
            let credentials = credentials.ok_or(AuthError::MissingCredentials(method))?;
            Ok(BackendCall::Password {
                credentials: credentials.to_value(),
                options,
            })
        }
        AuthMethod::CustomToken => {
            let token = credentials
                .as_ref()
                .and_then(Credentials::token_value)
                .filter(|token| !token.is_empty())
                .ok_or(AuthError::MissingToken)?;
            Ok(BackendCall::CustomToken {
                token: token.to_string(),
                options,
            })
        }
        AuthMethod::OAuthToken => {
            let credentials = credentials.ok_or(AuthError::MissingCredentials(method))?;
            let provider = effective
                .provider
                .ok_or(AuthError::MissingProvider(method))?;
            // A bare token goes through as a string, anything else as the object.
            let credentials = match &credentials {
                Credentials::Token { token, extra } if !token.is_empty() && extra.is_empty() => {
                    Value::String(token.clone())
                }
                other => other.to_value(),
            };
            Ok(BackendCall::OAuthToken {
                provider,
                credentials,
                options,
            })
        }
        AuthMethod::Popup => {
            let provider = effective
                .provider
                .ok_or(AuthError::MissingProvider(method))?;
            Ok(BackendCall::Popup { provider, options })
        }
        AuthMethod::Redirect => {
            let provider = effective
                .provider
                .ok_or(AuthError::MissingProvider(method))?;
            Ok(BackendCall::Redirect { provider, options })
        }
    }
}

/// Outcome of a single [`AuthController::login`] call.
///
/// Resolves when the backend calls the continuation. If the backend never
/// calls it, the future stays pending.
pub struct LoginFuture {
    inner: LoginInner,
}

enum LoginInner {
    Rejected(AuthError),
    Waiting(oneshot::Receiver<Result<NormalizedAuthState, AuthError>>),
}

impl LoginFuture {
    fn rejected(err: AuthError) -> Self {
        Self {
            inner: LoginInner::Rejected(err),
        }
    }

    fn waiting(rx: oneshot::Receiver<Result<NormalizedAuthState, AuthError>>) -> Self {
        Self {
            inner: LoginInner::Waiting(rx),
        }
    }

    /// Whether the login was rejected before reaching the backend
    pub fn is_rejected_locally(&self) -> bool {
        matches!(self.inner, LoginInner::Rejected(_))
    }
}

impl Future for LoginFuture {
    type Output = Result<NormalizedAuthState, AuthError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            LoginInner::Rejected(err) => Poll::Ready(Err(err.clone())),
            LoginInner::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(AuthError::ContinuationDropped))),
        }
    }
}

#[derive(Default)]
struct StateHub {
    subscribers: Vec<(Uuid, mpsc::UnboundedSender<AuthStateEvent>)>,
    latest: Option<AuthStateEvent>,
    registered: bool,
    listener: Option<ListenerHandle>,
}

impl StateHub {
    fn publish(&mut self, raw: Option<RawAuthState>) {
        let event = normalize_state(raw);
        if let Err(AuthError::UnrecognizedProvider(name)) = &event {
            warn!("Backend reported unrecognized auth provider '{}'", name);
        }
        trace!(
            "Delivering auth state to {} subscriber(s)",
            self.subscribers.len()
        );
        self.subscribers.retain(|(id, tx)| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                warn!("Auth state subscriber {} went away", id);
            }
            delivered
        });
        self.latest = Some(event);
    }
}

fn lock(hub: &Mutex<StateHub>) -> MutexGuard<'_, StateHub> {
    hub.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Auth client: normalized state stream plus login/logout.
pub struct AuthController {
    backend: Arc<dyn AuthBackend>,
    config: Option<LoginOptions>,
    hub: Arc<Mutex<StateHub>>,
}

impl AuthController {
    /// Create a controller over `backend`, with optional default login options.
    pub fn new(backend: Arc<dyn AuthBackend>, config: Option<LoginOptions>) -> Self {
        Self {
            backend,
            config,
            hub: Arc::new(Mutex::new(StateHub::default())),
        }
    }

    /// Create a controller straight from an SDK handle.
    pub fn from_sdk<S>(sdk: S, config: Option<LoginOptions>) -> Self
    where
        S: FirebaseSdk + 'static,
    {
        Self::new(Arc::new(SdkAuthBackend::new(sdk)), config)
    }

    pub fn config(&self) -> Option<&LoginOptions> {
        self.config.as_ref()
    }

    /// Subscribe to the auth state.
    ///
    /// The first subscription registers the one backend listener; the backend
    /// answers it immediately with its current state. Later subscribers get
    /// the most recent state right away, then every change.
    pub fn subscribe(&self) -> AuthStateStream {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        let register = {
            let mut hub = lock(&self.hub);
            if let Some(latest) = &hub.latest {
                // Receiver is alive: it's still in this scope.
                let _ = tx.send(latest.clone());
            }
            hub.subscribers.push((id, tx));
            let register = !hub.registered;
            hub.registered = true;
            register
        };

        // The backend calls the listener synchronously, so the lock must be free here.
        if register {
            let hub: Weak<Mutex<StateHub>> = Arc::downgrade(&self.hub);
            let listener: StateListener = Arc::new(move |raw| {
                if let Some(hub) = hub.upgrade() {
                    lock(&hub).publish(raw);
                }
            });
            let handle = self.backend.on_auth_state_change(listener);
            lock(&self.hub).listener = Some(handle);
        }

        AuthStateStream::new(id, rx)
    }

    /// Log in.
    ///
    /// `options` are merged over the controller's configuration, key by key.
    /// Validation and dispatch happen before this returns; the future only
    /// waits for the backend's answer.
    pub fn login(
        &self,
        credentials: Option<Credentials>,
        options: Option<LoginOptions>,
    ) -> LoginFuture {
        let effective = LoginOptions::merge(self.config.as_ref(), options.as_ref());

        let call = match resolve_call(credentials, &effective) {
            Ok(call) => call,
            Err(err) => {
                debug!("Login rejected before dispatch: {}", err);
                return LoginFuture::rejected(err);
            }
        };

        let (tx, rx) = oneshot::channel();
        let continuation: Continuation = Box::new(move |result| {
            let outcome = result
                .map_err(AuthError::Backend)
                .and_then(RawAuthState::normalize);
            if tx.send(outcome).is_err() {
                trace!("Login result dropped; caller no longer waiting");
            }
        });
        self.backend.login(call, continuation);

        LoginFuture::waiting(rx)
    }

    /// Log in using options only.
    pub fn login_with(&self, options: LoginOptions) -> LoginFuture {
        self.login(None, Some(options))
    }

    /// Log out. Fire-and-forget: backend failures are not reported.
    pub fn logout(&self) {
        info!("Logout requested");
        self.backend.logout();
    }

    /// The backend's current auth state, normalized.
    pub fn get_auth(&self) -> Result<Option<NormalizedAuthState>, AuthError> {
        normalize_state(self.backend.get_auth())
    }

    /// Live subscribers. Streams that were dropped are pruned first.
    pub fn subscriber_count(&self) -> usize {
        let mut hub = lock(&self.hub);
        hub.subscribers.retain(|(_, tx)| !tx.is_closed());
        hub.subscribers.len()
    }
}

impl Drop for AuthController {
    fn drop(&mut self) {
        let handle = lock(&self.hub).listener.take();
        if let Some(handle) = handle {
            self.backend.off_auth_state_change(handle);
        }
    }
}
