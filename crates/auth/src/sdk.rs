//! Surface of the backend SDK handle.
//!
//! The SDK exposes positional, callback-last-ish methods where the completion
//! callback does not sit at a fixed index. [`SdkMethod::continuation_index`]
//! is the single table describing where it goes.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::BackendError;
use crate::types::RawAuthState;

/// Completion callback for a login call. Invoked at most once, with either the
/// backend's error or the new auth state.
pub type Continuation = Box<dyn FnOnce(Result<RawAuthState, BackendError>) + Send>;

/// Auth state listener registered through `onAuth`. Invoked with the current
/// state on registration, then on every change.
pub type StateListener = Arc<dyn Fn(Option<RawAuthState>) + Send + Sync>;

/// SDK methods that take a callback argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkMethod {
    OnAuth,
    OffAuth,
    AuthAnonymously,
    AuthWithCustomToken,
    AuthWithPassword,
    AuthWithOAuthPopup,
    AuthWithOAuthRedirect,
    AuthWithOAuthToken,
}

impl SdkMethod {
    pub const ALL: [SdkMethod; 8] = [
        Self::OnAuth,
        Self::OffAuth,
        Self::AuthAnonymously,
        Self::AuthWithCustomToken,
        Self::AuthWithPassword,
        Self::AuthWithOAuthPopup,
        Self::AuthWithOAuthRedirect,
        Self::AuthWithOAuthToken,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::OnAuth => "onAuth",
            Self::OffAuth => "offAuth",
            Self::AuthAnonymously => "authAnonymously",
            Self::AuthWithCustomToken => "authWithCustomToken",
            Self::AuthWithPassword => "authWithPassword",
            Self::AuthWithOAuthPopup => "authWithOAuthPopup",
            Self::AuthWithOAuthRedirect => "authWithOAuthRedirect",
            Self::AuthWithOAuthToken => "authWithOAuthToken",
        }
    }

    /// Position of the callback in the argument list.
    pub const fn continuation_index(&self) -> usize {
        match self {
            Self::OnAuth | Self::OffAuth | Self::AuthAnonymously => 0,
            Self::AuthWithOAuthToken => 2,
            Self::AuthWithCustomToken
            | Self::AuthWithPassword
            | Self::AuthWithOAuthPopup
            | Self::AuthWithOAuthRedirect => 1,
        }
    }

    /// Total number of positional arguments, callback and options included.
    pub const fn arity(&self) -> usize {
        match self {
            Self::OnAuth | Self::OffAuth => 1,
            Self::AuthAnonymously => 2,
            Self::AuthWithCustomToken
            | Self::AuthWithPassword
            | Self::AuthWithOAuthPopup
            | Self::AuthWithOAuthRedirect => 3,
            Self::AuthWithOAuthToken => 4,
        }
    }
}

impl fmt::Display for SdkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One positional argument of an SDK call
pub enum SdkArg {
    Value(Value),
    Continuation(Continuation),
    Listener(StateListener),
}

impl SdkArg {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_callback(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    /// Take the continuation out, leaving a `Value::Null` in its slot.
    pub fn take_continuation(&mut self) -> Option<Continuation> {
        match std::mem::replace(self, SdkArg::Value(Value::Null)) {
            Self::Continuation(c) => Some(c),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn listener(&self) -> Option<&StateListener> {
        match self {
            Self::Listener(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Debug for SdkArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Continuation(_) => f.write_str("Continuation(..)"),
            Self::Listener(_) => f.write_str("Listener(..)"),
        }
    }
}

/// A handle to the backend SDK (a database reference).
///
/// `invoke` receives arguments laid out exactly as the SDK method expects them.
pub trait FirebaseSdk: Send + Sync {
    fn invoke(&self, method: SdkMethod, args: Vec<SdkArg>);

    /// Current auth state, synchronously.
    fn get_auth(&self) -> Option<RawAuthState>;

    fn unauth(&self);
}

impl<T: FirebaseSdk + ?Sized> FirebaseSdk for Arc<T> {
    fn invoke(&self, method: SdkMethod, args: Vec<SdkArg>) {
        (**self).invoke(method, args)
    }

    fn get_auth(&self) -> Option<RawAuthState> {
        (**self).get_auth()
    }

    fn unauth(&self) {
        (**self).unauth()
    }
}
