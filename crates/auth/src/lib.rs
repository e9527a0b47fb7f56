//! Reactive Firebase auth binding for Rust
//!
//! This crate wraps the backend SDK's callback-based auth API behind a uniform
//! contract: `login` returns a future, `logout` is fire-and-forget, and the
//! current auth state is pushed to every subscriber as a stream.
//!
//! ```no_run
//! use fireauth_rust_auth::{AuthController, AuthMethod, AuthProvider, LoginOptions};
//! # fn sdk() -> std::sync::Arc<dyn fireauth_rust_auth::FirebaseSdk> { unimplemented!() }
//!
//! # async fn run() -> Result<(), fireauth_rust_auth::AuthError> {
//! let auth = AuthController::from_sdk(
//!     sdk(),
//!     Some(LoginOptions::new(AuthMethod::Popup).provider(AuthProvider::Google)),
//! );
//! let mut states = auth.subscribe();
//! let state = auth.login(None, None).await?;
//! println!("logged in as {}", state.uid);
//! # let _ = states.try_next_state();
//! # Ok(())
//! # }
//! ```

mod backend;
mod controller;
mod error;
mod sdk;
mod stream;
mod types;

pub use backend::{AuthBackend, BackendCall, ListenerHandle, SdkAuthBackend};
pub use controller::{resolve_call, AuthController, LoginFuture};
pub use error::{AuthError, BackendError};
pub use sdk::{Continuation, FirebaseSdk, SdkArg, SdkMethod, StateListener};
pub use stream::{AuthStateEvent, AuthStateStream};
pub use types::{
    normalize_state, AuthMethod, AuthProvider, Credentials, LoginOptions, NormalizedAuthState,
    RawAuthState, Remember,
};
