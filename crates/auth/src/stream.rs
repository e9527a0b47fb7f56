use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AuthError;
use crate::types::NormalizedAuthState;

/// One delivery on the auth state stream: the normalized state (`None` when
/// logged out), or the reason the backend's state could not be normalized.
pub type AuthStateEvent = Result<Option<NormalizedAuthState>, AuthError>;

/// A subscriber's view of the auth state, in backend notification order.
///
/// Yields the current state first, then every change. Dropping the stream
/// unsubscribes it.
pub struct AuthStateStream {
    id: Uuid,
    rx: mpsc::UnboundedReceiver<AuthStateEvent>,
}

impl AuthStateStream {
    pub(crate) fn new(id: Uuid, rx: mpsc::UnboundedReceiver<AuthStateEvent>) -> Self {
        Self { id, rx }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next delivered event without waiting, if one is queued.
    pub fn try_next_state(&mut self) -> Option<AuthStateEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain every event queued so far.
    pub fn drain(&mut self) -> Vec<AuthStateEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_next_state() {
            events.push(event);
        }
        events
    }
}

impl Stream for AuthStateStream {
    type Item = AuthStateEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
