//! Runtime for executing user sessions
//!
//! Each user gets a lazily spawned `SessionRuntime` task that owns the
//! session. The manager only routes events to those tasks.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::places::{PhotoUrlBuilder, PlacesGateway};
use crate::state_machine::{Event, Notice};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// Capacity of each user's event queue
const EVENT_QUEUE_CAPACITY: usize = 32;

/// Chat user identifier, as assigned by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat that replies are sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event together with the chat it came from
#[derive(Debug)]
pub struct Inbound {
    pub chat: ChatId,
    pub event: Event,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("event queue for user {0} is full")]
    Busy(UserId),
    #[error("session runtime for user {0} is not running")]
    Closed(UserId),
}

/// Handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<Inbound>,
}

/// Manager for all session runtimes
pub struct SessionManager<G, R>
where
    G: PlacesGateway + 'static,
    R: Renderer + 'static,
{
    gateway: Arc<G>,
    renderer: Arc<R>,
    photos: Arc<PhotoUrlBuilder>,
    sessions: RwLock<HashMap<UserId, SessionHandle>>,
}

impl<G, R> SessionManager<G, R>
where
    G: PlacesGateway + 'static,
    R: Renderer + 'static,
{
    pub fn new(gateway: Arc<G>, renderer: Arc<R>, photos: PhotoUrlBuilder) -> Self {
        Self {
            gateway,
            renderer,
            photos: Arc::new(photos),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Queue an event for `user`, starting their runtime if needed.
    ///
    /// Never waits on the user's runtime: when its queue is full the event
    /// is dropped and the user is told to wait.
    pub async fn dispatch(
        &self,
        user: UserId,
        chat: ChatId,
        event: Event,
    ) -> Result<(), DispatchError> {
        let handle = self.get_or_create(user).await;
        match handle.event_tx.try_send(Inbound { chat, event }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                let renderer = self.renderer.clone();
                tokio::spawn(async move {
                    if let Err(e) = renderer.notify(chat, &Notice::Busy).await {
                        tracing::warn!(user_id = %user, error = %e, "Failed to send busy notice");
                    }
                });
                Err(DispatchError::Busy(user))
            }
            Err(TrySendError::Closed(_)) => {
                // The runtime is gone; forget it so the next event starts a fresh one
                tracing::warn!(user_id = %user, "Session runtime closed, dropping handle");
                self.sessions.write().await.remove(&user);
                Err(DispatchError::Closed(user))
            }
        }
    }

    /// Get or create the runtime for a user
    pub async fn get_or_create(&self, user: UserId) -> SessionHandle {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(&user) {
                return handle.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        // Another task may have created it between the two locks
        if let Some(handle) = sessions.get(&user) {
            return handle.clone();
        }

        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let runtime = SessionRuntime::new(
            user,
            self.gateway.clone(),
            self.renderer.clone(),
            self.photos.clone(),
            event_rx,
        );
        tokio::spawn(runtime.run());

        let handle = SessionHandle { event_tx };
        sessions.insert(user, handle.clone());
        tracing::info!(user_id = %user, active_sessions = sessions.len(), "Started session");
        handle
    }

    /// Number of users with a running session
    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
