//! Telegram Bot API transport
//!
//! Long-polls `getUpdates`, decodes each update into a session event, and
//! renders session output back as messages, photos and keyboards.

mod client;
mod format;
mod keyboard;
mod renderer;
mod types;

pub use client::{TelegramClient, DEFAULT_API_URL};
pub use renderer::TelegramRenderer;

use crate::places::PlacesGateway;
use crate::runtime::{Renderer, SessionManager};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Pause after a failed poll before trying again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Telegram API error {status}: {description}")]
    Api { status: u16, description: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs embed the bot token
        TelegramError::Http(e.without_url())
    }
}

/// Poll for updates and route them to user sessions until `cancel` fires
pub async fn run_polling<G, R>(
    client: &TelegramClient,
    manager: &SessionManager<G, R>,
    cancel: CancellationToken,
) where
    G: PlacesGateway + 'static,
    R: Renderer + 'static,
{
    let mut offset: i64 = 0;
    tracing::info!("Polling for updates");

    loop {
        let polled = tokio::select! {
            biased;

            () = cancel.cancelled() => break,
            result = client.get_updates(offset) => result,
        };

        let updates = match polled {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "Polling failed");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(POLL_RETRY_DELAY) => continue,
                }
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let update_id = update.update_id;

            let Some(incoming) = update.into_incoming() else {
                tracing::debug!(update_id, "Ignoring unsupported update");
                continue;
            };

            if let Some(callback_id) = &incoming.callback_id {
                if let Err(e) = client.answer_callback_query(callback_id).await {
                    tracing::warn!(error = %e, "Failed to answer callback query");
                }
            }

            let Some(event) = incoming.event else {
                tracing::debug!(user_id = %incoming.user, update_id, "Unrecognized callback data");
                continue;
            };

            if let Err(e) = manager.dispatch(incoming.user, incoming.chat, event).await {
                tracing::warn!(user_id = %incoming.user, error = %e, "Failed to dispatch event");
            }
        }
    }

    tracing::info!("Polling stopped");
}
