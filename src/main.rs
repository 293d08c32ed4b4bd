//! Nearby Places Bot
//!
//! A Telegram bot that finds places around a shared location, driven by a
//! per-user conversation state machine.

mod config;
mod facility;
mod geo;
mod places;
mod runtime;
mod state_machine;
mod telegram;

use config::BotConfig;
use places::{GooglePlacesService, LoggingGateway, PhotoUrlBuilder};
use runtime::SessionManager;
use std::sync::Arc;
use telegram::{TelegramClient, TelegramRenderer};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nearby_places_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = BotConfig::from_env()?;
    tracing::info!(
        places_url = %config.places.base_url,
        telegram_url = %config.telegram.api_url,
        search_timeout_secs = config.places.timeout.as_secs(),
        "Configuration loaded"
    );

    // Places search
    let google = GooglePlacesService::new(
        config.places.api_key.clone(),
        &config.places.base_url,
        config.places.timeout,
    )?;
    let gateway = Arc::new(LoggingGateway::new(Arc::new(google)));
    let photos = PhotoUrlBuilder::new(&config.places.base_url, config.places.api_key.clone());

    // Telegram transport
    let client = Arc::new(TelegramClient::new(
        &config.telegram.token,
        &config.telegram.api_url,
        config.telegram.poll_timeout,
    )?);
    let renderer = Arc::new(TelegramRenderer::new(client.clone()));

    let manager = SessionManager::new(gateway, renderer, photos);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        tracing::info!("Shutdown requested");
        shutdown.cancel();
    });

    tracing::info!("Bot started");
    telegram::run_polling(&client, &manager, cancel).await;
    tracing::info!(sessions = manager.active_sessions().await, "Bot stopped");

    Ok(())
}
