//! Renderer that talks to users through the Bot API

use super::client::TelegramClient;
use super::format::{directions_text, notice_text, place_caption, MORE_RESULTS_TEXT};
use super::keyboard;
use crate::runtime::{ChatId, PlaceCard, Renderer};
use crate::state_machine::Notice;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends output through the Bot API to the chat an update came from
pub struct TelegramRenderer {
    client: Arc<TelegramClient>,
}

impl TelegramRenderer {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }

    async fn send_card(&self, chat_id: i64, card: &PlaceCard) -> Result<(), String> {
        let caption = place_caption(card);
        let markup = card.directions_id.as_ref().map(keyboard::directions_button);

        if let Some(photo_url) = &card.photo_url {
            match self
                .client
                .send_photo(chat_id, photo_url, &caption, markup.as_ref())
                .await
            {
                Ok(()) => return Ok(()),
                // Telegram could not fetch the photo
                Err(e) => tracing::warn!(error = %e, "Photo send failed, sending text"),
            }
        }

        self.client
            .send_message(chat_id, &caption, markup.as_ref())
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Renderer for TelegramRenderer {
    async fn notify(&self, chat: ChatId, notice: &Notice) -> Result<(), String> {
        let markup = notice.prompt().map(keyboard::for_prompt);
        self.client
            .send_message(chat.0, &notice_text(notice), markup.as_ref())
            .await
            .map_err(|e| e.to_string())
    }

    async fn show_places(
        &self,
        chat: ChatId,
        places: &[PlaceCard],
        has_more: bool,
    ) -> Result<(), String> {
        let mut failures = 0usize;
        for card in places {
            if let Err(e) = self.send_card(chat.0, card).await {
                tracing::warn!(chat_id = %chat, error = %e, "Failed to send place");
                failures += 1;
            }
        }

        if has_more {
            self.client
                .send_message(
                    chat.0,
                    MORE_RESULTS_TEXT,
                    Some(&keyboard::more_results_button()),
                )
                .await
                .map_err(|e| e.to_string())?;
        }

        if failures > 0 {
            return Err(format!("{failures} of {} places not delivered", places.len()));
        }
        Ok(())
    }

    async fn show_directions(
        &self,
        chat: ChatId,
        place_name: &str,
        url: &str,
    ) -> Result<(), String> {
        self.client
            .send_message(chat.0, &directions_text(place_name, url), None)
            .await
            .map_err(|e| e.to_string())
    }
}
