//! Trait abstractions for runtime output
//!
//! These traits enable testing the runtime with mock implementations.

use super::ChatId;
use crate::state_machine::{Notice, ShortId};
use async_trait::async_trait;
use std::sync::Arc;

/// One rendered place, ready for a transport to format
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCard {
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: u32,
    pub review_snippet: Option<String>,
    pub distance_text: String,
    pub photo_url: Option<String>,
    pub directions_id: Option<ShortId>,
}

/// Presents bot output in a chat
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Send a templated notice, with the keyboard for `notice.prompt()` if any
    async fn notify(&self, chat: ChatId, notice: &Notice) -> Result<(), String>;

    /// Send one page of places; `has_more` offers the "more results" button
    async fn show_places(
        &self,
        chat: ChatId,
        places: &[PlaceCard],
        has_more: bool,
    ) -> Result<(), String>;

    /// Send a directions link for a place
    async fn show_directions(&self, chat: ChatId, place_name: &str, url: &str)
        -> Result<(), String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Renderer + ?Sized> Renderer for Arc<T> {
    async fn notify(&self, chat: ChatId, notice: &Notice) -> Result<(), String> {
        (**self).notify(chat, notice).await
    }

    async fn show_places(
        &self,
        chat: ChatId,
        places: &[PlaceCard],
        has_more: bool,
    ) -> Result<(), String> {
        (**self).show_places(chat, places, has_more).await
    }

    async fn show_directions(
        &self,
        chat: ChatId,
        place_name: &str,
        url: &str,
    ) -> Result<(), String> {
        (**self).show_directions(chat, place_name, url).await
    }
}
