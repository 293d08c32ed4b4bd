//! Per-user session runtime

use super::traits::{PlaceCard, Renderer};
use super::{ChatId, Inbound, UserId};
use crate::places::{PhotoUrlBuilder, PlacesGateway};
use crate::state_machine::{transition, Effect, Event, PlaceListing, Session};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Owns one user's session and executes the effects of its transitions.
///
/// Events arrive through a channel and are handled one at a time, so a
/// user's events are serialized while other users' runtimes proceed.
pub struct SessionRuntime<G, R>
where
    G: PlacesGateway + 'static,
    R: Renderer + 'static,
{
    user: UserId,
    session: Session,
    gateway: Arc<G>,
    renderer: Arc<R>,
    photos: Arc<PhotoUrlBuilder>,
    event_rx: mpsc::Receiver<Inbound>,
}

impl<G, R> SessionRuntime<G, R>
where
    G: PlacesGateway + 'static,
    R: Renderer + 'static,
{
    pub fn new(
        user: UserId,
        gateway: Arc<G>,
        renderer: Arc<R>,
        photos: Arc<PhotoUrlBuilder>,
        event_rx: mpsc::Receiver<Inbound>,
    ) -> Self {
        Self {
            user,
            session: Session::default(),
            gateway,
            renderer,
            photos,
            event_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(user_id = %self.user, "Starting session runtime");

        while let Some(Inbound { chat, event }) = self.event_rx.recv().await {
            self.process_event(chat, event).await;
        }

        tracing::debug!(user_id = %self.user, "Session runtime stopped");
    }

    /// Handle one inbound event; output goes to `chat`
    async fn process_event(&mut self, chat: ChatId, event: Event) {
        // Search effects feed their outcome back in as a new event
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let is_search_outcome = current_event.is_search_outcome();

            let result = match transition(&self.session, current_event) {
                Ok(r) => r,
                Err(e) => {
                    if is_search_outcome {
                        tracing::warn!(user_id = %self.user, error = %e, "Dropped search outcome");
                    } else {
                        tracing::debug!(
                            user_id = %self.user,
                            state = self.session.state.name(),
                            error = %e,
                            "Rejected event"
                        );
                    }
                    if let Some(notice) = e.notice() {
                        self.render_result(self.renderer.notify(chat, &notice).await);
                    }
                    continue;
                }
            };

            let old_state = self.session.state.name();
            self.session = result.session;
            tracing::debug!(
                user_id = %self.user,
                from = old_state,
                to = self.session.state.name(),
                mode = ?self.session.search_mode(),
                param = self.session.search_param(),
                effects = result.effects.len(),
                "Transition"
            );

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(chat, effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }
    }

    async fn execute_effect(&self, chat: ChatId, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Notify(notice) => {
                if notice.is_error() {
                    tracing::debug!(user_id = %self.user, notice = ?notice, "Reporting error");
                }
                self.render_result(self.renderer.notify(chat, &notice).await);
                None
            }

            Effect::RunSearch { request, page } => {
                let event = match self.gateway.search(&request).await {
                    Ok(result) => Event::SearchCompleted { page, result },
                    Err(e) => Event::SearchFailed {
                        error_kind: e.kind,
                        message: e.message,
                    },
                };
                Some(event)
            }

            Effect::ShowResults { listings, has_more } => {
                let cards: Vec<PlaceCard> = listings
                    .into_iter()
                    .map(|listing| self.to_card(listing))
                    .collect();
                self.render_result(self.renderer.show_places(chat, &cards, has_more).await);
                None
            }

            Effect::ShowDirections { place_name, url } => {
                self.render_result(
                    self.renderer
                        .show_directions(chat, &place_name, &url)
                        .await,
                );
                None
            }
        }
    }

    fn to_card(&self, listing: PlaceListing) -> PlaceCard {
        let distance_text = listing.distance_text();
        let photo_url = listing.photo_name.as_deref().map(|name| self.photos.url(name));
        PlaceCard {
            name: listing.name,
            address: listing.address,
            rating: listing.rating,
            rating_count: listing.rating_count,
            review_snippet: listing.review_snippet,
            distance_text,
            photo_url,
            directions_id: listing.directions_id,
        }
    }

    fn render_result(&self, result: Result<(), String>) {
        if let Err(e) = result {
            tracing::warn!(user_id = %self.user, error = %e, "Failed to render output");
        }
    }
}
