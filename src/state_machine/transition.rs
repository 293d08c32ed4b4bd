//! Pure state transition function
//!
//! Given the same session and event, `transition` always produces the same
//! next session and effects. Search calls and rendering happen in the runtime
//! that executes the effects.

use super::effect::{Effect, Notice, PlaceListing};
use super::event::{Event, PageKind};
use super::place_cache::{PlaceCache, PlaceRef, ShortId};
use super::radius::{parse_radius, DEFAULT_RADIUS_M};
use super::state::{ConvState, Session};
use crate::facility::FacilityChoice;
use crate::places::{
    directions_url, filter_within_radius, NearbyPlace, PlacesErrorKind, SearchPage, SearchQuery,
    SearchRequest,
};
use thiserror::Error;

const UNNAMED_PLACE: &str = "Unnamed";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition. The session is left untouched.
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("Input not understood in the current state")]
    UnrecognizedInput,
    #[error("Unrecognized facility choice: {0}")]
    UnknownFacility(String),
    #[error("Custom query is empty")]
    EmptyQuery,
    #[error("No location has been shared")]
    MissingLocation,
    #[error("No search to continue")]
    MissingSearchContext,
    #[error("No cached place for id {0}")]
    MissingPlaceRef(ShortId),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl TransitionError {
    /// What to tell the user, if anything
    pub fn notice(&self) -> Option<Notice> {
        match self {
            TransitionError::UnrecognizedInput => Some(Notice::NotUnderstood),
            TransitionError::UnknownFacility(_) => Some(Notice::InvalidCategory),
            TransitionError::EmptyQuery => Some(Notice::EmptyQuery),
            TransitionError::MissingLocation => Some(Notice::MissingLocation),
            TransitionError::MissingSearchContext => Some(Notice::MissingSearchContext),
            TransitionError::MissingPlaceRef(_) => Some(Notice::MissingPlaceRef),
            TransitionError::InvalidTransition(_) => None,
        }
    }
}

/// Pure transition function
#[allow(clippy::too_many_lines)]
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    match (&session.state, event) {
        // ============================================================
        // Resets take priority over every state
        // ============================================================
        (_, Event::Start) => Ok(TransitionResult::new(session.reset())
            .with_effect(Effect::notify(Notice::Welcome))),

        (_, Event::Clear) => Ok(TransitionResult::new(session.reset())
            .with_effect(Effect::notify(Notice::Cleared))),

        (_, Event::Reset) => Ok(TransitionResult::new(session.reset())
            .with_effect(Effect::notify(Notice::Stopped))),

        // ============================================================
        // Location restarts the search cycle from any state
        // ============================================================
        (_, Event::LocationShared { location }) => {
            let next = Session {
                location: Some(location),
                state: ConvState::AwaitingRadius,
                ..session.clone()
            };
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify(Notice::LocationReceived { location })))
        }

        // ============================================================
        // Text input, interpreted per state
        // ============================================================
        (ConvState::AwaitingRadius, Event::Text { text }) => set_radius(session, &text),

        (ConvState::AwaitingFacilityType, Event::Text { text }) => {
            match FacilityChoice::from_label(&text) {
                Some(FacilityChoice::Category(category)) => {
                    start_search(session, SearchQuery::Category(category))
                }
                Some(FacilityChoice::CustomQuery) => {
                    let next = Session {
                        state: ConvState::AwaitingCustomQuery,
                        ..session.clone()
                    };
                    Ok(TransitionResult::new(next)
                        .with_effect(Effect::notify(Notice::CustomQueryPrompt)))
                }
                None => Err(TransitionError::UnknownFacility(text)),
            }
        }

        (ConvState::AwaitingCustomQuery, Event::Text { text }) => {
            let query = text.trim();
            if query.is_empty() {
                return Err(TransitionError::EmptyQuery);
            }
            start_search(session, SearchQuery::FreeText(query.to_string()))
        }

        (ConvState::Idle | ConvState::DisplayingResults { .. }, Event::Text { .. }) => {
            Err(TransitionError::UnrecognizedInput)
        }

        // ============================================================
        // Pagination
        // ============================================================
        (ConvState::DisplayingResults { query }, Event::MoreResults) => {
            let (Some(origin), Some(token)) = (session.location, &session.continuation_token)
            else {
                return Err(TransitionError::MissingSearchContext);
            };
            let request =
                SearchRequest::next_page(origin, session.radius_m, query.clone(), token.clone());
            Ok(TransitionResult::new(session.clone())
                .with_effect(Effect::notify(Notice::FetchingMore))
                .with_effect(Effect::RunSearch {
                    request,
                    page: PageKind::Continuation,
                }))
        }

        (_, Event::MoreResults) => Err(TransitionError::MissingSearchContext),

        // ============================================================
        // Directions
        // ============================================================
        (_, Event::Directions { short_id }) => {
            let Some(place) = session.place_cache.resolve(&short_id) else {
                return Err(TransitionError::MissingPlaceRef(short_id));
            };
            let origin = session.location.ok_or(TransitionError::MissingLocation)?;
            let url = directions_url(&origin, &place.location, &place.place_id);
            Ok(
                TransitionResult::new(session.clone()).with_effect(Effect::ShowDirections {
                    place_name: place.name.clone(),
                    url,
                }),
            )
        }

        // ============================================================
        // Search outcomes
        // ============================================================
        (ConvState::DisplayingResults { .. }, Event::SearchCompleted { page, result }) => {
            search_completed(session, page, result)
        }

        (ConvState::DisplayingResults { .. }, Event::SearchFailed { error_kind, message }) => {
            let notice = match error_kind {
                PlacesErrorKind::UpstreamHttp { status } => Notice::UpstreamError {
                    status,
                    body: message,
                },
                PlacesErrorKind::Network | PlacesErrorKind::InvalidResponse => {
                    Notice::NetworkError { details: message }
                }
            };
            Ok(TransitionResult::new(session.clone()).with_effect(Effect::notify(notice)))
        }

        (state, event @ (Event::SearchCompleted { .. } | Event::SearchFailed { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "search outcome {event:?} in state {}",
                state.name()
            )))
        }
    }
}

/// Store the radius (or the default on bad input) and ask for a facility
fn set_radius(session: &Session, text: &str) -> Result<TransitionResult, TransitionError> {
    if session.location.is_none() {
        return Err(TransitionError::MissingLocation);
    }

    let mut effects = Vec::new();
    let radius_m = parse_radius(text).unwrap_or_else(|_| {
        effects.push(Effect::notify(Notice::InvalidRadius {
            fallback_m: DEFAULT_RADIUS_M,
        }));
        DEFAULT_RADIUS_M
    });
    effects.push(Effect::notify(Notice::RadiusSet { radius_m }));

    let next = Session {
        radius_m,
        state: ConvState::AwaitingFacilityType,
        continuation_token: None,
        place_cache: session.place_cache.emptied(),
        ..session.clone()
    };
    Ok(TransitionResult::new(next).with_effects(effects))
}

/// Enter `DisplayingResults` for a brand new search
fn start_search(session: &Session, query: SearchQuery) -> Result<TransitionResult, TransitionError> {
    let origin = session.location.ok_or(TransitionError::MissingLocation)?;
    let request = SearchRequest::first_page(origin, session.radius_m, query.clone());

    let next = Session {
        state: ConvState::DisplayingResults {
            query: query.clone(),
        },
        continuation_token: None,
        place_cache: session.place_cache.emptied(),
        ..session.clone()
    };
    Ok(TransitionResult::new(next)
        .with_effect(Effect::notify(Notice::Searching { query }))
        .with_effect(Effect::RunSearch {
            request,
            page: PageKind::First,
        }))
}

/// Filter a page, record its token and cache what gets rendered
fn search_completed(
    session: &Session,
    page: PageKind,
    result: SearchPage,
) -> Result<TransitionResult, TransitionError> {
    let origin = session.location.ok_or(TransitionError::MissingLocation)?;
    let nearby = filter_within_radius(&origin, session.radius_m, result.places);

    let mut next = session.clone();
    if page == PageKind::First {
        next.place_cache.clear();
    }
    next.continuation_token = result.next_page_token;
    let has_more = next.has_more();

    let listings: Vec<PlaceListing> = nearby
        .into_iter()
        .map(|place| to_listing(&mut next.place_cache, place))
        .collect();

    let mut out = TransitionResult::new(next);
    if listings.is_empty() {
        let notice = match page {
            PageKind::First => Notice::NoPlacesFound,
            PageKind::Continuation => Notice::NoMoreResults,
        };
        out = out.with_effect(Effect::notify(notice));
        if has_more {
            // Everything on this page was out of range but the search goes on
            out = out.with_effect(Effect::ShowResults {
                listings,
                has_more,
            });
        }
        return Ok(out);
    }

    Ok(out.with_effect(Effect::ShowResults { listings, has_more }))
}

fn to_listing(cache: &mut PlaceCache, nearby: NearbyPlace) -> PlaceListing {
    let NearbyPlace {
        place,
        location,
        distance_m,
    } = nearby;
    let name = place.name.unwrap_or_else(|| UNNAMED_PLACE.to_string());

    let directions_id = place.id.map(|place_id| {
        cache.insert(PlaceRef {
            place_id,
            name: name.clone(),
            location,
        })
    });

    PlaceListing {
        name,
        address: place.address,
        rating: place.rating,
        rating_count: place.rating_count,
        review_snippet: place.review_snippet,
        distance_m,
        photo_name: place.photo_name,
        directions_id,
    }
}
