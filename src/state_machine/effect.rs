//! Effects produced by state transitions

use super::event::PageKind;
use super::place_cache::ShortId;
use crate::geo::{format_distance, Coordinates};
use crate::places::{SearchQuery, SearchRequest};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Tell the user something
    Notify(Notice),

    /// Call the places service; the outcome comes back as an event
    RunSearch {
        request: SearchRequest,
        page: PageKind,
    },

    /// Render a page of filtered places
    ShowResults {
        listings: Vec<PlaceListing>,
        has_more: bool,
    },

    /// Send a directions link
    ShowDirections { place_name: String, url: String },
}

impl Effect {
    pub fn notify(notice: Notice) -> Self {
        Effect::Notify(notice)
    }
}

/// One place as handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceListing {
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: u32,
    pub review_snippet: Option<String>,
    pub distance_m: f64,
    /// Photo resource name, turned into a URL by the runtime
    pub photo_name: Option<String>,
    /// Present when the place can be resolved for directions
    pub directions_id: Option<ShortId>,
}

impl PlaceListing {
    pub fn distance_text(&self) -> String {
        format_distance(self.distance_m)
    }
}

/// Templated messages
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Welcome,
    Cleared,
    Stopped,
    LocationReceived { location: Coordinates },
    InvalidRadius { fallback_m: f64 },
    RadiusSet { radius_m: f64 },
    Searching { query: SearchQuery },
    CustomQueryPrompt,
    FetchingMore,
    /// The previous request is still running and more input is queued
    Busy,
    NoPlacesFound,
    NoMoreResults,
    UpstreamError { status: u16, body: String },
    NetworkError { details: String },
    NotUnderstood,
    InvalidCategory,
    EmptyQuery,
    MissingLocation,
    MissingSearchContext,
    MissingPlaceRef,
}

/// Input the user is asked for next; the renderer picks a keyboard for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    ShareLocation,
    ChooseRadius,
    ChooseFacility,
    TypeQuery,
}

impl Notice {
    pub fn prompt(&self) -> Option<Prompt> {
        match self {
            Notice::Welcome
            | Notice::Cleared
            | Notice::Stopped
            | Notice::MissingLocation
            | Notice::MissingSearchContext => Some(Prompt::ShareLocation),
            Notice::LocationReceived { .. } => Some(Prompt::ChooseRadius),
            Notice::RadiusSet { .. } => Some(Prompt::ChooseFacility),
            Notice::CustomQueryPrompt => Some(Prompt::TypeQuery),
            _ => None,
        }
    }

    /// Whether this notice reports a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::InvalidRadius { .. }
                | Notice::UpstreamError { .. }
                | Notice::NetworkError { .. }
                | Notice::NotUnderstood
                | Notice::InvalidCategory
                | Notice::EmptyQuery
                | Notice::MissingLocation
                | Notice::MissingSearchContext
                | Notice::MissingPlaceRef
        )
    }
}
