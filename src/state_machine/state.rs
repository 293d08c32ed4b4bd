//! Session state types

use super::place_cache::PlaceCache;
use super::radius::DEFAULT_RADIUS_M;
use crate::geo::Coordinates;
use crate::places::{SearchMode, SearchQuery};

/// Conversation state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Waiting for a location
    #[default]
    Idle,

    /// Location stored, waiting for a radius
    AwaitingRadius,

    /// Radius stored, waiting for a category or the custom query button
    AwaitingFacilityType,

    /// Waiting for free-text query input
    AwaitingCustomQuery,

    /// A search was started; pagination and directions are available
    DisplayingResults { query: SearchQuery },
}

impl ConvState {
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingRadius => "awaiting_radius",
            ConvState::AwaitingFacilityType => "awaiting_facility_type",
            ConvState::AwaitingCustomQuery => "awaiting_custom_query",
            ConvState::DisplayingResults { .. } => "displaying_results",
        }
    }

    /// The active search, only present while displaying results
    pub fn search_query(&self) -> Option<&SearchQuery> {
        match self {
            ConvState::DisplayingResults { query } => Some(query),
            _ => None,
        }
    }
}

/// Everything remembered about one user's conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub location: Option<Coordinates>,
    /// Always positive and finite
    pub radius_m: f64,
    pub state: ConvState,
    /// Token for the next page of the current search
    pub continuation_token: Option<String>,
    pub place_cache: PlaceCache,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            location: None,
            radius_m: DEFAULT_RADIUS_M,
            state: ConvState::Idle,
            continuation_token: None,
            place_cache: PlaceCache::default(),
        }
    }
}

impl Session {
    pub fn search_mode(&self) -> Option<SearchMode> {
        self.state.search_query().map(SearchQuery::mode)
    }

    pub fn search_param(&self) -> Option<&str> {
        self.state.search_query().map(SearchQuery::param)
    }

    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    /// A blank session. Only the short id sequence carries over, so buttons
    /// rendered before the reset stay unresolvable.
    #[must_use]
    pub fn reset(&self) -> Session {
        Session {
            place_cache: self.place_cache.emptied(),
            ..Session::default()
        }
    }
}
