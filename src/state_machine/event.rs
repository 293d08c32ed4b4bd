//! Events that can occur in a session

use super::place_cache::ShortId;
use crate::geo::Coordinates;
use crate::places::{PlacesErrorKind, SearchPage};

/// Label of the keyboard button that resets the conversation
pub const STOP_BACK_LABEL: &str = "🔙 Stop / Back";
pub const START_COMMAND: &str = "/start";
pub const CLEAR_COMMAND: &str = "/clear";

const MORE_RESULTS_DATA: &str = "more_results";
const DIRECTIONS_PREFIX: &str = "get_directions_";

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Resets, accepted in every state
    Start,
    Clear,
    Reset,

    // User events
    LocationShared {
        location: Coordinates,
    },
    Text {
        text: String,
    },
    MoreResults,
    Directions {
        short_id: ShortId,
    },

    // Search outcomes
    SearchCompleted {
        page: PageKind,
        result: SearchPage,
    },
    SearchFailed {
        error_kind: PlacesErrorKind,
        message: String,
    },
}

impl Event {
    /// Decode a text message. Commands and the stop/back label become their
    /// own events; everything else is left for the current state to interpret.
    pub fn from_text(text: &str) -> Self {
        if text == STOP_BACK_LABEL {
            return Event::Reset;
        }

        // "/clear@my_bot extra" is still /clear
        let command = text
            .split_whitespace()
            .next()
            .map(|word| word.split('@').next().unwrap_or(word));
        match command {
            Some(START_COMMAND) => Event::Start,
            Some(CLEAR_COMMAND) => Event::Clear,
            _ => Event::Text {
                text: text.to_string(),
            },
        }
    }

    /// Whether this event originates from the search runtime
    pub fn is_search_outcome(&self) -> bool {
        matches!(
            self,
            Event::SearchCompleted { .. } | Event::SearchFailed { .. }
        )
    }
}

/// Payload of an inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    MoreResults,
    Directions(ShortId),
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::MoreResults => MORE_RESULTS_DATA.to_string(),
            CallbackAction::Directions(id) => format!("{DIRECTIONS_PREFIX}{id}"),
        }
    }

    pub fn decode(data: &str) -> Option<Self> {
        if data == MORE_RESULTS_DATA {
            return Some(CallbackAction::MoreResults);
        }
        data.strip_prefix(DIRECTIONS_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| CallbackAction::Directions(ShortId::from(id)))
    }
}

impl From<CallbackAction> for Event {
    fn from(action: CallbackAction) -> Self {
        match action {
            CallbackAction::MoreResults => Event::MoreResults,
            CallbackAction::Directions(short_id) => Event::Directions { short_id },
        }
    }
}

/// Whether a search page starts a new result list or extends the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    First,
    Continuation,
}
