//! Message texts, in Telegram's legacy Markdown

use crate::places::SearchQuery;
use crate::runtime::PlaceCard;
use crate::state_machine::Notice;

pub const MORE_RESULTS_TEXT: &str = "Load more results:";

/// Review excerpts are cut to keep captions under the 1024 character limit
const MAX_SNIPPET_CHARS: usize = 300;

/// Escape characters that open a legacy Markdown entity
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[allow(clippy::cast_possible_truncation)]
fn whole_meters(meters: f64) -> i64 {
    meters as i64
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Welcome => {
            "Welcome! Please share your *current location* to find nearby places:".to_string()
        }
        Notice::Cleared => "🗑️ *Chat data cleared and conversation reset.*\n\n\
             Please send your *current location* to find nearby places:"
            .to_string(),
        Notice::Stopped => "🛑 Stopped. You can start again by sending your location:".to_string(),
        Notice::LocationReceived { location } => format!(
            "Location received: `{}, {}`\n\n\
             Please choose a *search radius* or type a custom one (in meters):",
            location.latitude, location.longitude
        ),
        Notice::InvalidRadius { fallback_m } => format!(
            "❗ Invalid radius. Please enter a number (in meters) or choose from the buttons. \
             Using default radius of `{}m` for now.",
            whole_meters(*fallback_m)
        ),
        Notice::RadiusSet { radius_m } => format!(
            "Search radius set to `{}m`.\n\n\
             *Choose a facility type or press '✍️ Custom Query' for specific places:*",
            whole_meters(*radius_m)
        ),
        Notice::Searching { query } => match query {
            SearchQuery::Category(category) => {
                format!("🔎 Searching for nearby *{}*...", category.label())
            }
            SearchQuery::FreeText(text) => {
                format!("🔎 Searching for *'{}'*...", escape_markdown(text))
            }
        },
        Notice::CustomQueryPrompt => "📝 Please *type your custom search query* now \
             (e.g., `Biedronka`, `sushi restaurant`, `best barbers`):"
            .to_string(),
        Notice::FetchingMore => "Fetching more results...".to_string(),
        Notice::Busy => "⏳ Still working on your previous request, please wait a moment."
            .to_string(),
        Notice::NoPlacesFound => {
            "No nearby places found 😞. Try a different radius or facility type/query.".to_string()
        }
        Notice::NoMoreResults => "No more results found 😞.".to_string(),
        Notice::UpstreamError { status, body } => format!(
            "❌ Error from Google Places API: {status} - {}",
            escape_markdown(body)
        ),
        Notice::NetworkError { details } => format!(
            "❌ Network error: Could not connect to Google Places API. Details: {}",
            escape_markdown(details)
        ),
        Notice::NotUnderstood => "I'm not sure what you mean. Please use the provided buttons \
             or type /start to begin."
            .to_string(),
        Notice::InvalidCategory => "❗ Invalid choice. Please select a category button or use \
             the '✍️ Custom Query' button to search for specific places."
            .to_string(),
        Notice::EmptyQuery => "❗ Please enter a non-empty search query.".to_string(),
        Notice::MissingLocation => "❗ Please share your location first using /start.".to_string(),
        Notice::MissingSearchContext => {
            "❗ Cannot fetch more results. Please start a new search by sharing your location."
                .to_string()
        }
        Notice::MissingPlaceRef => "❗ Sorry, I couldn't find the details for directions. \
             Please try searching again."
            .to_string(),
    }
}

/// Caption for one place, sent with its photo or as a plain message
pub fn place_caption(card: &PlaceCard) -> String {
    let mut lines = vec![format!("• *{}*", escape_markdown(&card.name))];

    let mut rating = card
        .rating
        .map_or_else(|| "N/A".to_string(), |r| format!("{r:.1}"));
    if card.rating_count > 0 {
        rating.push_str(&format!(" ({} reviews)", card.rating_count));
    }
    lines.push(format!("⭐ {rating}"));

    if let Some(snippet) = &card.review_snippet {
        let mut excerpt: String = snippet.chars().take(MAX_SNIPPET_CHARS).collect();
        if excerpt.len() < snippet.len() {
            excerpt.push('…');
        }
        lines.push(format!("💬 \"{}\"", escape_markdown(&excerpt)));
    }

    let address = card.address.as_deref().unwrap_or("Address not available");
    lines.push(format!("📍 {}", escape_markdown(address)));
    lines.push(format!("📏 ~{} away", card.distance_text));
    lines.join("\n")
}

pub fn directions_text(place_name: &str, url: &str) -> String {
    format!(
        "Directions to *{}*: [Google Maps Directions]({url})",
        escape_markdown(place_name)
    )
}
