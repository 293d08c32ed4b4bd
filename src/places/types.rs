//! Common types for places searches

use crate::facility::Category;
use crate::geo::Coordinates;

/// Maximum number of places requested per page
pub const PAGE_SIZE: u32 = 10;

/// How the search radius is applied upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Radius is a hard restriction
    CategorySearch,
    /// Radius is only a bias; results may fall outside it
    FreeTextSearch,
}

/// The mode/param pair of a search. Holding both in one value keeps them
/// from ever being set independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Category(Category),
    FreeText(String),
}

impl SearchQuery {
    pub fn mode(&self) -> SearchMode {
        match self {
            SearchQuery::Category(_) => SearchMode::CategorySearch,
            SearchQuery::FreeText(_) => SearchMode::FreeTextSearch,
        }
    }

    /// Category code or free-text query
    pub fn param(&self) -> &str {
        match self {
            SearchQuery::Category(category) => category.code(),
            SearchQuery::FreeText(text) => text,
        }
    }
}

/// One page request against the places service
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: Coordinates,
    pub radius_m: f64,
    pub query: SearchQuery,
    pub page_token: Option<String>,
}

impl SearchRequest {
    pub fn first_page(origin: Coordinates, radius_m: f64, query: SearchQuery) -> Self {
        Self {
            origin,
            radius_m,
            query,
            page_token: None,
        }
    }

    pub fn next_page(
        origin: Coordinates,
        radius_m: f64,
        query: SearchQuery,
        page_token: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            radius_m,
            query,
            page_token: Some(page_token.into()),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.query.mode()
    }
}

/// A place as returned by the search service, normalized
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Place {
    /// External place identifier
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: u32,
    /// Text of the first review
    pub review_snippet: Option<String>,
    pub location: Option<Coordinates>,
    /// Resource name of the first photo
    pub photo_name: Option<String>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    pub places: Vec<Place>,
    pub next_page_token: Option<String>,
}

impl SearchPage {
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}
