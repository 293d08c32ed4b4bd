//! Google Places API (New) search implementation

use super::types::{Place, SearchPage, SearchQuery, SearchRequest, PAGE_SIZE};
use super::{PlacesError, PlacesGateway};
use crate::geo::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://places.googleapis.com";

/// Place fields requested by both endpoints
macro_rules! place_fields {
    () => {
        "places.displayName,\
places.formattedAddress,\
places.rating,\
places.userRatingCount,\
places.reviews,\
places.location,\
places.id,\
places.photos"
    };
}

/// `searchNearby` has no page token in its response message
const NEARBY_FIELD_MASK: &str = place_fields!();
const TEXT_FIELD_MASK: &str = concat!(place_fields!(), ",nextPageToken");

/// Google Places service
pub struct GooglePlacesService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesService {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlacesError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/places:{method}", self.base_url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        url: &str,
        field_mask: &str,
        body: &B,
    ) -> Result<SearchPage, PlacesError> {
        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", field_mask)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlacesError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    PlacesError::network(format!("Connection failed: {e}"))
                } else {
                    PlacesError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PlacesError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(PlacesError::upstream_http(status.as_u16(), body));
        }

        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            PlacesError::invalid_response(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Ok(parsed.into())
    }
}

#[async_trait]
impl PlacesGateway for GooglePlacesService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, PlacesError> {
        let area = LocationArea {
            circle: Circle {
                center: request.origin,
                radius: request.radius_m,
            },
        };
        let page_token = request.page_token.as_deref();

        match &request.query {
            SearchQuery::Category(category) => {
                let body = NearbySearchBody {
                    included_types: [category.code()],
                    max_result_count: PAGE_SIZE,
                    location_restriction: area,
                    page_token,
                };
                self.post(&self.endpoint("searchNearby"), NEARBY_FIELD_MASK, &body)
                    .await
            }
            SearchQuery::FreeText(text) => {
                let body = TextSearchBody {
                    text_query: text,
                    max_result_count: PAGE_SIZE,
                    location_bias: area,
                    page_token,
                };
                self.post(&self.endpoint("searchText"), TEXT_FIELD_MASK, &body)
                    .await
            }
        }
    }
}

// Google Places API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NearbySearchBody<'a> {
    included_types: [&'a str; 1],
    max_result_count: u32,
    location_restriction: LocationArea,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchBody<'a> {
    text_query: &'a str,
    max_result_count: u32,
    location_bias: LocationArea,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LocationArea {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: Coordinates,
    radius: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    places: Vec<GooglePlace>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePlace {
    id: Option<String>,
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_rating_count: Option<u32>,
    #[serde(default)]
    reviews: Vec<GoogleReview>,
    location: Option<Coordinates>,
    #[serde(default)]
    photos: Vec<GooglePhoto>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GoogleReview {
    text: Option<LocalizedText>,
}

#[derive(Debug, Deserialize)]
struct GooglePhoto {
    name: Option<String>,
}

impl From<GooglePlace> for Place {
    fn from(place: GooglePlace) -> Self {
        Place {
            id: place.id,
            name: place.display_name.map(|n| n.text),
            address: place.formatted_address,
            rating: place.rating,
            rating_count: place.user_rating_count.unwrap_or(0),
            review_snippet: place
                .reviews
                .into_iter()
                .next()
                .and_then(|r| r.text)
                .map(|t| t.text),
            location: place.location,
            photo_name: place.photos.into_iter().next().and_then(|p| p.name),
        }
    }
}

impl From<SearchResponse> for SearchPage {
    fn from(resp: SearchResponse) -> Self {
        SearchPage {
            places: resp.places.into_iter().map(Place::from).collect(),
            // An empty token means the same as no token
            next_page_token: resp.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}
