//! URLs handed to the user: place photos and driving directions

use crate::geo::Coordinates;

pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 800;
pub const DEFAULT_PHOTO_MAX_HEIGHT: u32 = 600;

/// Builds media URLs for photo resource names
#[derive(Debug, Clone)]
pub struct PhotoUrlBuilder {
    base_url: String,
    api_key: String,
    max_width: u32,
    max_height: u32,
}

impl PhotoUrlBuilder {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_width: DEFAULT_PHOTO_MAX_WIDTH,
            max_height: DEFAULT_PHOTO_MAX_HEIGHT,
        }
    }

    /// `photo_name` is the resource name returned by the search, e.g.
    /// `places/ABC/photos/XYZ`
    pub fn url(&self, photo_name: &str) -> String {
        format!(
            "{}/v1/{}/media?key={}&maxWidthPx={}&maxHeightPx={}",
            self.base_url,
            photo_name.trim_start_matches('/'),
            self.api_key,
            self.max_width,
            self.max_height
        )
    }
}

/// Google Maps deep link for driving from `origin` to a place
pub fn directions_url(origin: &Coordinates, destination: &Coordinates, place_id: &str) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={origin}&destination={destination}&destination_place_id={place_id}&travelmode=driving"
    )
}
