//! Places search gateway
//!
//! Two search strategies share one interface: category search restricts
//! results to the radius, free-text search only biases toward it.

mod error;
mod filter;
mod google;
mod links;
mod types;

pub use error::{PlacesError, PlacesErrorKind};
pub use filter::{filter_within_radius, NearbyPlace};
pub use google::{GooglePlacesService, DEFAULT_BASE_URL};
pub use links::{directions_url, PhotoUrlBuilder};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for places search services
#[async_trait]
pub trait PlacesGateway: Send + Sync {
    /// Fetch one page of results for `request`
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, PlacesError>;
}

#[async_trait]
impl<T: PlacesGateway + ?Sized> PlacesGateway for Arc<T> {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, PlacesError> {
        (**self).search(request).await
    }
}

/// Logging wrapper for places gateways
pub struct LoggingGateway {
    inner: Arc<dyn PlacesGateway>,
}

impl LoggingGateway {
    pub fn new(inner: Arc<dyn PlacesGateway>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PlacesGateway for LoggingGateway {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, PlacesError> {
        let start = std::time::Instant::now();
        let result = self.inner.search(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(page) => {
                tracing::info!(
                    mode = ?request.mode(),
                    radius_m = request.radius_m,
                    continuation = request.page_token.is_some(),
                    duration_ms = %duration.as_millis(),
                    places = page.places.len(),
                    has_more = page.has_more(),
                    "Places search completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    mode = ?request.mode(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Places search failed"
                );
            }
        }

        result
    }
}
