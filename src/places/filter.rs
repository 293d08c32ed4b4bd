//! Distance re-check applied to every search page
//!
//! Free-text searches only bias toward the radius, so the true distance of
//! each result is recomputed and anything past the radius is dropped. The same
//! check runs for category searches too.

use super::Place;
use crate::geo::Coordinates;

/// Slack added to the radius to absorb geocoding and rounding noise
pub const RADIUS_TOLERANCE_M: f64 = 10.0;

/// A place that passed the distance check
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlace {
    pub place: Place,
    pub location: Coordinates,
    pub distance_m: f64,
}

/// Keep places within `radius_m + RADIUS_TOLERANCE_M` of `origin`, in input
/// order. Places without coordinates are dropped.
pub fn filter_within_radius(
    origin: &Coordinates,
    radius_m: f64,
    places: Vec<Place>,
) -> Vec<NearbyPlace> {
    let limit = radius_m + RADIUS_TOLERANCE_M;
    places
        .into_iter()
        .filter_map(|place| {
            let location = place.location?;
            let distance_m = origin.distance_m(&location);
            (distance_m <= limit).then_some(NearbyPlace {
                place,
                location,
                distance_m,
            })
        })
        .collect()
}
