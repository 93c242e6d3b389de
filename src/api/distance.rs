//! Distance resolution for the quote API.
//!
//! The engine expects `distance_km` and `base_travel_hours` to be resolved
//! before it is called. This module defines the [`DistanceResolver`] seam the
//! boundary resolves them through, and the [`FallbackDistanceResolver`] used
//! when no mapping service is wired in.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::request::AddressRequest;

/// Assumed distance when both addresses are in the same city.
pub const FALLBACK_SAME_CITY_KM: Decimal = dec!(10);

/// Assumed distance when the addresses are in different cities.
pub const FALLBACK_OTHER_CITY_KM: Decimal = dec!(100);

/// Average car speed used to derive travel time from a distance.
pub const FALLBACK_AVERAGE_SPEED_KMH: Decimal = dec!(75);

/// Decimal places kept on a derived travel time.
pub const TRAVEL_HOURS_DECIMAL_PLACES: u32 = 2;

/// Derives the car travel time of a distance at the average speed.
///
/// Rounded half up to hundredths of an hour.
///
/// # Example
///
/// ```
/// use quote_engine::api::travel_hours_for_distance;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(travel_hours_for_distance(dec!(100)), dec!(1.33));
/// assert_eq!(travel_hours_for_distance(dec!(150)), dec!(2));
/// ```
pub fn travel_hours_for_distance(distance_km: Decimal) -> Decimal {
    (distance_km / FALLBACK_AVERAGE_SPEED_KMH).round_dp_with_strategy(
        TRAVEL_HOURS_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// A resolved route between two addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Road distance in kilometers.
    pub distance_km: Decimal,
    /// Car-based travel time in hours.
    pub base_travel_hours: Decimal,
}

/// Resolves the route between two addresses.
///
/// Implementations return `None` when they cannot produce a route; the API
/// reports that as an unresolved dependency instead of guessing.
pub trait DistanceResolver {
    /// Resolves the route from `origin` to `destination`.
    fn resolve(&self, origin: &AddressRequest, destination: &AddressRequest) -> Option<Route>;
}

/// Resolver implementing the documented fallback policy.
///
/// Same city gives 10 km, different cities give 100 km, and the travel time
/// is the distance at 75 km/h. Cities are compared case-insensitively; when
/// either city is missing the postal codes are compared instead. With
/// neither available no route is returned.
///
/// # Example
///
/// ```
/// use quote_engine::api::{AddressRequest, DistanceResolver, FallbackDistanceResolver};
/// use rust_decimal_macros::dec;
///
/// let origin = AddressRequest { city: Some("Berlin".to_string()), ..Default::default() };
/// let destination = AddressRequest { city: Some("München".to_string()), ..Default::default() };
///
/// let route = FallbackDistanceResolver.resolve(&origin, &destination).unwrap();
/// assert_eq!(route.distance_km, dec!(100));
/// assert_eq!(route.base_travel_hours, dec!(1.33));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackDistanceResolver;

impl DistanceResolver for FallbackDistanceResolver {
    fn resolve(&self, origin: &AddressRequest, destination: &AddressRequest) -> Option<Route> {
        let same_city = match (normalized_city(origin), normalized_city(destination)) {
            (Some(a), Some(b)) => a == b,
            _ => match (&origin.postal_code, &destination.postal_code) {
                (Some(a), Some(b)) => a.trim() == b.trim(),
                _ => return None,
            },
        };

        let distance_km = if same_city {
            FALLBACK_SAME_CITY_KM
        } else {
            FALLBACK_OTHER_CITY_KM
        };
        let base_travel_hours = travel_hours_for_distance(distance_km);

        debug!(
            same_city,
            distance_km = %distance_km,
            base_travel_hours = %base_travel_hours,
            "Fallback distance applied"
        );

        Some(Route {
            distance_km,
            base_travel_hours,
        })
    }
}

fn normalized_city(address: &AddressRequest) -> Option<String> {
    address
        .city
        .as_deref()
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn address(city: Option<&str>, postal_code: Option<&str>) -> AddressRequest {
        AddressRequest {
            city: city.map(str::to_string),
            postal_code: postal_code.map(str::to_string),
            ..AddressRequest::default()
        }
    }

    #[test]
    fn test_same_city_is_short_hop() {
        let route = FallbackDistanceResolver
            .resolve(
                &address(Some("Berlin"), Some("10115")),
                &address(Some(" berlin "), Some("13353")),
            )
            .unwrap();

        assert_eq!(route.distance_km, dec("10"));
        // 10 / 75 = 0.1333...
        assert_eq!(route.base_travel_hours, dec("0.13"));
    }

    #[test]
    fn test_other_city_is_long_haul() {
        let route = FallbackDistanceResolver
            .resolve(&address(Some("Berlin"), None), &address(Some("Hamburg"), None))
            .unwrap();

        assert_eq!(route.distance_km, dec("100"));
        assert_eq!(route.base_travel_hours, dec("1.33"));
    }

    #[test]
    fn test_postal_codes_used_without_cities() {
        let same = FallbackDistanceResolver
            .resolve(&address(None, Some("80331")), &address(Some("München"), Some("80331")))
            .unwrap();
        assert_eq!(same.distance_km, dec("10"));

        let other = FallbackDistanceResolver
            .resolve(&address(None, Some("80331")), &address(None, Some("10115")))
            .unwrap();
        assert_eq!(other.distance_km, dec("100"));
    }

    #[test]
    fn test_nothing_to_compare_is_unresolved() {
        assert!(
            FallbackDistanceResolver
                .resolve(&address(Some("Berlin"), None), &address(None, None))
                .is_none()
        );
    }
}
