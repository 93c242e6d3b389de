//! Request types for the quote engine API.
//!
//! This module defines the JSON request structures for the `/quote` endpoint
//! and their conversion into [`MoveFacts`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{InventoryItem, Leg, MoveFacts, Service};

use super::distance::{DistanceResolver, Route, travel_hours_for_distance};

/// Request body for the `/quote` endpoint.
///
/// The shipment volume may be given directly, summed from the inventory or
/// estimated from the apartment size, in that order of precedence. Distance
/// and travel time may be given directly; otherwise they are resolved from
/// the two addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Tenant whose rates apply.
    #[serde(default = "default_tenant")]
    pub tenant: String,
    /// Pickup address.
    pub origin: AddressRequest,
    /// Delivery address.
    pub destination: AddressRequest,
    /// Total shipment volume in cubic meters.
    #[serde(default)]
    pub volume_m3: Option<Decimal>,
    /// Apartment size used to estimate the volume.
    #[serde(default)]
    pub apartment_size: Option<ApartmentSize>,
    /// Inventory lines.
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Road distance in kilometers, bypassing distance resolution.
    #[serde(default)]
    pub distance_km: Option<Decimal>,
    /// Car-based travel time in hours. Only accepted together with
    /// `distance_km`; a resolved route brings its own travel time.
    #[serde(default)]
    pub base_travel_hours: Option<Decimal>,
    /// Selected add-on services.
    #[serde(default)]
    pub services: Vec<Service>,
    /// Requested moving day.
    #[serde(default)]
    pub move_date: Option<NaiveDate>,
    /// Declared goods value for premium insurance.
    #[serde(default)]
    pub declared_value: Option<Decimal>,
    /// Explicit crew size.
    #[serde(default)]
    pub crew_size_override: Option<u32>,
}

fn default_tenant() -> String {
    "default".to_string()
}

/// Address information in a quote request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRequest {
    /// City name, used by the fallback distance resolver.
    #[serde(default)]
    pub city: Option<String>,
    /// German postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Floor (0 is ground floor).
    #[serde(default)]
    pub floor: i32,
    /// Whether a usable elevator is available.
    #[serde(default)]
    pub has_elevator: bool,
}

/// Apartment size categories with a typical shipment volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApartmentSize {
    /// Studio apartment.
    #[serde(rename = "studio")]
    Studio,
    /// One bedroom.
    #[serde(rename = "1br")]
    OneBedroom,
    /// Two bedrooms.
    #[serde(rename = "2br")]
    TwoBedrooms,
    /// Three bedrooms.
    #[serde(rename = "3br")]
    ThreeBedrooms,
    /// Four or more bedrooms.
    #[serde(rename = "4br+")]
    FourBedroomsPlus,
}

impl ApartmentSize {
    /// Returns the estimated shipment volume in cubic meters.
    pub fn estimated_volume_m3(self) -> Decimal {
        match self {
            ApartmentSize::Studio => dec!(15),
            ApartmentSize::OneBedroom => dec!(25),
            ApartmentSize::TwoBedrooms => dec!(40),
            ApartmentSize::ThreeBedrooms => dec!(60),
            ApartmentSize::FourBedroomsPlus => dec!(80),
        }
    }
}

impl From<&AddressRequest> for Leg {
    fn from(req: &AddressRequest) -> Self {
        Leg {
            floor: req.floor,
            has_elevator: req.has_elevator,
            postal_code: req.postal_code.clone(),
        }
    }
}

impl QuoteRequest {
    /// Determines the shipment volume.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] when the request carries no
    /// volume, no inventory and no apartment size.
    pub fn resolve_volume(&self) -> EngineResult<Decimal> {
        if let Some(volume) = self.volume_m3 {
            return Ok(volume);
        }
        if !self.inventory.is_empty() {
            return Ok(self
                .inventory
                .iter()
                .map(|item| Decimal::from(item.quantity) * item.unit_volume_m3)
                .sum());
        }
        if let Some(size) = self.apartment_size {
            return Ok(size.estimated_volume_m3());
        }
        Err(EngineError::invalid_input(
            "volume_m3",
            "provide volume_m3, inventory or apartment_size",
        ))
    }

    /// Determines distance and travel time.
    ///
    /// An explicit `distance_km` wins; a missing `base_travel_hours` is then
    /// derived at the average speed. Otherwise the resolver is asked.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] for a `base_travel_hours` sent
    /// without `distance_km`, and [`EngineError::UnresolvedDependency`] when
    /// the resolver cannot produce a route.
    pub fn resolve_route(&self, resolver: &dyn DistanceResolver) -> EngineResult<Route> {
        if let Some(distance_km) = self.distance_km {
            let base_travel_hours = match self.base_travel_hours {
                Some(hours) => hours,
                None => travel_hours_for_distance(distance_km),
            };
            return Ok(Route {
                distance_km,
                base_travel_hours,
            });
        }
        if self.base_travel_hours.is_some() {
            return Err(EngineError::invalid_input("base_travel_hours", "requires distance_km"));
        }

        resolver
            .resolve(&self.origin, &self.destination)
            .ok_or_else(|| EngineError::UnresolvedDependency {
                dependency: "distance".to_string(),
                message: "no route between origin and destination".to_string(),
            })
    }

    /// Converts the request into engine input.
    ///
    /// # Errors
    ///
    /// Fails when the volume or the route cannot be determined.
    pub fn into_move_facts(self, resolver: &dyn DistanceResolver) -> EngineResult<MoveFacts> {
        let volume_m3 = self.resolve_volume()?;
        let route = self.resolve_route(resolver)?;

        Ok(MoveFacts {
            volume_m3,
            distance_km: route.distance_km,
            base_travel_hours: route.base_travel_hours,
            origin: Leg::from(&self.origin),
            destination: Leg::from(&self.destination),
            move_date: self.move_date,
            services: self.services,
            inventory: self.inventory,
            declared_value: self.declared_value,
            crew_size_override: self.crew_size_override,
        })
    }
}
