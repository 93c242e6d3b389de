//! Move description models.
//!
//! This module defines [`MoveFacts`], the structured description of a single
//! moving job, together with the per-address [`Leg`], the selectable
//! [`Service`]s and the [`InventoryItem`]s used for heavy-item detection.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One end of a move (pickup or delivery address).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leg {
    /// Floor the crew has to reach (0 is ground floor).
    #[serde(default)]
    pub floor: i32,
    /// Whether a usable elevator is available.
    #[serde(default)]
    pub has_elevator: bool,
    /// German postal code of the address, used for regional pricing.
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl Leg {
    /// Returns the number of floors the crew has to carry by stairs.
    ///
    /// Zero when an elevator is available.
    pub fn stair_floors(&self) -> i32 {
        if self.has_elevator { 0 } else { self.floor }
    }
}

/// Which insurance product was booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceTier {
    /// Flat-fee basic cover.
    Basic,
    /// Cover priced as a percentage of the declared value, with a floor.
    Premium,
}

/// An add-on service selected for the move.
///
/// Serialized with an internal `type` tag, e.g.
/// `{"type": "kitchen_assembly", "meters": "4.5"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Service {
    /// Temporary no-parking-zone permit (Halteverbotszone).
    HvzPermit,
    /// Kitchen disassembly and reassembly, priced per running meter.
    KitchenAssembly {
        /// Running meters of kitchen.
        meters: Decimal,
    },
    /// External furniture lift.
    ExternalLift,
    /// Packing by the crew; adds labor time and packing materials.
    Packing,
    /// Furniture disassembly by the crew; adds labor time.
    Disassembly,
    /// Disposal of unwanted items.
    Disposal {
        /// Volume to dispose of in cubic meters.
        volume_m3: Decimal,
    },
    /// Carry distance between truck and entrance.
    LongCarry {
        /// Walking distance in meters.
        distance_m: Decimal,
    },
    /// Transport insurance.
    Insurance {
        /// The insurance product.
        tier: InsuranceTier,
    },
}

/// Discriminant of a [`Service`], without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// See [`Service::HvzPermit`].
    HvzPermit,
    /// See [`Service::KitchenAssembly`].
    KitchenAssembly,
    /// See [`Service::ExternalLift`].
    ExternalLift,
    /// See [`Service::Packing`].
    Packing,
    /// See [`Service::Disassembly`].
    Disassembly,
    /// See [`Service::Disposal`].
    Disposal,
    /// See [`Service::LongCarry`].
    LongCarry,
    /// See [`Service::Insurance`].
    Insurance,
}

impl Service {
    /// Returns the kind of this service.
    pub fn kind(&self) -> ServiceKind {
        match self {
            Service::HvzPermit => ServiceKind::HvzPermit,
            Service::KitchenAssembly { .. } => ServiceKind::KitchenAssembly,
            Service::ExternalLift => ServiceKind::ExternalLift,
            Service::Packing => ServiceKind::Packing,
            Service::Disassembly => ServiceKind::Disassembly,
            Service::Disposal { .. } => ServiceKind::Disposal,
            Service::LongCarry { .. } => ServiceKind::LongCarry,
            Service::Insurance { .. } => ServiceKind::Insurance,
        }
    }
}

/// Inventory categories that need special handling and carry a flat surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeavyItemType {
    /// Upright or grand piano.
    Piano,
    /// Safe (Tresor).
    Safe,
    /// Aquarium.
    Aquarium,
    /// Fitness equipment.
    GymEquipment,
    /// Marble table top.
    MarbleTable,
    /// Antique furniture.
    Antique,
}

impl HeavyItemType {
    /// Returns the snake_case name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeavyItemType::Piano => "piano",
            HeavyItemType::Safe => "safe",
            HeavyItemType::Aquarium => "aquarium",
            HeavyItemType::GymEquipment => "gym_equipment",
            HeavyItemType::MarbleTable => "marble_table",
            HeavyItemType::Antique => "antique",
        }
    }
}

/// A line of the customer's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Free-text item name (e.g. "Klavier", "Sofa").
    pub name: String,
    /// Optional category assigned by the item catalogue.
    #[serde(default)]
    pub category: Option<String>,
    /// Number of identical items.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Volume of a single item in cubic meters.
    #[serde(default)]
    pub unit_volume_m3: Decimal,
}

fn default_quantity() -> u32 {
    1
}

/// Everything the engine needs to know about one moving job.
///
/// `distance_km` and `base_travel_hours` must already be resolved by the
/// caller (see [`crate::api::DistanceResolver`]).
///
/// # Example
///
/// ```
/// use quote_engine::models::{Leg, MoveFacts};
/// use rust_decimal_macros::dec;
///
/// let facts = MoveFacts {
///     volume_m3: dec!(15),
///     distance_km: dec!(12),
///     base_travel_hours: dec!(0.4),
///     origin: Leg { floor: 1, has_elevator: false, postal_code: None },
///     ..MoveFacts::default()
/// };
/// assert!(facts.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveFacts {
    /// Total shipment volume in cubic meters.
    pub volume_m3: Decimal,
    /// Road distance between the two addresses in kilometers.
    pub distance_km: Decimal,
    /// Car-based travel time estimate in hours.
    #[serde(default)]
    pub base_travel_hours: Decimal,
    /// Pickup address.
    #[serde(default)]
    pub origin: Leg,
    /// Delivery address.
    #[serde(default)]
    pub destination: Leg,
    /// Requested moving day.
    #[serde(default)]
    pub move_date: Option<NaiveDate>,
    /// Selected add-on services; each kind at most once.
    #[serde(default)]
    pub services: Vec<Service>,
    /// Inventory lines, used for heavy-item detection only.
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Declared goods value for premium insurance.
    #[serde(default)]
    pub declared_value: Option<Decimal>,
    /// Explicit crew size, replacing the volume-based tiers.
    #[serde(default)]
    pub crew_size_override: Option<u32>,
}

impl MoveFacts {
    /// Returns true if a service of the given kind was selected.
    pub fn has_service(&self, kind: ServiceKind) -> bool {
        self.services.iter().any(|s| s.kind() == kind)
    }

    /// Sums `quantity × unit_volume_m3` over the inventory.
    pub fn inventory_volume(&self) -> Decimal {
        self.inventory
            .iter()
            .map(|item| Decimal::from(item.quantity) * item.unit_volume_m3)
            .sum()
    }

    /// Checks every field against its invariant.
    ///
    /// Returns the first violation as [`EngineError::InvalidInput`]; values
    /// are never clamped.
    pub fn validate(&self) -> EngineResult<()> {
        non_negative("volume_m3", self.volume_m3)?;
        non_negative("distance_km", self.distance_km)?;
        non_negative("base_travel_hours", self.base_travel_hours)?;
        validate_leg("origin", &self.origin)?;
        validate_leg("destination", &self.destination)?;

        if let Some(value) = self.declared_value {
            non_negative("declared_value", value)?;
        }
        if self.crew_size_override == Some(0) {
            return Err(EngineError::invalid_input(
                "crew_size_override",
                "must be at least 1",
            ));
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            if !seen.insert(service.kind()) {
                return Err(EngineError::invalid_input(
                    "services",
                    format!("service {:?} selected more than once", service.kind()),
                ));
            }
            match service {
                Service::KitchenAssembly { meters } => {
                    non_negative("services.kitchen_assembly.meters", *meters)?
                }
                Service::Disposal { volume_m3 } => {
                    non_negative("services.disposal.volume_m3", *volume_m3)?
                }
                Service::LongCarry { distance_m } => {
                    non_negative("services.long_carry.distance_m", *distance_m)?
                }
                _ => {}
            }
        }

        for item in &self.inventory {
            if item.unit_volume_m3 < Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    "inventory.unit_volume_m3",
                    format!("'{}' has a negative volume", item.name),
                ));
            }
        }

        Ok(())
    }
}

/// Returns true for a German postal code: five digits, 10000 to 99999.
///
/// # Example
///
/// ```
/// use quote_engine::models::is_valid_postal_code;
///
/// assert!(is_valid_postal_code("80331"));
/// assert!(!is_valid_postal_code("01234"));
/// assert!(!is_valid_postal_code("8033"));
/// ```
pub fn is_valid_postal_code(postal_code: &str) -> bool {
    postal_code.len() == 5
        && postal_code.bytes().all(|b| b.is_ascii_digit())
        && !postal_code.starts_with('0')
}

fn non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

fn validate_leg(name: &str, leg: &Leg) -> EngineResult<()> {
    if leg.floor < 0 {
        return Err(EngineError::invalid_input(
            format!("{}.floor", name),
            format!("must not be negative, got {}", leg.floor),
        ));
    }
    if let Some(code) = &leg.postal_code {
        if !is_valid_postal_code(code) {
            return Err(EngineError::invalid_input(
                format!("{}.postal_code", name),
                format!("'{}' is not a valid German postal code", code),
            ));
        }
    }
    Ok(())
}
