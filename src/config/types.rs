//! Rate configuration types.
//!
//! This module contains the strongly-typed rate configuration that is
//! deserialized from a tenant's YAML files and handed to the engine as an
//! immutable snapshot for each calculation.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::HeavyItemType;

/// A configured `[min, max]` rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRange {
    /// Lower rate.
    pub min: Decimal,
    /// Upper rate.
    pub max: Decimal,
}

/// Tiered distance pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceRates {
    /// Rate per km up to the threshold.
    pub near_rate_per_km: Decimal,
    /// Rate per km beyond the threshold.
    pub far_rate_per_km: Decimal,
    /// Distance at which the far rate starts.
    pub threshold_km: Decimal,
}

/// Disposal pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalRates {
    /// Flat fee per disposal order.
    pub base_fee: Decimal,
    /// Price per cubic meter disposed.
    pub per_m3: Decimal,
}

/// Insurance pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceRates {
    /// Flat fee for basic cover.
    pub basic_flat_fee: Decimal,
    /// Premium cover as a fraction of the declared value (0.01 = 1%).
    pub premium_percent: Decimal,
    /// Lowest premium price.
    pub premium_min: Decimal,
}

/// Prices for add-on services.
///
/// Every entry is optional; selecting a service whose price is absent
/// fails the quote with a configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRates {
    /// No-parking-zone permit flat fee.
    pub hvz_permit: Option<Decimal>,
    /// Kitchen assembly price per meter.
    pub kitchen_assembly_per_meter: Option<Decimal>,
    /// External lift price range.
    pub external_lift: Option<RateRange>,
    /// Packing materials price per cubic meter.
    pub packing_materials_per_m3: Option<Decimal>,
    /// Disposal pricing.
    pub disposal: Option<DisposalRates>,
    /// Long-carry price per started 10 meters beyond the free zone.
    pub long_carry_per_10m: Option<Decimal>,
    /// Insurance pricing.
    pub insurance: Option<InsuranceRates>,
}

/// Weekend and public holiday surcharges as fractions (0.25 = +25%).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSurcharges {
    /// Surcharge for Saturdays and Sundays.
    pub weekend_percent: Option<Decimal>,
    /// Surcharge for listed public holidays.
    pub holiday_percent: Option<Decimal>,
}

/// A region whose postal codes carry a price multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalMultiplier {
    /// Region name (e.g. "munich").
    pub region: String,
    /// Postal code prefixes belonging to the region.
    pub prefixes: Vec<String>,
    /// Multiplier for moves touching the region.
    pub multiplier: Decimal,
}

/// Regional pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionalPricing {
    /// Whether regional pricing is applied at all.
    pub enabled: bool,
    /// Regions in table order.
    pub regions: Vec<RegionalMultiplier>,
}

impl RegionalPricing {
    /// Fails when regional pricing is enabled without any region.
    pub fn check_enabled_table(&self) -> EngineResult<()> {
        if self.enabled && self.regions.is_empty() {
            return Err(inconsistent(
                "regional.regions",
                "regional pricing is enabled but no regions are configured",
            ));
        }
        Ok(())
    }
}

/// Seasonal pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalPricing {
    /// Whether seasonal pricing is applied at all.
    pub enabled: bool,
    /// Months (1-12) in peak season.
    pub peak_months: Vec<u32>,
    /// Multiplier during peak season.
    pub peak_multiplier: Decimal,
    /// Months (1-12) in off-peak season.
    pub offpeak_months: Vec<u32>,
    /// Multiplier during off-peak season.
    pub offpeak_multiplier: Decimal,
}

impl Default for SeasonalPricing {
    fn default() -> Self {
        Self {
            enabled: false,
            peak_months: vec![5, 6, 7, 8, 9],
            peak_multiplier: dec!(1.15),
            offpeak_months: vec![12, 1, 2],
            offpeak_multiplier: Decimal::ONE,
        }
    }
}

impl SeasonalPricing {
    /// Fails when seasonal pricing is enabled without any peak or off-peak month.
    pub fn check_enabled_table(&self) -> EngineResult<()> {
        if self.enabled && self.peak_months.is_empty() && self.offpeak_months.is_empty() {
            return Err(inconsistent(
                "seasonal.peak_months",
                "seasonal pricing is enabled but no months are configured",
            ));
        }
        Ok(())
    }
}

fn default_vat_rate() -> Decimal {
    dec!(0.19)
}

/// The complete rate configuration of one tenant, for one version.
///
/// Core rates are mandatory; a file without them fails to load.
/// Feature-specific prices are optional and checked when used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfiguration {
    /// Tenant identifier.
    pub tenant: String,
    /// Version label of this configuration.
    pub version: String,
    /// First day this configuration applies to.
    pub effective_date: NaiveDate,
    /// Price per cubic meter.
    pub volume_rate: RateRange,
    /// Tiered distance rates.
    pub distance: DistanceRates,
    /// Price per man-hour.
    pub labor_rate: RateRange,
    /// Smallest crew the tenant sends out.
    pub min_crew_size: u32,
    /// Surcharge per floor above the 2nd without elevator (0.15 = 15%).
    pub floor_surcharge_percent: Decimal,
    /// VAT rate (0.19 = 19%).
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,
    /// Add-on service prices.
    #[serde(default)]
    pub services: ServiceRates,
    /// Flat surcharge per heavy item type.
    #[serde(default)]
    pub heavy_item_surcharges: HashMap<HeavyItemType, Decimal>,
    /// Weekend and holiday surcharges.
    #[serde(default)]
    pub calendar: CalendarSurcharges,
    /// Regional multipliers.
    #[serde(default)]
    pub regional: RegionalPricing,
    /// Seasonal multipliers.
    #[serde(default)]
    pub seasonal: SeasonalPricing,
}

impl RateConfiguration {
    /// Checks the configuration for inconsistent values.
    ///
    /// Rates must be non-negative, every range ordered, the crew minimum at
    /// least 1, multipliers positive and months within 1-12. An enabled
    /// regional or seasonal table must not be empty.
    pub fn validate(&self) -> EngineResult<()> {
        check_range("volume_rate", &self.volume_rate)?;
        check_range("labor_rate", &self.labor_rate)?;
        check_non_negative("distance.near_rate_per_km", self.distance.near_rate_per_km)?;
        check_non_negative("distance.far_rate_per_km", self.distance.far_rate_per_km)?;
        check_non_negative("distance.threshold_km", self.distance.threshold_km)?;
        check_non_negative("floor_surcharge_percent", self.floor_surcharge_percent)?;
        check_non_negative("vat_rate", self.vat_rate)?;

        if self.min_crew_size == 0 {
            return Err(inconsistent("min_crew_size", "must be at least 1"));
        }

        let services = &self.services;
        if let Some(lift) = &services.external_lift {
            check_range("services.external_lift", lift)?;
        }
        for (field, value) in [
            ("services.hvz_permit", services.hvz_permit),
            (
                "services.kitchen_assembly_per_meter",
                services.kitchen_assembly_per_meter,
            ),
            (
                "services.packing_materials_per_m3",
                services.packing_materials_per_m3,
            ),
            ("services.long_carry_per_10m", services.long_carry_per_10m),
            ("calendar.weekend_percent", self.calendar.weekend_percent),
            ("calendar.holiday_percent", self.calendar.holiday_percent),
        ] {
            if let Some(value) = value {
                check_non_negative(field, value)?;
            }
        }
        if let Some(disposal) = &services.disposal {
            check_non_negative("services.disposal.base_fee", disposal.base_fee)?;
            check_non_negative("services.disposal.per_m3", disposal.per_m3)?;
        }
        if let Some(insurance) = &services.insurance {
            check_non_negative("services.insurance.basic_flat_fee", insurance.basic_flat_fee)?;
            check_non_negative(
                "services.insurance.premium_percent",
                insurance.premium_percent,
            )?;
            check_non_negative("services.insurance.premium_min", insurance.premium_min)?;
        }

        for (item_type, amount) in &self.heavy_item_surcharges {
            check_non_negative(
                &format!("heavy_item_surcharges.{}", item_type.as_str()),
                *amount,
            )?;
        }

        self.regional.check_enabled_table()?;
        for region in &self.regional.regions {
            check_positive(
                &format!("regional.{}.multiplier", region.region),
                region.multiplier,
            )?;
            if region.prefixes.iter().any(|p| p.is_empty()) {
                return Err(inconsistent(
                    &format!("regional.{}.prefixes", region.region),
                    "prefixes must not be empty",
                ));
            }
        }

        let seasonal = &self.seasonal;
        seasonal.check_enabled_table()?;
        check_positive("seasonal.peak_multiplier", seasonal.peak_multiplier)?;
        check_positive("seasonal.offpeak_multiplier", seasonal.offpeak_multiplier)?;
        for month in seasonal.peak_months.iter().chain(&seasonal.offpeak_months) {
            if !(1..=12).contains(month) {
                return Err(inconsistent(
                    "seasonal",
                    &format!("month {} is outside 1-12", month),
                ));
            }
        }

        Ok(())
    }
}

fn inconsistent(field: &str, message: &str) -> EngineError {
    EngineError::Configuration {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(inconsistent(field, &format!("must not be negative, got {}", value)));
    }
    Ok(())
}

fn check_positive(field: &str, value: Decimal) -> EngineResult<()> {
    if value <= Decimal::ZERO {
        return Err(inconsistent(field, &format!("must be positive, got {}", value)));
    }
    Ok(())
}

fn check_range(field: &str, range: &RateRange) -> EngineResult<()> {
    check_non_negative(field, range.min)?;
    if range.min > range.max {
        return Err(inconsistent(
            field,
            &format!("min {} exceeds max {}", range.min, range.max),
        ));
    }
    Ok(())
}
