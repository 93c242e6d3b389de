//! Tiered distance cost calculation.
//!
//! Kilometers up to the configured threshold are charged at the near rate,
//! kilometers beyond it at the far rate. The single resulting amount is then
//! widened into a ±10% band, since distance rates carry no min/max of their own.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::arithmetic::{checked_add, checked_mul};
use crate::config::DistanceRates;
use crate::error::EngineResult;
use crate::models::{AuditStep, LineItem, LineItemKind, PriceRange};

/// Factor applied to the distance cost for the lower bound.
pub const DISTANCE_BAND_LOWER: Decimal = dec!(0.9);

/// Factor applied to the distance cost for the upper bound.
pub const DISTANCE_BAND_UPPER: Decimal = dec!(1.1);

/// The result of a distance cost calculation.
#[derive(Debug, Clone)]
pub struct DistanceCostResult {
    /// The distance cost line.
    pub line_item: LineItem,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices the road distance with near/far tiers and a ±10% band.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidInput`] when the distance is
/// too large to price.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::calculate_distance_cost;
/// use quote_engine::config::DistanceRates;
/// use rust_decimal_macros::dec;
///
/// let rates = DistanceRates {
///     near_rate_per_km: dec!(2.0),
///     far_rate_per_km: dec!(1.0),
///     threshold_km: dec!(50),
/// };
///
/// // 50 × 2.0 + 30 × 1.0 = 130, banded to [117, 143]
/// let result = calculate_distance_cost(dec!(80), &rates, 1).unwrap();
/// assert_eq!(result.line_item.amount.min, dec!(117));
/// assert_eq!(result.line_item.amount.max, dec!(143));
/// ```
pub fn calculate_distance_cost(
    distance_km: Decimal,
    rates: &DistanceRates,
    step_number: u32,
) -> EngineResult<DistanceCostResult> {
    let near_km = distance_km.min(rates.threshold_km);
    let far_km = (distance_km - rates.threshold_km).max(Decimal::ZERO);
    let base = checked_add(
        "distance_km",
        checked_mul("distance_km", near_km, rates.near_rate_per_km)?,
        checked_mul("distance_km", far_km, rates.far_rate_per_km)?,
    )?;
    let amount = PriceRange::new(
        checked_mul("distance_km", base, DISTANCE_BAND_LOWER)?,
        checked_mul("distance_km", base, DISTANCE_BAND_UPPER)?,
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "distance_cost".to_string(),
        rule_name: "Distance Cost".to_string(),
        input: serde_json::json!({
            "distance_km": distance_km.normalize().to_string(),
            "near_rate_per_km": rates.near_rate_per_km.normalize().to_string(),
            "far_rate_per_km": rates.far_rate_per_km.normalize().to_string(),
            "threshold_km": rates.threshold_km.normalize().to_string()
        }),
        output: serde_json::json!({
            "near_km": near_km.normalize().to_string(),
            "far_km": far_km.normalize().to_string(),
            "base": base.normalize().to_string(),
            "min": amount.min.normalize().to_string(),
            "max": amount.max.normalize().to_string()
        }),
        reasoning: format!(
            "{} km × €{} + {} km × €{} = €{}, banded ±10% to [€{}, €{}]",
            near_km.normalize(),
            rates.near_rate_per_km.normalize(),
            far_km.normalize(),
            rates.far_rate_per_km.normalize(),
            base.normalize(),
            amount.min.normalize(),
            amount.max.normalize()
        ),
    };

    Ok(DistanceCostResult {
        line_item: LineItem {
            kind: LineItemKind::Distance,
            description: format!("Distance {} km", distance_km.normalize()),
            amount,
        },
        audit_step,
    })
}
