//! Floor surcharge calculation.
//!
//! Carrying goods up or down stairs beyond the 2nd floor is charged as a
//! percentage of the volume and labor cost, once for every floor above the
//! 2nd on each leg that has no elevator.

use rust_decimal::Decimal;

use super::arithmetic::{checked_add_range, checked_mul, checked_scale};
use crate::error::EngineResult;
use crate::models::{AuditStep, Leg, LineItem, LineItemKind, PriceRange};

/// Floors that can be reached by stairs without a surcharge.
pub const FLOOR_SURCHARGE_FREE_FLOORS: i32 = 2;

/// The result of a floor surcharge calculation.
#[derive(Debug, Clone)]
pub struct FloorSurchargeResult {
    /// The floor surcharge line; zero when no leg qualifies.
    pub line_item: LineItem,
    /// Total surcharged floors across both legs.
    pub surcharged_floors: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the number of surcharged floors of one leg.
///
/// Zero when the leg has an elevator or is at or below the 2nd floor.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::surcharged_floors;
/// use quote_engine::models::Leg;
///
/// let walk_up = Leg { floor: 5, has_elevator: false, postal_code: None };
/// assert_eq!(surcharged_floors(&walk_up), 3);
///
/// let with_elevator = Leg { floor: 5, has_elevator: true, postal_code: None };
/// assert_eq!(surcharged_floors(&with_elevator), 0);
/// ```
pub fn surcharged_floors(leg: &Leg) -> i64 {
    (i64::from(leg.stair_floors()) - i64::from(FLOOR_SURCHARGE_FREE_FLOORS)).max(0)
}

/// Calculates the floor surcharge for a move.
///
/// `percent × surcharged_floors × (volume_cost + labor_cost)`, computed for
/// the min and max bound independently. Floor counts are summed as `i64`,
/// so the highest `i32` floor on both legs still adds up.
///
/// # Arguments
///
/// * `origin` - The pickup leg
/// * `destination` - The delivery leg
/// * `volume_cost` - The volume cost range
/// * `labor_cost` - The labor cost range
/// * `percent` - Surcharge per floor as a fraction (0.15 = 15%)
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidInput`] on the leg with the
/// most surcharged floors when the surcharge is too large to calculate.
pub fn calculate_floor_surcharge(
    origin: &Leg,
    destination: &Leg,
    volume_cost: PriceRange,
    labor_cost: PriceRange,
    percent: Decimal,
    step_number: u32,
) -> EngineResult<FloorSurchargeResult> {
    let origin_floors = surcharged_floors(origin);
    let destination_floors = surcharged_floors(destination);
    let total_floors = origin_floors + destination_floors;
    let field = if origin_floors >= destination_floors {
        "origin.floor"
    } else {
        "destination.floor"
    };

    let base = checked_add_range("volume_m3", volume_cost, labor_cost)?;
    let factor = checked_mul(field, percent, Decimal::from(total_floors))?;
    let amount = checked_scale(field, base, factor)?;

    let reasoning = if total_floors == 0 {
        "No leg above the 2nd floor without elevator; no surcharge".to_string()
    } else {
        format!(
            "{} × {} floors × [€{}, €{}] = [€{}, €{}]",
            percent.normalize(),
            total_floors,
            base.min.normalize(),
            base.max.normalize(),
            amount.min.normalize(),
            amount.max.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "floor_surcharge".to_string(),
        rule_name: "Floor Surcharge".to_string(),
        input: serde_json::json!({
            "origin_floor": origin.floor,
            "origin_has_elevator": origin.has_elevator,
            "destination_floor": destination.floor,
            "destination_has_elevator": destination.has_elevator,
            "percent_per_floor": percent.normalize().to_string(),
            "base_min": base.min.normalize().to_string(),
            "base_max": base.max.normalize().to_string()
        }),
        output: serde_json::json!({
            "origin_surcharged_floors": origin_floors,
            "destination_surcharged_floors": destination_floors,
            "min": amount.min.normalize().to_string(),
            "max": amount.max.normalize().to_string()
        }),
        reasoning,
    };

    Ok(FloorSurchargeResult {
        line_item: LineItem {
            kind: LineItemKind::FloorSurcharge,
            description: format!("Floor surcharge ({} floors by stairs)", total_floors),
            amount,
        },
        surcharged_floors: total_floors,
        audit_step,
    })
}
