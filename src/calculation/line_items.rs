//! Line item calculation.
//!
//! This module runs every cost rule of a move in a fixed order and collects
//! their lines: volume, distance, labor, floor surcharge, booked services and
//! heavy items. All amounts stay at full precision.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::config::RateConfiguration;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditWarning, DurationBreakdown, Leg, LineItems, MoveFacts, PriceRange,
    ServiceKind,
};

use super::arithmetic::checked_sum;
use super::distance_cost::calculate_distance_cost;
use super::floor_surcharge::calculate_floor_surcharge;
use super::heavy_items::calculate_heavy_item_surcharges;
use super::labor_cost::calculate_labor_cost;
use super::services::calculate_service_surcharges;
use super::volume_cost::calculate_volume_cost;

/// Floors above this without an elevator call for an external lift.
pub const EXTERNAL_LIFT_SUGGESTION_FLOOR: i32 = 4;

/// Volumes above this lower the lift suggestion to [`LARGE_MOVE_LIFT_SUGGESTION_FLOOR`].
pub const LARGE_MOVE_LIFT_SUGGESTION_VOLUME: Decimal = dec!(50);

/// Floors above this without an elevator call for an external lift on large moves.
pub const LARGE_MOVE_LIFT_SUGGESTION_FLOOR: i32 = 2;

/// The result of line item calculation.
#[derive(Debug, Clone)]
pub struct LineItemsResult {
    /// All cost lines in pipeline order.
    pub line_items: LineItems,
    /// Sum of all lines at full precision.
    pub total: PriceRange,
    /// Audit steps of every cost rule, in order.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while pricing.
    pub warnings: Vec<AuditWarning>,
}

/// Returns true when a leg should get an external lift.
///
/// A leg without an elevator qualifies above the 4th floor, or above the 2nd
/// floor when the move is larger than 50 m³.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::should_suggest_external_lift;
/// use quote_engine::models::Leg;
/// use rust_decimal_macros::dec;
///
/// let third_floor = Leg { floor: 3, has_elevator: false, postal_code: None };
/// assert!(!should_suggest_external_lift(&third_floor, dec!(50)));
/// assert!(should_suggest_external_lift(&third_floor, dec!(51)));
/// ```
pub fn should_suggest_external_lift(leg: &Leg, volume_m3: Decimal) -> bool {
    if leg.has_elevator {
        return false;
    }
    leg.floor > EXTERNAL_LIFT_SUGGESTION_FLOOR
        || (volume_m3 > LARGE_MOVE_LIFT_SUGGESTION_VOLUME
            && leg.floor > LARGE_MOVE_LIFT_SUGGESTION_FLOOR)
}

/// Computes every cost line of a move.
///
/// Each leg that qualifies for an external lift raises its own
/// `EXTERNAL_LIFT_SUGGESTED_ORIGIN` or `EXTERNAL_LIFT_SUGGESTED_DESTINATION`
/// warning, unless a lift is already booked.
///
/// # Arguments
///
/// * `facts` - The move to price
/// * `config` - The tenant's rate configuration
/// * `duration` - The duration estimate, whose man-hours drive labor cost
/// * `step_number` - The step number of the first audit step
///
/// # Errors
///
/// Fails with [`crate::error::EngineError::Configuration`] when a booked
/// feature has no configured price, and with
/// [`crate::error::EngineError::InvalidInput`] when an input drives an amount
/// out of range.
pub fn calculate_line_items(
    facts: &MoveFacts,
    config: &RateConfiguration,
    duration: &DurationBreakdown,
    step_number: u32,
) -> EngineResult<LineItemsResult> {
    let mut items = Vec::new();
    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();
    let next_step = |steps: &[AuditStep]| step_number + steps.len() as u32;

    let volume =
        calculate_volume_cost(facts.volume_m3, &config.volume_rate, next_step(&audit_steps))?;
    audit_steps.push(volume.audit_step);

    let distance =
        calculate_distance_cost(facts.distance_km, &config.distance, next_step(&audit_steps))?;
    audit_steps.push(distance.audit_step);

    let labor = calculate_labor_cost(duration, &config.labor_rate, next_step(&audit_steps))?;
    audit_steps.push(labor.audit_step);

    let floor = calculate_floor_surcharge(
        &facts.origin,
        &facts.destination,
        volume.line_item.amount,
        labor.line_item.amount,
        config.floor_surcharge_percent,
        next_step(&audit_steps),
    )?;
    audit_steps.push(floor.audit_step);

    if !facts.has_service(ServiceKind::ExternalLift) {
        for (code, name, leg) in [
            ("EXTERNAL_LIFT_SUGGESTED_ORIGIN", "Origin", &facts.origin),
            ("EXTERNAL_LIFT_SUGGESTED_DESTINATION", "Destination", &facts.destination),
        ] {
            if should_suggest_external_lift(leg, facts.volume_m3) {
                warnings.push(AuditWarning {
                    code: code.to_string(),
                    message: format!(
                        "{} is on floor {} without elevator; an external lift is recommended",
                        name, leg.floor
                    ),
                    severity: "medium".to_string(),
                });
            }
        }
    }

    items.push(volume.line_item);
    items.push(distance.line_item);
    items.push(labor.line_item);
    items.push(floor.line_item);

    let services =
        calculate_service_surcharges(facts, &config.services, next_step(&audit_steps))?;
    audit_steps.extend(services.audit_steps);
    items.extend(services.line_items);

    let heavy = calculate_heavy_item_surcharges(
        &facts.inventory,
        &config.heavy_item_surcharges,
        next_step(&audit_steps),
    )?;
    audit_steps.extend(heavy.audit_steps);
    items.extend(heavy.line_items);

    let total = checked_sum("line_items", items.iter().map(|item| &item.amount))?;
    let line_items = LineItems::new(items);

    debug!(
        lines = line_items.len(),
        total_min = %total.min,
        total_max = %total.max,
        "Line items calculated"
    );

    Ok(LineItemsResult {
        line_items,
        total,
        audit_steps,
        warnings,
    })
}
