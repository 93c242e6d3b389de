//! Labor-duration estimation.
//!
//! This module turns the shipment volume, the stair conditions of both
//! addresses, the labor-relevant services and a car-based travel estimate
//! into a [`DurationBreakdown`]: total man-hours, crew size, loading time,
//! truck travel time and total clock duration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::arithmetic::{checked_add, checked_mul};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, DurationBreakdown, MoveFacts, ServiceKind};

/// Man-hours per cubic meter of base loading effort.
pub const MAN_HOURS_PER_M3: Decimal = dec!(0.12);

/// Extra man-hours per cubic meter for every floor carried by stairs.
pub const STAIR_MAN_HOURS_PER_M3_PER_FLOOR: Decimal = dec!(0.02);

/// Extra man-hours per cubic meter when furniture disassembly is booked.
pub const DISASSEMBLY_MAN_HOURS_PER_M3: Decimal = dec!(0.15);

/// Extra man-hours per cubic meter when packing is booked.
pub const PACKING_MAN_HOURS_PER_M3: Decimal = dec!(0.25);

/// Smallest number of man-hours ever quoted.
pub const MIN_MAN_HOURS: Decimal = dec!(4.0);

/// Trucks are 15% slower than the car-based travel estimate.
pub const TRUCK_TRAVEL_FACTOR: Decimal = dec!(1.15);

/// Truck travel time above which a driver break becomes mandatory.
pub const MANDATORY_BREAK_THRESHOLD_HOURS: Decimal = dec!(4.5);

/// Length of the mandatory driver break (45 minutes).
pub const MANDATORY_BREAK_HOURS: Decimal = dec!(0.75);

/// Volumes below this get the smallest crew.
pub const SMALL_CREW_VOLUME_LIMIT: Decimal = dec!(20);

/// Volumes above this get the largest crew.
pub const LARGE_CREW_VOLUME_LIMIT: Decimal = dec!(45);

/// The result of a duration calculation.
#[derive(Debug, Clone)]
pub struct DurationResult {
    /// The duration estimate.
    pub duration: DurationBreakdown,
    /// Audit steps for man-hours, crew size and travel time, in order.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while estimating.
    pub warnings: Vec<AuditWarning>,
}

/// Returns the crew size of the volume tier, before any configured minimum.
///
/// `< 20 m³ → 2`, `20-45 m³ → 3`, `> 45 m³ → 4`. Both boundaries belong to
/// the middle tier.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::crew_size_for_volume;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(crew_size_for_volume(dec!(19.99)), 2);
/// assert_eq!(crew_size_for_volume(dec!(20)), 3);
/// assert_eq!(crew_size_for_volume(dec!(45)), 3);
/// assert_eq!(crew_size_for_volume(dec!(45.01)), 4);
/// ```
pub fn crew_size_for_volume(volume_m3: Decimal) -> u32 {
    if volume_m3 < SMALL_CREW_VOLUME_LIMIT {
        2
    } else if volume_m3 <= LARGE_CREW_VOLUME_LIMIT {
        3
    } else {
        4
    }
}

/// Estimates the labor duration of a move.
///
/// # Algorithm
///
/// 1. `volume × 0.12` man-hours base effort
/// 2. `+ volume × 0.02 × floor` for each leg without an elevator
/// 3. `+ volume × 0.15` with disassembly, `+ volume × 0.25` with packing
/// 4. at least 4 man-hours
/// 5. crew size from the volume tiers, raised to `min_crew_size`, unless the
///    move carries an explicit crew override
/// 6. loading hours = man-hours / crew size
/// 7. travel hours = base travel × 1.15, plus a 0.75 h break above 4.5 h
/// 8. total = loading + travel
///
/// # Arguments
///
/// * `facts` - The move to estimate
/// * `min_crew_size` - The tenant's smallest crew
/// * `step_number` - The step number of the first audit step
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for a negative volume, floor or
/// travel time, a crew override of zero, or a volume or travel time too
/// large to calculate with.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::calculate_duration;
/// use quote_engine::models::{Leg, MoveFacts};
/// use rust_decimal_macros::dec;
///
/// let facts = MoveFacts {
///     volume_m3: dec!(15),
///     base_travel_hours: dec!(5.5),
///     origin: Leg { floor: 1, has_elevator: false, postal_code: None },
///     ..MoveFacts::default()
/// };
///
/// let result = calculate_duration(&facts, 2, 1).unwrap();
/// assert_eq!(result.duration.man_hours, dec!(4.0));
/// assert_eq!(result.duration.crew_size, 2);
/// assert_eq!(result.duration.loading_hours, dec!(2.0));
/// assert_eq!(result.duration.travel_hours, dec!(7.075));
/// assert_eq!(result.duration.total_hours, dec!(9.075));
/// ```
pub fn calculate_duration(
    facts: &MoveFacts,
    min_crew_size: u32,
    step_number: u32,
) -> EngineResult<DurationResult> {
    let volume = facts.volume_m3;
    if volume < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "volume_m3",
            format!("must not be negative, got {}", volume),
        ));
    }
    for (field, leg) in [
        ("origin.floor", &facts.origin),
        ("destination.floor", &facts.destination),
    ] {
        if leg.floor < 0 {
            return Err(EngineError::invalid_input(
                field,
                format!("must not be negative, got {}", leg.floor),
            ));
        }
    }
    if facts.base_travel_hours < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "base_travel_hours",
            format!("must not be negative, got {}", facts.base_travel_hours),
        ));
    }

    let mut audit_steps = Vec::with_capacity(3);
    let mut warnings = Vec::new();

    // Man-hours
    let base_man_hours = checked_mul("volume_m3", volume, MAN_HOURS_PER_M3)?;
    // Each leg widens to Decimal before the sum; two i32 floors may not fit an i32
    let stair_floors = Decimal::from(facts.origin.stair_floors())
        + Decimal::from(facts.destination.stair_floors());
    let stair_man_hours = checked_mul(
        "volume_m3",
        checked_mul("volume_m3", volume, STAIR_MAN_HOURS_PER_M3_PER_FLOOR)?,
        stair_floors,
    )?;
    let disassembly = facts.has_service(ServiceKind::Disassembly);
    let packing = facts.has_service(ServiceKind::Packing);
    let disassembly_man_hours = if disassembly {
        checked_mul("volume_m3", volume, DISASSEMBLY_MAN_HOURS_PER_M3)?
    } else {
        Decimal::ZERO
    };
    let packing_man_hours = if packing {
        checked_mul("volume_m3", volume, PACKING_MAN_HOURS_PER_M3)?
    } else {
        Decimal::ZERO
    };
    let raw_man_hours = [stair_man_hours, disassembly_man_hours, packing_man_hours]
        .into_iter()
        .try_fold(base_man_hours, |total, part| checked_add("volume_m3", total, part))?;
    let man_hours = raw_man_hours.max(MIN_MAN_HOURS);
    let floor_applied = raw_man_hours < MIN_MAN_HOURS;

    debug!(
        volume = %volume,
        raw_man_hours = %raw_man_hours,
        man_hours = %man_hours,
        "Man-hours estimated"
    );

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "man_hours".to_string(),
        rule_name: "Man-Hours Estimate".to_string(),
        input: serde_json::json!({
            "volume_m3": volume.normalize().to_string(),
            "stair_floors": stair_floors.to_string(),
            "disassembly": disassembly,
            "packing": packing
        }),
        output: serde_json::json!({
            "base": base_man_hours.normalize().to_string(),
            "stairs": stair_man_hours.normalize().to_string(),
            "disassembly": disassembly_man_hours.normalize().to_string(),
            "packing": packing_man_hours.normalize().to_string(),
            "man_hours": man_hours.normalize().to_string(),
            "minimum_applied": floor_applied
        }),
        reasoning: if floor_applied {
            format!(
                "{} man-hours from formula is below the minimum; using {}",
                raw_man_hours.normalize(),
                MIN_MAN_HOURS.normalize()
            )
        } else {
            format!(
                "{} + {} + {} + {} = {} man-hours",
                base_man_hours.normalize(),
                stair_man_hours.normalize(),
                disassembly_man_hours.normalize(),
                packing_man_hours.normalize(),
                man_hours.normalize()
            )
        },
    });

    // Crew size
    let tier_crew = crew_size_for_volume(volume);
    let (crew_size, crew_reasoning) = match facts.crew_size_override {
        Some(0) => {
            return Err(EngineError::invalid_input(
                "crew_size_override",
                "must be at least 1",
            ));
        }
        Some(crew) => (crew, format!("Crew size {} set explicitly", crew)),
        None if min_crew_size > tier_crew => (
            min_crew_size,
            format!(
                "Volume tier gives {} movers; raised to configured minimum {}",
                tier_crew, min_crew_size
            ),
        ),
        None => (
            tier_crew,
            format!("{} m³ falls into the {}-mover tier", volume.normalize(), tier_crew),
        ),
    };
    let loading_hours = man_hours / Decimal::from(crew_size);

    audit_steps.push(AuditStep {
        step_number: step_number + 1,
        rule_id: "crew_size".to_string(),
        rule_name: "Crew Size".to_string(),
        input: serde_json::json!({
            "volume_m3": volume.normalize().to_string(),
            "tier_crew_size": tier_crew,
            "min_crew_size": min_crew_size,
            "crew_size_override": facts.crew_size_override
        }),
        output: serde_json::json!({
            "crew_size": crew_size,
            "loading_hours": loading_hours.normalize().to_string()
        }),
        reasoning: crew_reasoning,
    });

    // Travel time
    let truck_hours =
        checked_mul("base_travel_hours", facts.base_travel_hours, TRUCK_TRAVEL_FACTOR)?;
    let mandatory_break = truck_hours > MANDATORY_BREAK_THRESHOLD_HOURS;
    let travel_hours = if mandatory_break {
        checked_add("base_travel_hours", truck_hours, MANDATORY_BREAK_HOURS)?
    } else {
        truck_hours
    };

    if mandatory_break {
        warnings.push(AuditWarning {
            code: "MANDATORY_BREAK".to_string(),
            message: format!(
                "Truck travel of {} h exceeds {} h; a {} h driver break was added",
                truck_hours.normalize(),
                MANDATORY_BREAK_THRESHOLD_HOURS.normalize(),
                MANDATORY_BREAK_HOURS.normalize()
            ),
            severity: "low".to_string(),
        });
    }

    audit_steps.push(AuditStep {
        step_number: step_number + 2,
        rule_id: "travel_time".to_string(),
        rule_name: "Truck Travel Time".to_string(),
        input: serde_json::json!({
            "base_travel_hours": facts.base_travel_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "truck_hours": truck_hours.normalize().to_string(),
            "mandatory_break": mandatory_break,
            "travel_hours": travel_hours.normalize().to_string()
        }),
        reasoning: format!(
            "{} h × {}{} = {} h",
            facts.base_travel_hours.normalize(),
            TRUCK_TRAVEL_FACTOR.normalize(),
            if mandatory_break {
                format!(" + {} h break", MANDATORY_BREAK_HOURS.normalize())
            } else {
                String::new()
            },
            travel_hours.normalize()
        ),
    });

    let total_hours = checked_add("base_travel_hours", loading_hours, travel_hours)?;

    debug!(
        crew_size,
        loading_hours = %loading_hours,
        travel_hours = %travel_hours,
        total_hours = %total_hours,
        "Duration estimated"
    );

    Ok(DurationResult {
        duration: DurationBreakdown {
            man_hours,
            crew_size,
            loading_hours,
            travel_hours,
            mandatory_break,
            total_hours,
        },
        audit_steps,
        warnings,
    })
}
