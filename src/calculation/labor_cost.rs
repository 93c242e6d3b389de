//! Labor cost calculation.

use rust_decimal::Decimal;

use super::arithmetic::checked_mul;
use crate::config::RateRange;
use crate::error::EngineResult;
use crate::models::{AuditStep, DurationBreakdown, LineItem, LineItemKind, PriceRange};

/// The result of a labor cost calculation.
#[derive(Debug, Clone)]
pub struct LaborCostResult {
    /// The labor cost line.
    pub line_item: LineItem,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices labor as `man_hours × labor_rate`.
///
/// Man-hours already sum the effort of the whole crew, so the crew size is
/// not multiplied in again.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidInput`] when the man-hours are
/// too large to price.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::calculate_labor_cost;
/// use quote_engine::config::RateRange;
/// use quote_engine::models::DurationBreakdown;
/// use rust_decimal_macros::dec;
///
/// let duration = DurationBreakdown {
///     man_hours: dec!(4.8),
///     crew_size: 3,
///     loading_hours: dec!(1.6),
///     travel_hours: dec!(1),
///     mandatory_break: false,
///     total_hours: dec!(2.6),
/// };
/// let rate = RateRange { min: dec!(60), max: dec!(80) };
///
/// let result = calculate_labor_cost(&duration, &rate, 1).unwrap();
/// assert_eq!(result.line_item.amount.min, dec!(288));
/// assert_eq!(result.line_item.amount.max, dec!(384));
/// ```
pub fn calculate_labor_cost(
    duration: &DurationBreakdown,
    rate: &RateRange,
    step_number: u32,
) -> EngineResult<LaborCostResult> {
    let man_hours = duration.man_hours;
    let amount = PriceRange::new(
        checked_mul("volume_m3", man_hours, rate.min)?,
        checked_mul("volume_m3", man_hours, rate.max)?,
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "labor_cost".to_string(),
        rule_name: "Labor Cost".to_string(),
        input: serde_json::json!({
            "man_hours": man_hours.normalize().to_string(),
            "crew_size": duration.crew_size,
            "rate_min": rate.min.normalize().to_string(),
            "rate_max": rate.max.normalize().to_string()
        }),
        output: serde_json::json!({
            "min": amount.min.normalize().to_string(),
            "max": amount.max.normalize().to_string()
        }),
        reasoning: format!(
            "{} man-hours × [€{}, €{}] = [€{}, €{}]",
            man_hours.normalize(),
            rate.min.normalize(),
            rate.max.normalize(),
            amount.min.normalize(),
            amount.max.normalize()
        ),
    };

    Ok(LaborCostResult {
        line_item: LineItem {
            kind: LineItemKind::Labor,
            description: format!(
                "Labor {} man-hours ({} movers)",
                man_hours.normalize(),
                duration.crew_size
            ),
            amount,
        },
        audit_step,
    })
}
