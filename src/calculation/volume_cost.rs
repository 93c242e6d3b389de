//! Volume cost calculation.

use rust_decimal::Decimal;

use super::arithmetic::checked_mul;
use crate::config::RateRange;
use crate::error::EngineResult;
use crate::models::{AuditStep, LineItem, LineItemKind, PriceRange};

/// The result of a volume cost calculation.
#[derive(Debug, Clone)]
pub struct VolumeCostResult {
    /// The volume cost line.
    pub line_item: LineItem,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices the shipment volume: `[volume × rate_min, volume × rate_max]`.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidInput`] when the volume is too
/// large to price.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::calculate_volume_cost;
/// use quote_engine::config::RateRange;
/// use rust_decimal_macros::dec;
///
/// let rate = RateRange { min: dec!(25), max: dec!(35) };
/// let result = calculate_volume_cost(dec!(40), &rate, 1).unwrap();
/// assert_eq!(result.line_item.amount.min, dec!(1000));
/// assert_eq!(result.line_item.amount.max, dec!(1400));
/// ```
pub fn calculate_volume_cost(
    volume_m3: Decimal,
    rate: &RateRange,
    step_number: u32,
) -> EngineResult<VolumeCostResult> {
    let amount = PriceRange::new(
        checked_mul("volume_m3", volume_m3, rate.min)?,
        checked_mul("volume_m3", volume_m3, rate.max)?,
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "volume_cost".to_string(),
        rule_name: "Volume Cost".to_string(),
        input: serde_json::json!({
            "volume_m3": volume_m3.normalize().to_string(),
            "rate_min": rate.min.normalize().to_string(),
            "rate_max": rate.max.normalize().to_string()
        }),
        output: serde_json::json!({
            "min": amount.min.normalize().to_string(),
            "max": amount.max.normalize().to_string()
        }),
        reasoning: format!(
            "{} m³ × [€{}, €{}] = [€{}, €{}]",
            volume_m3.normalize(),
            rate.min.normalize(),
            rate.max.normalize(),
            amount.min.normalize(),
            amount.max.normalize()
        ),
    };

    Ok(VolumeCostResult {
        line_item: LineItem {
            kind: LineItemKind::Volume,
            description: format!("Transport volume {} m³", volume_m3.normalize()),
            amount,
        },
        audit_step,
    })
}
