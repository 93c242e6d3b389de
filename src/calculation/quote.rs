//! Quote aggregation.
//!
//! This module is the engine's single entry point. [`quote`] validates its
//! inputs, runs the duration estimate, the line item rules and multiplier
//! resolution, then aggregates everything into the final net, VAT and gross
//! price range.
//!
//! The pipeline is a pure function of the move and the rate configuration:
//! no I/O, no shared state, and identical inputs give identical results.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RateConfiguration;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, MoveFacts, MultiplierSet, PriceBreakdown, PriceRange, QuoteResult,
};

use super::arithmetic::{checked_add_range, checked_scale};
use super::duration::calculate_duration;
use super::line_items::calculate_line_items;
use super::multipliers::resolve_multipliers;
use super::rounding::round_range;

/// The result of price aggregation.
#[derive(Debug, Clone)]
pub struct PriceAggregationResult {
    /// The final price breakdown.
    pub price: PriceBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Aggregates the line item total, the multipliers and VAT into final prices.
///
/// `net = total × regional × seasonal × weekend_holiday`,
/// `vat = net × vat_rate`, `gross = net + vat`. All three are computed at
/// full precision and rounded once to whole cents, half up.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidInput`] when the total is too
/// large to price.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::{DayCategory, aggregate_price};
/// use quote_engine::models::{MultiplierSet, PriceRange};
/// use rust_decimal_macros::dec;
///
/// let multipliers = MultiplierSet {
///     weekend_holiday: dec!(1.25),
///     day_category: DayCategory::Weekend,
///     ..MultiplierSet::neutral()
/// };
///
/// let result = aggregate_price(
///     PriceRange::new(dec!(1378), dec!(1894)),
///     &multipliers,
///     dec!(0.19),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.price.net, PriceRange::new(dec!(1722.50), dec!(2367.50)));
/// assert_eq!(result.price.vat, PriceRange::new(dec!(327.28), dec!(449.83)));
/// assert_eq!(result.price.gross, PriceRange::new(dec!(2049.78), dec!(2817.33)));
/// ```
pub fn aggregate_price(
    line_items_total: PriceRange,
    multipliers: &MultiplierSet,
    vat_rate: Decimal,
    step_number: u32,
) -> EngineResult<PriceAggregationResult> {
    let combined = multipliers.combined();
    let net = checked_scale("line_items", line_items_total, combined)?;
    let vat = checked_scale("line_items", net, vat_rate)?;
    let gross = checked_add_range("line_items", net, vat)?;

    let price = PriceBreakdown {
        line_items_total,
        combined_multiplier: combined,
        net: round_range(net),
        vat_rate,
        vat: round_range(vat),
        gross: round_range(gross),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "price_aggregation".to_string(),
        rule_name: "Price Aggregation".to_string(),
        input: serde_json::json!({
            "line_items_min": line_items_total.min.normalize().to_string(),
            "line_items_max": line_items_total.max.normalize().to_string(),
            "regional": multipliers.regional.normalize().to_string(),
            "seasonal": multipliers.seasonal.normalize().to_string(),
            "weekend_holiday": multipliers.weekend_holiday.normalize().to_string(),
            "vat_rate": vat_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "combined_multiplier": combined.normalize().to_string(),
            "net_min": price.net.min.to_string(),
            "net_max": price.net.max.to_string(),
            "vat_min": price.vat.min.to_string(),
            "vat_max": price.vat.max.to_string(),
            "gross_min": price.gross.min.to_string(),
            "gross_max": price.gross.max.to_string()
        }),
        reasoning: format!(
            "[€{}, €{}] × {} = net [€{}, €{}]; + {} VAT = gross [€{}, €{}]",
            line_items_total.min.normalize(),
            line_items_total.max.normalize(),
            combined.normalize(),
            price.net.min,
            price.net.max,
            vat_rate.normalize(),
            price.gross.min,
            price.gross.max
        ),
    };

    Ok(PriceAggregationResult { price, audit_step })
}

/// Calculates a complete quote for a move.
///
/// Runs the whole pipeline: input and configuration validation, duration,
/// line items, multipliers and price aggregation. The calculation either
/// fully succeeds or fails; no partial result is returned.
///
/// # Errors
///
/// - [`crate::error::EngineError::InvalidInput`] when a move fact violates
///   its invariant
/// - [`crate::error::EngineError::Configuration`] when the configuration is
///   inconsistent or lacks a price for a booked feature
///
/// # Example
///
/// ```no_run
/// use quote_engine::calculation::quote;
/// use quote_engine::config::ConfigLoader;
/// use quote_engine::models::MoveFacts;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
/// let config = loader.rate_configuration("default", date).unwrap();
///
/// let facts = MoveFacts {
///     volume_m3: dec!(40),
///     distance_km: dec!(50),
///     base_travel_hours: dec!(0.8),
///     move_date: Some(date),
///     ..MoveFacts::default()
/// };
///
/// let result = quote(&facts, config).unwrap();
/// assert_eq!(result.price.gross.min, dec!(2049.78));
/// ```
pub fn quote(facts: &MoveFacts, config: &RateConfiguration) -> EngineResult<QuoteResult> {
    facts.validate()?;
    config.validate()?;

    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();

    let duration = calculate_duration(facts, config.min_crew_size, 1)?;
    audit_steps.extend(duration.audit_steps);
    warnings.extend(duration.warnings);

    let line_items = calculate_line_items(
        facts,
        config,
        &duration.duration,
        audit_steps.len() as u32 + 1,
    )?;
    audit_steps.extend(line_items.audit_steps);
    warnings.extend(line_items.warnings);

    let multipliers = resolve_multipliers(
        facts.origin.postal_code.as_deref(),
        facts.destination.postal_code.as_deref(),
        facts.move_date,
        config,
        audit_steps.len() as u32 + 1,
    )?;
    audit_steps.extend(multipliers.audit_steps);

    let aggregation = aggregate_price(
        line_items.total,
        &multipliers.multipliers,
        config.vat_rate,
        audit_steps.len() as u32 + 1,
    )?;
    audit_steps.push(aggregation.audit_step);

    debug!(
        tenant = %config.tenant,
        config_version = %config.version,
        net_min = %aggregation.price.net.min,
        net_max = %aggregation.price.net.max,
        gross_min = %aggregation.price.gross.min,
        gross_max = %aggregation.price.gross.max,
        "Quote calculated"
    );

    Ok(QuoteResult {
        duration: duration.duration,
        line_items: line_items.line_items,
        multipliers: multipliers.multipliers,
        price: aggregation.price,
        audit_trace: AuditTrace {
            steps: audit_steps,
            warnings,
        },
    })
}
