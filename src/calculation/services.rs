//! Add-on service surcharges.
//!
//! This module prices the services a customer can book on top of the move:
//! no-parking-zone permit, kitchen assembly, external lift, packing
//! materials, disposal, long carry and insurance. Disassembly only adds labor
//! time (see the duration calculation) and produces no line of its own.
//!
//! Every service needs its price in the tenant configuration. A missing price
//! fails the quote; it is never treated as zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::arithmetic::{checked_add, checked_mul};
use crate::config::{InsuranceRates, ServiceRates};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, InsuranceTier, LineItem, LineItemKind, MoveFacts, PriceRange, Service,
};

/// Carry distance included in every move.
pub const LONG_CARRY_FREE_METERS: Decimal = dec!(10);

/// Length of one charged long-carry increment.
pub const LONG_CARRY_INCREMENT_METERS: Decimal = dec!(10);

/// The result of pricing all booked services.
#[derive(Debug, Clone)]
pub struct ServiceSurchargeResult {
    /// One line per priced service, in booking order.
    pub line_items: Vec<LineItem>,
    /// One audit step per priced service.
    pub audit_steps: Vec<AuditStep>,
}

/// Returns the number of charged long-carry increments.
///
/// The first 10 meters are free; every started 10 meters beyond are charged.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::long_carry_increments;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(long_carry_increments(dec!(10)), dec!(0));
/// assert_eq!(long_carry_increments(dec!(11)), dec!(1));
/// assert_eq!(long_carry_increments(dec!(20)), dec!(1));
/// assert_eq!(long_carry_increments(dec!(20.5)), dec!(2));
/// ```
pub fn long_carry_increments(distance_m: Decimal) -> Decimal {
    ((distance_m - LONG_CARRY_FREE_METERS) / LONG_CARRY_INCREMENT_METERS)
        .ceil()
        .max(Decimal::ZERO)
}

/// Prices the insurance product.
///
/// Basic cover is a flat fee. Premium cover is a percentage of the declared
/// value, but never less than the configured minimum.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when premium cover is requested
/// without a declared value, or with one too large to price.
pub fn insurance_price(
    tier: InsuranceTier,
    declared_value: Option<Decimal>,
    rates: &InsuranceRates,
) -> EngineResult<Decimal> {
    match tier {
        InsuranceTier::Basic => Ok(rates.basic_flat_fee),
        InsuranceTier::Premium => {
            let value = declared_value.ok_or_else(|| {
                EngineError::invalid_input(
                    "declared_value",
                    "premium insurance requires a declared value",
                )
            })?;
            let cover = checked_mul("declared_value", value, rates.premium_percent)?;
            Ok(cover.max(rates.premium_min))
        }
    }
}

/// A priced service before it is numbered into the audit trace.
struct PricedService {
    line_item: LineItem,
    rule_id: &'static str,
    rule_name: &'static str,
    input: serde_json::Value,
    reasoning: String,
}

/// Prices every booked service.
///
/// # Arguments
///
/// * `facts` - The move, providing the booked services, volume and declared value
/// * `rates` - The tenant's service prices
/// * `step_number` - The step number of the first audit step
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when a booked service has no
/// configured price, and [`EngineError::InvalidInput`] for premium insurance
/// without a declared value.
pub fn calculate_service_surcharges(
    facts: &MoveFacts,
    rates: &ServiceRates,
    step_number: u32,
) -> EngineResult<ServiceSurchargeResult> {
    let mut line_items = Vec::new();
    let mut audit_steps = Vec::new();

    for service in &facts.services {
        let Some(priced) = price_service(service, facts, rates)? else {
            continue;
        };

        debug!(
            service = priced.rule_id,
            min = %priced.line_item.amount.min,
            max = %priced.line_item.amount.max,
            "Service priced"
        );

        let amount = priced.line_item.amount;
        audit_steps.push(AuditStep {
            step_number: step_number + audit_steps.len() as u32,
            rule_id: priced.rule_id.to_string(),
            rule_name: priced.rule_name.to_string(),
            input: priced.input,
            output: serde_json::json!({
                "min": amount.min.normalize().to_string(),
                "max": amount.max.normalize().to_string()
            }),
            reasoning: priced.reasoning,
        });
        line_items.push(priced.line_item);
    }

    Ok(ServiceSurchargeResult {
        line_items,
        audit_steps,
    })
}

fn price_service(
    service: &Service,
    facts: &MoveFacts,
    rates: &ServiceRates,
) -> EngineResult<Option<PricedService>> {
    let priced = match service {
        Service::HvzPermit => {
            let fee = rates
                .hvz_permit
                .ok_or_else(|| EngineError::missing_rate("services.hvz_permit"))?;
            PricedService {
                line_item: LineItem {
                    kind: LineItemKind::HvzPermit,
                    description: "No-parking-zone permit (HVZ)".to_string(),
                    amount: PriceRange::fixed(fee),
                },
                rule_id: "hvz_permit",
                rule_name: "No-Parking-Zone Permit",
                input: serde_json::json!({ "fee": fee.normalize().to_string() }),
                reasoning: format!("Flat fee €{}", fee.normalize()),
            }
        }
        Service::KitchenAssembly { meters } => {
            let per_meter = rates.kitchen_assembly_per_meter.ok_or_else(|| {
                EngineError::missing_rate("services.kitchen_assembly_per_meter")
            })?;
            let amount = checked_mul("services.kitchen_assembly.meters", *meters, per_meter)?;
            PricedService {
                line_item: LineItem {
                    kind: LineItemKind::KitchenAssembly,
                    description: format!("Kitchen assembly {} m", meters.normalize()),
                    amount: PriceRange::fixed(amount),
                },
                rule_id: "kitchen_assembly",
                rule_name: "Kitchen Assembly",
                input: serde_json::json!({
                    "meters": meters.normalize().to_string(),
                    "per_meter": per_meter.normalize().to_string()
                }),
                reasoning: format!(
                    "{} m × €{} = €{}",
                    meters.normalize(),
                    per_meter.normalize(),
                    amount.normalize()
                ),
            }
        }
        Service::ExternalLift => {
            let lift = rates
                .external_lift
                .ok_or_else(|| EngineError::missing_rate("services.external_lift"))?;
            PricedService {
                line_item: LineItem {
                    kind: LineItemKind::ExternalLift,
                    description: "External furniture lift".to_string(),
                    amount: PriceRange::new(lift.min, lift.max),
                },
                rule_id: "external_lift",
                rule_name: "External Lift",
                input: serde_json::json!({
                    "min": lift.min.normalize().to_string(),
                    "max": lift.max.normalize().to_string()
                }),
                reasoning: format!(
                    "Configured range [€{}, €{}]",
                    lift.min.normalize(),
                    lift.max.normalize()
                ),
            }
        }
        Service::Packing => {
            let per_m3 = rates
                .packing_materials_per_m3
                .ok_or_else(|| EngineError::missing_rate("services.packing_materials_per_m3"))?;
            let amount = checked_mul("volume_m3", facts.volume_m3, per_m3)?;
            PricedService {
                line_item: LineItem {
                    kind: LineItemKind::PackingMaterials,
                    description: format!(
                        "Packing materials for {} m³",
                        facts.volume_m3.normalize()
                    ),
                    amount: PriceRange::fixed(amount),
                },
                rule_id: "packing_materials",
                rule_name: "Packing Materials",
                input: serde_json::json!({
                    "volume_m3": facts.volume_m3.normalize().to_string(),
                    "per_m3": per_m3.normalize().to_string()
                }),
                reasoning: format!(
                    "{} m³ × €{} = €{}",
                    facts.volume_m3.normalize(),
                    per_m3.normalize(),
                    amount.normalize()
                ),
            }
        }
        Service::Disassembly => return Ok(None),
        Service::Disposal { volume_m3 } => {
            let disposal = rates
                .disposal
                .as_ref()
                .ok_or_else(|| EngineError::missing_rate("services.disposal"))?;
            let field = "services.disposal.volume_m3";
            let amount = checked_add(
                field,
                disposal.base_fee,
                checked_mul(field, *volume_m3, disposal.per_m3)?,
            )?;
            PricedService {
                line_item: LineItem {
                    kind: LineItemKind::Disposal,
                    description: format!("Disposal of {} m³", volume_m3.normalize()),
                    amount: PriceRange::fixed(amount),
                },
                rule_id: "disposal",
                rule_name: "Disposal",
                input: serde_json::json!({
                    "volume_m3": volume_m3.normalize().to_string(),
                    "base_fee": disposal.base_fee.normalize().to_string(),
                    "per_m3": disposal.per_m3.normalize().to_string()
                }),
                reasoning: format!(
                    "€{} + {} m³ × €{} = €{}",
                    disposal.base_fee.normalize(),
                    volume_m3.normalize(),
                    disposal.per_m3.normalize(),
                    amount.normalize()
                ),
            }
        }
        Service::LongCarry { distance_m } => {
            let per_10m = rates
                .long_carry_per_10m
                .ok_or_else(|| EngineError::missing_rate("services.long_carry_per_10m"))?;
            let increments = long_carry_increments(*distance_m);
            let amount = checked_mul("services.long_carry.distance_m", increments, per_10m)?;
            PricedService {
                line_item: LineItem {
                    kind: LineItemKind::LongCarry,
                    description: format!("Long carry {} m", distance_m.normalize()),
                    amount: PriceRange::fixed(amount),
                },
                rule_id: "long_carry",
                rule_name: "Long Carry",
                input: serde_json::json!({
                    "distance_m": distance_m.normalize().to_string(),
                    "per_10m": per_10m.normalize().to_string()
                }),
                reasoning: format!(
                    "{} m with the first {} m free: {} started increments × €{} = €{}",
                    distance_m.normalize(),
                    LONG_CARRY_FREE_METERS.normalize(),
                    increments.normalize(),
                    per_10m.normalize(),
                    amount.normalize()
                ),
            }
        }
        Service::Insurance { tier } => {
            let insurance = rates
                .insurance
                .as_ref()
                .ok_or_else(|| EngineError::missing_rate("services.insurance"))?;
            let amount = insurance_price(*tier, facts.declared_value, insurance)?;
            let reasoning = match tier {
                InsuranceTier::Basic => format!("Basic cover flat fee €{}", amount.normalize()),
                InsuranceTier::Premium => format!(
                    "Premium cover: max(€{}, {} × {}) = €{}",
                    insurance.premium_min.normalize(),
                    facts.declared_value.unwrap_or_default().normalize(),
                    insurance.premium_percent.normalize(),
                    amount.normalize()
                ),
            };
            PricedService {
                line_item: LineItem {
                    kind: LineItemKind::Insurance,
                    description: match tier {
                        InsuranceTier::Basic => "Transport insurance (basic)".to_string(),
                        InsuranceTier::Premium => "Transport insurance (premium)".to_string(),
                    },
                    amount: PriceRange::fixed(amount),
                },
                rule_id: "insurance",
                rule_name: "Transport Insurance",
                input: serde_json::json!({
                    "tier": tier,
                    "declared_value": facts.declared_value.map(|v| v.normalize().to_string())
                }),
                reasoning,
            }
        }
    };

    Ok(Some(priced))
}
