//! Multiplier resolution.
//!
//! This module resolves the three multiplicative price adjustments of a move
//! before aggregation:
//!
//! - **Regional**: the more expensive of the two addresses' postal regions
//! - **Seasonal**: peak or off-peak month of the move date
//! - **Weekend/holiday**: a listed public holiday, else a weekend day
//!
//! Each factor is exactly 1 when its feature is disabled or does not apply,
//! so the aggregation step never branches on feature flags.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{CalendarSurcharges, RateConfiguration, RegionalPricing, SeasonalPricing};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, MultiplierSet};

use super::calendar::{DayCategory, day_category, german_holiday};

/// The result of multiplier resolution.
#[derive(Debug, Clone)]
pub struct MultiplierResult {
    /// The resolved factors.
    pub multipliers: MultiplierSet,
    /// Audit steps for the regional, seasonal and calendar factors, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// A postal code matched against the regional table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalMatch {
    /// The matched region.
    pub region: String,
    /// The prefix that matched.
    pub prefix: String,
    /// The region's multiplier.
    pub multiplier: Decimal,
}

/// Looks up the region of a postal code.
///
/// The longest matching prefix wins; between equally long prefixes the
/// region listed first wins.
pub fn match_region(postal_code: &str, regional: &RegionalPricing) -> Option<RegionalMatch> {
    let mut best: Option<RegionalMatch> = None;

    for region in &regional.regions {
        for prefix in &region.prefixes {
            if !postal_code.starts_with(prefix.as_str()) {
                continue;
            }
            let longer = best
                .as_ref()
                .is_none_or(|current| prefix.len() > current.prefix.len());
            if longer {
                best = Some(RegionalMatch {
                    region: region.region.clone(),
                    prefix: prefix.clone(),
                    multiplier: region.multiplier,
                });
            }
        }
    }

    best
}

/// Returns the regional factor for a move between two postal codes.
///
/// The larger of the two matches applies; unmatched or absent codes count
/// as 1. Always 1 when regional pricing is disabled.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::regional_multiplier;
/// use quote_engine::config::{RegionalMultiplier, RegionalPricing};
/// use rust_decimal_macros::dec;
///
/// let regional = RegionalPricing {
///     enabled: true,
///     regions: vec![
///         RegionalMultiplier {
///             region: "munich".to_string(),
///             prefixes: vec!["80".to_string()],
///             multiplier: dec!(1.15),
///         },
///         RegionalMultiplier {
///             region: "berlin".to_string(),
///             prefixes: vec!["10".to_string()],
///             multiplier: dec!(1.08),
///         },
///     ],
/// };
///
/// assert_eq!(regional_multiplier(Some("10115"), Some("80331"), &regional), dec!(1.15));
/// assert_eq!(regional_multiplier(Some("10115"), Some("01067"), &regional), dec!(1.08));
/// assert_eq!(regional_multiplier(None, Some("34117"), &regional), dec!(1));
/// ```
pub fn regional_multiplier(
    origin_postal_code: Option<&str>,
    destination_postal_code: Option<&str>,
    regional: &RegionalPricing,
) -> Decimal {
    if !regional.enabled {
        return Decimal::ONE;
    }

    [origin_postal_code, destination_postal_code]
        .into_iter()
        .flatten()
        .filter_map(|code| match_region(code, regional))
        .map(|m| m.multiplier)
        .fold(Decimal::ONE, Decimal::max)
}

/// Returns the seasonal factor of a move date.
///
/// Peak months take precedence over off-peak months. Always 1 when seasonal
/// pricing is disabled or no date is known.
pub fn seasonal_multiplier(move_date: Option<NaiveDate>, seasonal: &SeasonalPricing) -> Decimal {
    if !seasonal.enabled {
        return Decimal::ONE;
    }
    let Some(date) = move_date else {
        return Decimal::ONE;
    };

    let month = date.month();
    if seasonal.peak_months.contains(&month) {
        seasonal.peak_multiplier
    } else if seasonal.offpeak_months.contains(&month) {
        seasonal.offpeak_multiplier
    } else {
        Decimal::ONE
    }
}

/// Returns the weekend/holiday factor of a move date and its category.
///
/// A holiday uses `1 + holiday_percent`, a weekend day `1 + weekend_percent`;
/// the two never combine.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when the date falls into a category
/// whose surcharge is not configured.
pub fn calendar_multiplier(
    move_date: Option<NaiveDate>,
    calendar: &CalendarSurcharges,
) -> EngineResult<(Decimal, DayCategory)> {
    let Some(date) = move_date else {
        return Ok((Decimal::ONE, DayCategory::Weekday));
    };

    let category = day_category(date);
    let percent = match category {
        DayCategory::Weekday => return Ok((Decimal::ONE, category)),
        DayCategory::Weekend => calendar
            .weekend_percent
            .ok_or_else(|| EngineError::missing_rate("calendar.weekend_percent"))?,
        DayCategory::Holiday => calendar
            .holiday_percent
            .ok_or_else(|| EngineError::missing_rate("calendar.holiday_percent"))?,
    };

    Ok((Decimal::ONE + percent, category))
}

/// Resolves all multipliers of a move.
///
/// # Arguments
///
/// * `origin_postal_code` - Postal code of the pickup address
/// * `destination_postal_code` - Postal code of the delivery address
/// * `move_date` - The moving day, if known
/// * `config` - The tenant's rate configuration with the feature flags
/// * `step_number` - The step number of the first audit step
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when regional or seasonal pricing
/// is enabled with an empty table, or a needed calendar surcharge is missing.
pub fn resolve_multipliers(
    origin_postal_code: Option<&str>,
    destination_postal_code: Option<&str>,
    move_date: Option<NaiveDate>,
    config: &RateConfiguration,
    step_number: u32,
) -> EngineResult<MultiplierResult> {
    config.regional.check_enabled_table()?;
    config.seasonal.check_enabled_table()?;

    let regional = regional_multiplier(
        origin_postal_code,
        destination_postal_code,
        &config.regional,
    );
    let lookup = |code: Option<&str>| {
        code.filter(|_| config.regional.enabled)
            .and_then(|code| match_region(code, &config.regional))
    };
    let origin_region = lookup(origin_postal_code);
    let destination_region = lookup(destination_postal_code);

    let seasonal = seasonal_multiplier(move_date, &config.seasonal);
    let (weekend_holiday, category) = calendar_multiplier(move_date, &config.calendar)?;

    debug!(
        regional = %regional,
        seasonal = %seasonal,
        weekend_holiday = %weekend_holiday,
        day_category = %category,
        "Multipliers resolved"
    );

    let regional_step = AuditStep {
        step_number,
        rule_id: "regional_multiplier".to_string(),
        rule_name: "Regional Multiplier".to_string(),
        input: serde_json::json!({
            "enabled": config.regional.enabled,
            "origin_postal_code": origin_postal_code,
            "destination_postal_code": destination_postal_code
        }),
        output: serde_json::json!({
            "origin_region": origin_region.as_ref().map(|m| m.region.as_str()),
            "destination_region": destination_region.as_ref().map(|m| m.region.as_str()),
            "multiplier": regional.normalize().to_string()
        }),
        reasoning: if config.regional.enabled {
            format!(
                "Higher of origin ({}) and destination ({}) region: {}",
                origin_region
                    .as_ref()
                    .map_or("no match", |m| m.region.as_str()),
                destination_region
                    .as_ref()
                    .map_or("no match", |m| m.region.as_str()),
                regional.normalize()
            )
        } else {
            "Regional pricing disabled".to_string()
        },
    };

    let seasonal_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "seasonal_multiplier".to_string(),
        rule_name: "Seasonal Multiplier".to_string(),
        input: serde_json::json!({
            "enabled": config.seasonal.enabled,
            "month": move_date.map(|d| d.month())
        }),
        output: serde_json::json!({
            "multiplier": seasonal.normalize().to_string()
        }),
        reasoning: match (config.seasonal.enabled, move_date) {
            (false, _) => "Seasonal pricing disabled".to_string(),
            (true, None) => "No move date; no seasonal adjustment".to_string(),
            (true, Some(date)) => format!("Month {}: {}", date.month(), seasonal.normalize()),
        },
    };

    let calendar_step = AuditStep {
        step_number: step_number + 2,
        rule_id: "weekend_holiday_multiplier".to_string(),
        rule_name: "Weekend/Holiday Multiplier".to_string(),
        input: serde_json::json!({
            "move_date": move_date.map(|d| d.to_string())
        }),
        output: serde_json::json!({
            "day_category": category,
            "multiplier": weekend_holiday.normalize().to_string()
        }),
        reasoning: match (category, move_date.and_then(german_holiday)) {
            (DayCategory::Holiday, Some(name)) => format!(
                "{} is a public holiday; holiday surcharge applies instead of any weekend surcharge: {}",
                name,
                weekend_holiday.normalize()
            ),
            (DayCategory::Weekend, _) => {
                format!("Weekend move: {}", weekend_holiday.normalize())
            }
            _ => "Ordinary weekday; no surcharge".to_string(),
        },
    };

    Ok(MultiplierResult {
        multipliers: MultiplierSet {
            regional,
            seasonal,
            weekend_holiday,
            day_category: category,
        },
        audit_steps: vec![regional_step, seasonal_step, calendar_step],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_rate_configuration;
    use crate::config::RegionalMultiplier;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn enabled_regional() -> RegionalPricing {
        let mut regional = test_rate_configuration().regional;
        regional.enabled = true;
        regional
    }

    // ==========================================================================
    // MUL-001: regional
    // ==========================================================================

    #[test]
    fn test_mul_001_disabled_regional_is_neutral() {
        let regional = test_rate_configuration().regional;
        assert_eq!(
            regional_multiplier(Some("80331"), Some("80331"), &regional),
            dec("1")
        );
    }

    #[test]
    fn test_mul_001_more_expensive_address_wins() {
        let regional = enabled_regional();
        assert_eq!(
            regional_multiplier(Some("10115"), Some("81669"), &regional),
            dec("1.15")
        );
        assert_eq!(
            regional_multiplier(Some("81669"), Some("10115"), &regional),
            dec("1.15")
        );
    }

    #[test]
    fn test_mul_001_unmatched_prefix_is_neutral() {
        let regional = enabled_regional();
        assert_eq!(
            regional_multiplier(Some("34117"), Some("01067"), &regional),
            dec("1")
        );
    }

    #[test]
    fn test_mul_001_longest_prefix_wins() {
        let mut regional = enabled_regional();
        regional.regions.push(RegionalMultiplier {
            region: "munich_center".to_string(),
            prefixes: vec!["803".to_string()],
            multiplier: dec("1.2"),
        });

        let matched = match_region("80331", &regional).unwrap();
        assert_eq!(matched.region, "munich_center");
        assert_eq!(matched.prefix, "803");

        let matched = match_region("80999", &regional).unwrap();
        assert_eq!(matched.region, "munich");
    }

    // ==========================================================================
    // MUL-002: seasonal
    // ==========================================================================

    #[test]
    fn test_mul_002_peak_offpeak_and_standard_months() {
        let seasonal = SeasonalPricing {
            enabled: true,
            offpeak_multiplier: dec("0.95"),
            ..SeasonalPricing::default()
        };

        assert_eq!(seasonal_multiplier(Some(date(2025, 7, 15)), &seasonal), dec("1.15"));
        assert_eq!(seasonal_multiplier(Some(date(2025, 1, 15)), &seasonal), dec("0.95"));
        assert_eq!(seasonal_multiplier(Some(date(2025, 3, 12)), &seasonal), dec("1"));
    }

    #[test]
    fn test_mul_002_disabled_or_undated_is_neutral() {
        let seasonal = SeasonalPricing::default();
        assert_eq!(seasonal_multiplier(Some(date(2025, 7, 15)), &seasonal), dec("1"));

        let enabled = SeasonalPricing {
            enabled: true,
            ..SeasonalPricing::default()
        };
        assert_eq!(seasonal_multiplier(None, &enabled), dec("1"));
    }

    // ==========================================================================
    // MUL-003: weekend and holiday
    // ==========================================================================

    #[test]
    fn test_mul_003_weekend_surcharge() {
        let calendar = test_rate_configuration().calendar;
        let (factor, category) = calendar_multiplier(Some(date(2025, 6, 14)), &calendar).unwrap();
        assert_eq!(factor, dec("1.25"));
        assert_eq!(category, DayCategory::Weekend);
    }

    #[test]
    fn test_mul_003_holiday_on_sunday_applies_holiday_only() {
        let calendar = test_rate_configuration().calendar;
        let (factor, category) = calendar_multiplier(Some(date(2022, 12, 25)), &calendar).unwrap();
        assert_eq!(factor, dec("1.5"));
        assert_eq!(category, DayCategory::Holiday);
        assert_ne!(factor, dec("1.25") * dec("1.5"));
    }

    #[test]
    fn test_mul_003_holiday_wins_even_when_cheaper() {
        let calendar = CalendarSurcharges {
            weekend_percent: Some(dec("0.25")),
            holiday_percent: Some(dec("0.10")),
        };
        let (factor, _) = calendar_multiplier(Some(date(2026, 10, 3)), &calendar).unwrap();
        assert_eq!(factor, dec("1.10"));
    }

    #[test]
    fn test_mul_003_weekday_and_undated_are_neutral() {
        let calendar = test_rate_configuration().calendar;
        assert_eq!(
            calendar_multiplier(Some(date(2025, 7, 15)), &calendar).unwrap(),
            (dec("1"), DayCategory::Weekday)
        );
        assert_eq!(
            calendar_multiplier(None, &calendar).unwrap(),
            (dec("1"), DayCategory::Weekday)
        );
    }

    #[test]
    fn test_mul_003_missing_weekend_percent_fails_on_weekend_only() {
        let calendar = CalendarSurcharges::default();

        assert!(calendar_multiplier(Some(date(2025, 7, 15)), &calendar).is_ok());
        match calendar_multiplier(Some(date(2025, 6, 14)), &calendar) {
            Err(EngineError::Configuration { field, .. }) => {
                assert_eq!(field, "calendar.weekend_percent")
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    // ==========================================================================
    // MUL-004: full resolution
    // ==========================================================================

    #[test]
    fn test_mul_004_resolve_all_enabled() {
        let mut config = test_rate_configuration();
        config.regional.enabled = true;
        config.seasonal.enabled = true;

        // Saturday in August, Berlin to Munich
        let result =
            resolve_multipliers(Some("10115"), Some("80331"), Some(date(2025, 8, 2)), &config, 9)
                .unwrap();

        let set = &result.multipliers;
        assert_eq!(set.regional, dec("1.15"));
        assert_eq!(set.seasonal, dec("1.15"));
        assert_eq!(set.weekend_holiday, dec("1.25"));
        assert_eq!(set.day_category, DayCategory::Weekend);
        assert_eq!(set.combined(), dec("1.653125"));

        assert_eq!(result.audit_steps.len(), 3);
        assert_eq!(result.audit_steps[0].step_number, 9);
        assert_eq!(result.audit_steps[0].output["destination_region"], "munich");
        assert_eq!(result.audit_steps[2].output["day_category"], "weekend");
    }

    #[test]
    fn test_mul_004_resolve_all_disabled_is_neutral() {
        let config = test_rate_configuration();
        let result =
            resolve_multipliers(Some("10115"), Some("80331"), Some(date(2025, 7, 15)), &config, 1)
                .unwrap();
        assert_eq!(result.multipliers, MultiplierSet::neutral());
    }

    #[test]
    fn test_mul_004_enabled_regional_without_regions_fails() {
        let mut config = test_rate_configuration();
        config.regional.enabled = true;
        config.regional.regions.clear();

        match resolve_multipliers(Some("80331"), None, Some(date(2025, 7, 15)), &config, 1) {
            Err(EngineError::Configuration { field, .. }) => {
                assert_eq!(field, "regional.regions")
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }
}
