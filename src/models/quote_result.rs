//! Quote result models.
//!
//! This module contains the [`QuoteResult`] type and its associated structures
//! that capture all outputs of a quote calculation: the duration estimate, the
//! individual cost lines, the resolved multipliers, the final price and an
//! audit trace of every rule decision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DayCategory;

use super::PriceRange;

/// Labor-duration estimate for a move.
///
/// Invariants: `total_hours == loading_hours + travel_hours` and
/// `loading_hours == man_hours / crew_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBreakdown {
    /// Total effort across the whole crew, never below the configured floor.
    pub man_hours: Decimal,
    /// Number of movers assigned.
    pub crew_size: u32,
    /// Clock time spent loading and unloading.
    pub loading_hours: Decimal,
    /// Truck travel time including any mandatory break.
    pub travel_hours: Decimal,
    /// Whether a mandatory driver break was added to the travel time.
    pub mandatory_break: bool,
    /// Total clock duration of the job.
    pub total_hours: Decimal,
}

/// Identifies what a cost line charges for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    /// Volume-based transport cost.
    Volume,
    /// Tiered distance cost.
    Distance,
    /// Labor cost from man-hours.
    Labor,
    /// Surcharge for stairs above the 2nd floor.
    FloorSurcharge,
    /// No-parking-zone permit.
    HvzPermit,
    /// Kitchen assembly per meter.
    KitchenAssembly,
    /// External furniture lift.
    ExternalLift,
    /// Packing materials per cubic meter.
    PackingMaterials,
    /// Disposal base fee plus per cubic meter.
    Disposal,
    /// Long carry per started 10 meters beyond the free zone.
    LongCarry,
    /// Transport insurance.
    Insurance,
    /// Special-handling surcharge for one heavy inventory line.
    HeavyItem,
}

/// A single named cost line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What the line charges for.
    pub kind: LineItemKind,
    /// Human-readable description shown on the quote.
    pub description: String,
    /// The `[min, max]` amount at full precision.
    pub amount: PriceRange,
}

/// All cost lines of a quote, in pipeline order.
///
/// # Example
///
/// ```
/// use quote_engine::models::{LineItem, LineItemKind, LineItems, PriceRange};
/// use rust_decimal_macros::dec;
///
/// let items = LineItems::new(vec![
///     LineItem {
///         kind: LineItemKind::Volume,
///         description: "Volume".to_string(),
///         amount: PriceRange::new(dec!(1000), dec!(1400)),
///     },
///     LineItem {
///         kind: LineItemKind::HvzPermit,
///         description: "HVZ".to_string(),
///         amount: PriceRange::fixed(dec!(120)),
///     },
/// ]);
/// assert_eq!(items.total(), PriceRange::new(dec!(1120), dec!(1520)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItems {
    items: Vec<LineItem>,
}

impl LineItems {
    /// Wraps the given lines.
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Returns all lines in order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the first line of the given kind.
    pub fn get(&self, kind: LineItemKind) -> Option<&LineItem> {
        self.items.iter().find(|item| item.kind == kind)
    }

    /// Sums all lines of the given kind.
    pub fn total_for(&self, kind: LineItemKind) -> PriceRange {
        self.items
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.amount)
            .sum()
    }

    /// Sums every line, bound by bound.
    pub fn total(&self) -> PriceRange {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when there are no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Multiplicative adjustments resolved for a move.
///
/// Each factor is exactly `1` when its feature is disabled or does not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierSet {
    /// Factor from the more expensive of the two postal regions.
    pub regional: Decimal,
    /// Factor from the move month.
    pub seasonal: Decimal,
    /// Factor from a weekend or public holiday, never both.
    pub weekend_holiday: Decimal,
    /// Which calendar rule produced `weekend_holiday`.
    pub day_category: DayCategory,
}

impl MultiplierSet {
    /// The set where nothing applies.
    pub fn neutral() -> Self {
        Self {
            regional: Decimal::ONE,
            seasonal: Decimal::ONE,
            weekend_holiday: Decimal::ONE,
            day_category: DayCategory::Weekday,
        }
    }

    /// Product of all factors.
    pub fn combined(&self) -> Decimal {
        self.regional * self.seasonal * self.weekend_holiday
    }
}

/// Final prices of a quote.
///
/// `line_items_total` is kept at full precision; `net`, `vat` and `gross`
/// are each rounded once to whole cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Sum of all line items before multipliers.
    pub line_items_total: PriceRange,
    /// Product of all multipliers applied to `line_items_total`.
    pub combined_multiplier: Decimal,
    /// Net price (before VAT).
    pub net: PriceRange,
    /// The VAT rate applied.
    pub vat_rate: Decimal,
    /// VAT amount.
    pub vat: PriceRange,
    /// Gross price (including VAT).
    pub gross: PriceRange,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag conditions that don't prevent a quote but deserve a
/// second look by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a quote calculation.
///
/// Produced fresh by [`crate::calculation::quote`]; identical inputs always
/// yield an identical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Labor-duration estimate.
    pub duration: DurationBreakdown,
    /// Individual cost lines.
    pub line_items: LineItems,
    /// Resolved multipliers.
    pub multipliers: MultiplierSet,
    /// Final prices.
    pub price: PriceBreakdown,
    /// Every rule decision, in pipeline order.
    pub audit_trace: AuditTrace,
}
