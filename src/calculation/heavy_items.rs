//! Heavy-item detection and surcharges.
//!
//! Inventory lines are classified by keyword into a [`HeavyItemType`]. The
//! keyword table is ordered data: the first keyword found in an item's name
//! or category decides its type, and an item has at most one type.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::arithmetic::checked_mul;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, HeavyItemType, InventoryItem, LineItem, LineItemKind, PriceRange};

/// Lowercase keywords and the heavy-item type they signal, in precedence order.
pub const HEAVY_ITEM_KEYWORDS: &[(&str, HeavyItemType)] = &[
    ("klavier", HeavyItemType::Piano),
    ("flügel", HeavyItemType::Piano),
    ("piano", HeavyItemType::Piano),
    ("tresor", HeavyItemType::Safe),
    ("safe", HeavyItemType::Safe),
    ("aquarium", HeavyItemType::Aquarium),
    ("fitnessgerät", HeavyItemType::GymEquipment),
    ("fitness", HeavyItemType::GymEquipment),
    ("marmortisch", HeavyItemType::MarbleTable),
    ("marble", HeavyItemType::MarbleTable),
    ("antiquität", HeavyItemType::Antique),
    ("antique", HeavyItemType::Antique),
];

/// The result of heavy-item surcharge calculation.
#[derive(Debug, Clone)]
pub struct HeavyItemResult {
    /// One line per heavy inventory line.
    pub line_items: Vec<LineItem>,
    /// One audit step per heavy inventory line.
    pub audit_steps: Vec<AuditStep>,
}

/// Classifies an inventory line as a heavy item.
///
/// Matching is a case-insensitive substring search of the name and the
/// category. Keywords are tried in table order and the first hit wins.
///
/// # Example
///
/// ```
/// use quote_engine::calculation::classify_item;
/// use quote_engine::models::{HeavyItemType, InventoryItem};
/// use rust_decimal::Decimal;
///
/// let item = InventoryItem {
///     name: "Konzertflügel".to_string(),
///     category: None,
///     quantity: 1,
///     unit_volume_m3: Decimal::ZERO,
/// };
/// assert_eq!(classify_item(&item), Some(HeavyItemType::Piano));
/// ```
pub fn classify_item(item: &InventoryItem) -> Option<HeavyItemType> {
    let name = item.name.to_lowercase();
    let category = item.category.as_deref().map(str::to_lowercase);

    HEAVY_ITEM_KEYWORDS
        .iter()
        .find(|(keyword, _)| {
            name.contains(keyword)
                || category
                    .as_deref()
                    .is_some_and(|category| category.contains(keyword))
        })
        .map(|(_, item_type)| *item_type)
}

/// Adds `quantity × surcharge` for every heavy inventory line.
///
/// # Errors
///
/// Returns [`EngineError::Configuration`] when a detected heavy-item type has
/// no configured surcharge.
pub fn calculate_heavy_item_surcharges(
    inventory: &[InventoryItem],
    surcharges: &HashMap<HeavyItemType, Decimal>,
    step_number: u32,
) -> EngineResult<HeavyItemResult> {
    let mut line_items = Vec::new();
    let mut audit_steps = Vec::new();

    for item in inventory {
        if item.quantity == 0 {
            continue;
        }
        let Some(item_type) = classify_item(item) else {
            continue;
        };

        let per_item = surcharges.get(&item_type).copied().ok_or_else(|| {
            EngineError::missing_rate(format!("heavy_item_surcharges.{}", item_type.as_str()))
        })?;
        let quantity = Decimal::from(item.quantity);
        let amount = checked_mul("inventory.quantity", quantity, per_item)?;

        debug!(
            item = %item.name,
            item_type = item_type.as_str(),
            amount = %amount,
            "Heavy item detected"
        );

        audit_steps.push(AuditStep {
            step_number: step_number + audit_steps.len() as u32,
            rule_id: "heavy_item".to_string(),
            rule_name: "Heavy Item Surcharge".to_string(),
            input: serde_json::json!({
                "name": item.name,
                "category": item.category,
                "quantity": item.quantity
            }),
            output: serde_json::json!({
                "item_type": item_type,
                "per_item": per_item.normalize().to_string(),
                "amount": amount.normalize().to_string()
            }),
            reasoning: format!(
                "'{}' classified as {}: {} × €{} = €{}",
                item.name,
                item_type.as_str(),
                item.quantity,
                per_item.normalize(),
                amount.normalize()
            ),
        });
        line_items.push(LineItem {
            kind: LineItemKind::HeavyItem,
            description: format!("Heavy item: {} × {}", item.quantity, item.name),
            amount: PriceRange::fixed(amount),
        });
    }

    Ok(HeavyItemResult {
        line_items,
        audit_steps,
    })
}
