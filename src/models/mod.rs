//! Core data models for the quote engine.
//!
//! This module contains all the domain models used throughout the engine.

mod move_facts;
mod price_range;
mod quote_result;

pub use move_facts::{
    HeavyItemType, InsuranceTier, InventoryItem, Leg, MoveFacts, Service, ServiceKind,
    is_valid_postal_code,
};
pub use price_range::PriceRange;
pub use quote_result::{
    AuditStep, AuditTrace, AuditWarning, DurationBreakdown, LineItem, LineItemKind, LineItems,
    MultiplierSet, PriceBreakdown, QuoteResult,
};
