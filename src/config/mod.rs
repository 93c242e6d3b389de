//! Rate configuration loading and management for the quote engine.
//!
//! This module loads versioned, per-tenant rate configurations from YAML
//! files and selects the one effective on a given date.
//!
//! # Example
//!
//! ```no_run
//! use quote_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! for tenant in loader.tenants() {
//!     println!("Loaded tenant: {}", tenant);
//! }
//! ```

mod loader;
mod types;

#[cfg(test)]
pub(crate) use types::fixtures;

pub use loader::ConfigLoader;
pub use types::{
    CalendarSurcharges, DisposalRates, DistanceRates, InsuranceRates, RateConfiguration,
    RateRange, RegionalMultiplier, RegionalPricing, SeasonalPricing, ServiceRates,
};
