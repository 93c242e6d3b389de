//! Pricing and Duration Engine for Moving Jobs
//!
//! This crate turns a structured description of a move (volume, distance,
//! floors, services, inventory, date) and a tenant's rate configuration into
//! a labor-duration estimate and a min/max price range with VAT, together
//! with an audit trace of every rule that was applied.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
