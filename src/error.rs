//! Error types for the quote engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading rate configuration
//! or calculating a quote.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the quote engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use quote_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "volume_m3".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'volume_m3': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No rate configuration exists for the tenant.
    #[error("Tenant not found: {tenant}")]
    TenantNotFound {
        /// The tenant identifier that was not found.
        tenant: String,
    },

    /// The tenant has no rate configuration effective on the given date.
    #[error("No rate configuration for tenant '{tenant}' effective on {date}")]
    RateConfigurationNotFound {
        /// The tenant identifier.
        tenant: String,
        /// The date for which a configuration was requested.
        date: NaiveDate,
    },

    /// A move fact violates its stated invariant.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The rate configuration lacks a value required by a requested feature,
    /// or holds an inconsistent value.
    #[error("Configuration error in '{field}': {message}")]
    Configuration {
        /// The configuration field that is missing or inconsistent.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// An input the engine depends on could not be resolved by the caller.
    #[error("Unresolved dependency '{dependency}': {message}")]
    UnresolvedDependency {
        /// The name of the dependency (e.g. "distance").
        dependency: String,
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::Configuration`] reporting a missing rate.
    pub fn missing_rate(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::Configuration {
            message: format!("'{}' is required but not configured", field),
            field,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
