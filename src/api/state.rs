//! Application state for the quote engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;

use super::distance::{DistanceResolver, FallbackDistanceResolver};

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded tenant rate configurations and the distance resolver. Both are
/// read-only, so every request works on an immutable snapshot.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    distance_resolver: Arc<dyn DistanceResolver + Send + Sync>,
}

impl AppState {
    /// Creates a new application state using the fallback distance resolver.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_resolver(config, FallbackDistanceResolver)
    }

    /// Creates a new application state with a specific distance resolver.
    pub fn with_resolver<R>(config: ConfigLoader, resolver: R) -> Self
    where
        R: DistanceResolver + Send + Sync + 'static,
    {
        Self {
            config: Arc::new(config),
            distance_resolver: Arc::new(resolver),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the distance resolver.
    pub fn distance_resolver(&self) -> &(dyn DistanceResolver + Send + Sync) {
        self.distance_resolver.as_ref()
    }
}
