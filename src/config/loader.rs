//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading per-tenant rate
//! configurations from YAML files.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::RateConfiguration;

/// Loads and provides access to tenant rate configurations.
///
/// Every tenant owns a directory of versioned rate files. All files are read
/// and validated once at load time; lookups afterwards never touch the disk.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── tenants/
///     ├── default/
///     │   └── 2025-01-01.yaml   # Rates effective from this date
///     └── muenchen-umzuege/
///         ├── 2025-01-01.yaml
///         └── 2025-07-01.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use quote_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let rates = loader.rate_configuration("default", date).unwrap();
/// println!("Using rate version {}", rates.version);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configurations per tenant, sorted by effective date ascending.
    tenants: BTreeMap<String, Vec<RateConfiguration>>,
}

impl ConfigLoader {
    /// Loads every tenant below `<path>/tenants`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The tenants directory is missing or holds no tenant
    /// - A tenant directory holds no rate file
    /// - Any file contains invalid YAML or misses a core rate
    /// - A file's `tenant` field does not match its directory
    /// - Any configuration fails [`RateConfiguration::validate`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use quote_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// # Ok::<(), quote_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let tenants_dir = path.as_ref().join("tenants");
        let tenants_dir_str = tenants_dir.display().to_string();

        let entries = fs::read_dir(&tenants_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tenants_dir_str.clone(),
        })?;

        let mut tenants = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tenants_dir_str.clone(),
            })?;

            let tenant_dir = entry.path();
            if !tenant_dir.is_dir() {
                continue;
            }

            let tenant = entry.file_name().to_string_lossy().into_owned();
            let configurations = Self::load_tenant(&tenant, &tenant_dir)?;
            debug!(
                tenant = %tenant,
                versions = configurations.len(),
                "Loaded tenant rate configurations"
            );
            tenants.insert(tenant, configurations);
        }

        if tenants.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tenant directories found)", tenants_dir_str),
            });
        }

        info!(tenants = tenants.len(), "Rate configuration loaded");

        Ok(Self { tenants })
    }

    /// Builds a loader from configurations already in memory.
    ///
    /// Each configuration is validated and filed under its `tenant` field.
    pub fn from_configurations(
        configurations: impl IntoIterator<Item = RateConfiguration>,
    ) -> EngineResult<Self> {
        let mut tenants: BTreeMap<String, Vec<RateConfiguration>> = BTreeMap::new();

        for configuration in configurations {
            configuration.validate()?;
            tenants
                .entry(configuration.tenant.clone())
                .or_default()
                .push(configuration);
        }

        for configurations in tenants.values_mut() {
            configurations.sort_by_key(|c| c.effective_date);
        }

        Ok(Self { tenants })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files of a single tenant directory.
    fn load_tenant(tenant: &str, tenant_dir: &Path) -> EngineResult<Vec<RateConfiguration>> {
        let tenant_dir_str = tenant_dir.display().to_string();

        let entries = fs::read_dir(tenant_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tenant_dir_str.clone(),
        })?;

        let mut configurations = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tenant_dir_str.clone(),
            })?;

            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "yaml") {
                continue;
            }

            let configuration = Self::load_yaml::<RateConfiguration>(&path)?;
            if configuration.tenant != tenant {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!(
                        "file declares tenant '{}' but lives in directory '{}'",
                        configuration.tenant, tenant
                    ),
                });
            }
            configuration.validate()?;
            configurations.push(configuration);
        }

        if configurations.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", tenant_dir_str),
            });
        }

        configurations.sort_by_key(|c| c.effective_date);
        Ok(configurations)
    }

    /// Returns the identifiers of all loaded tenants, sorted.
    pub fn tenants(&self) -> impl Iterator<Item = &str> {
        self.tenants.keys().map(String::as_str)
    }

    /// Gets the rate configuration of a tenant effective on a given date.
    ///
    /// The most recent configuration whose `effective_date` is on or before
    /// `date` wins.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use quote_engine::config::ConfigLoader;
    /// use chrono::NaiveDate;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    /// let rates = loader.rate_configuration("default", date)?;
    /// println!("VAT: {}", rates.vat_rate);
    /// # Ok::<(), quote_engine::error::EngineError>(())
    /// ```
    pub fn rate_configuration(
        &self,
        tenant: &str,
        date: NaiveDate,
    ) -> EngineResult<&RateConfiguration> {
        let configurations =
            self.tenants
                .get(tenant)
                .ok_or_else(|| EngineError::TenantNotFound {
                    tenant: tenant.to_string(),
                })?;

        configurations
            .iter()
            .rev()
            .find(|c| c.effective_date <= date)
            .ok_or_else(|| EngineError::RateConfigurationNotFound {
                tenant: tenant.to_string(),
                date,
            })
    }

    /// Gets the newest rate configuration of a tenant, regardless of date.
    pub fn latest(&self, tenant: &str) -> EngineResult<&RateConfiguration> {
        self.tenants
            .get(tenant)
            .and_then(|configurations| configurations.last())
            .ok_or_else(|| EngineError::TenantNotFound {
                tenant: tenant.to_string(),
            })
    }
}
