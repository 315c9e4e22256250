//! Loading tenant configuration from disk and the environment

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigResult;
use crate::provider::InMemoryConfigStore;
use crate::types::TenantConfig;

/// On-disk shape of a tenants file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TenantsFile {
    #[serde(default)]
    tenants: Vec<TenantConfig>,
}

/// Loads tenant configurations from a TOML file layered with
/// environment overrides (prefix `GUARDRAIL`, e.g.
/// `GUARDRAIL_TENANTS...`). The file is optional; an absent file yields
/// an empty store.
pub struct ConfigLoader {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a loader for the given tenants file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: "GUARDRAIL".to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate all tenant configurations into a store
    pub fn load(&self) -> ConfigResult<InMemoryConfigStore> {
        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).separator("__"));

        let raw = builder.build()?;
        let file: TenantsFile = raw.try_deserialize()?;
        debug!(
            tenants = file.tenants.len(),
            path = %self.config_path.display(),
            "loaded tenant configurations"
        );
        InMemoryConfigStore::with_configs(file.tenants)
    }

    /// Write the given configurations back to the tenants file as TOML
    pub fn save(&self, tenants: &[TenantConfig]) -> ConfigResult<()> {
        let file = TenantsFile {
            tenants: tenants.to_vec(),
        };
        let rendered = toml::to_string_pretty(&file)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, rendered)?;
        Ok(())
    }
}
