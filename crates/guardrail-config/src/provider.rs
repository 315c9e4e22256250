//! Tenant configuration providers

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ConfigError, ConfigResult};
use crate::patch::TenantConfigPatch;
use crate::types::TenantConfig;

/// Source of tenant configuration. The engine reads through this trait
/// so deployments can back it with an external store; the in-memory
/// implementation covers single-instance deployments and tests.
#[async_trait]
pub trait TenantConfigProvider: Send + Sync {
    /// Fetch the configuration for a tenant
    async fn get_config(&self, tenant: &str) -> ConfigResult<TenantConfig>;

    /// Register or replace a tenant configuration
    async fn upsert_config(&self, config: TenantConfig) -> ConfigResult<()>;

    /// Merge a patch into the stored configuration and persist the result
    async fn update_config(
        &self,
        tenant: &str,
        patch: TenantConfigPatch,
    ) -> ConfigResult<TenantConfig>;

    /// All registered tenant ids
    async fn list_tenants(&self) -> ConfigResult<Vec<String>>;
}

/// In-memory provider backed by a `RwLock`ed map
pub struct InMemoryConfigStore {
    configs: RwLock<HashMap<String, TenantConfig>>,
}

impl InMemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-populated with the given configs
    pub fn with_configs(configs: impl IntoIterator<Item = TenantConfig>) -> ConfigResult<Self> {
        let mut map = HashMap::new();
        for config in configs {
            config.validate()?;
            map.insert(config.tenant_id.clone(), config);
        }
        Ok(Self {
            configs: RwLock::new(map),
        })
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantConfigProvider for InMemoryConfigStore {
    async fn get_config(&self, tenant: &str) -> ConfigResult<TenantConfig> {
        self.configs
            .read()
            .await
            .get(tenant)
            .cloned()
            .ok_or_else(|| ConfigError::TenantNotFound {
                tenant: tenant.to_string(),
            })
    }

    async fn upsert_config(&self, config: TenantConfig) -> ConfigResult<()> {
        config.validate()?;
        self.configs
            .write()
            .await
            .insert(config.tenant_id.clone(), config);
        Ok(())
    }

    async fn update_config(
        &self,
        tenant: &str,
        patch: TenantConfigPatch,
    ) -> ConfigResult<TenantConfig> {
        let mut configs = self.configs.write().await;
        let base = configs
            .get(tenant)
            .ok_or_else(|| ConfigError::TenantNotFound {
                tenant: tenant.to_string(),
            })?;
        let merged = patch.apply(base);
        merged.validate()?;
        configs.insert(tenant.to_string(), merged.clone());
        Ok(merged)
    }

    async fn list_tenants(&self) -> ConfigResult<Vec<String>> {
        let mut tenants: Vec<String> = self.configs.read().await.keys().cloned().collect();
        tenants.sort();
        Ok(tenants)
    }
}
