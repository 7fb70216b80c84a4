//! Alert dispatch configuration.

use serde::{Deserialize, Serialize};

/// Settings for the alert dispatch pipeline and its scheduled runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Alerts fetched per batch when the caller does not pass a limit.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u32,
    /// Upper bound for a caller-supplied limit.
    #[serde(default = "default_max_batch_limit")]
    pub max_batch_limit: u32,
    /// Roles whose holders receive internal alerts when no other
    /// recipient source is configured.
    #[serde(default = "default_internal_roles")]
    pub internal_roles: Vec<String>,
    /// Portal URL used for links when the tenant has none configured.
    #[serde(default = "default_portal_base_url")]
    pub portal_base_url: String,
    /// Trigger catalog cache TTL in seconds.
    #[serde(default = "default_catalog_ttl")]
    pub catalog_cache_ttl_seconds: u64,
    /// Whether the cron runner is started with the server.
    #[serde(default = "default_true")]
    pub scheduler_enabled: bool,
    /// Six-field cron expression for the runner.
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_limit: default_batch_limit(),
            max_batch_limit: default_max_batch_limit(),
            internal_roles: default_internal_roles(),
            portal_base_url: default_portal_base_url(),
            catalog_cache_ttl_seconds: default_catalog_ttl(),
            scheduler_enabled: default_true(),
            schedule: default_schedule(),
        }
    }
}

impl DispatchConfig {
    /// Clamp a caller-supplied limit into `1..=max_batch_limit`.
    pub fn effective_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.batch_limit)
            .clamp(1, self.max_batch_limit.max(1))
    }
}

fn default_batch_limit() -> u32 {
    50
}

fn default_max_batch_limit() -> u32 {
    500
}

fn default_internal_roles() -> Vec<String> {
    vec![
        "admin".to_string(),
        "manager".to_string(),
        "tenant_admin".to_string(),
    ]
}

fn default_portal_base_url() -> String {
    "https://app.warehub.app".to_string()
}

fn default_catalog_ttl() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    "0 * * * * *".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit() {
        let config = DispatchConfig::default();
        assert_eq!(config.effective_limit(None), 50);
        assert_eq!(config.effective_limit(Some(10)), 10);
        assert_eq!(config.effective_limit(Some(0)), 1);
        assert_eq!(config.effective_limit(Some(10_000)), 500);
    }
}
