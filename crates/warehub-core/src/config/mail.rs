//! Outbound email provider configuration.

use serde::{Deserialize, Serialize};

/// Email provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Provider name: `"resend"` or `"disabled"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Provider API key. An empty key leaves the provider unconfigured and
    /// every send fails with a configuration message.
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the provider API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// From-address used when the tenant has no verified sending domain.
    #[serde(default = "default_from_email")]
    pub default_from_email: String,
    /// Display name used when the tenant has neither a company name nor a sender name.
    #[serde(default = "default_from_name")]
    pub default_from_name: String,
    /// Request timeout for provider calls in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            default_from_email: default_from_email(),
            default_from_name: default_from_name(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "resend".to_string()
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from_email() -> String {
    "alerts@notifications.warehub.app".to_string()
}

fn default_from_name() -> String {
    "Warehub".to_string()
}

fn default_timeout() -> u64 {
    15
}
