//! Per-tenant communication alert configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// Channel toggles for one trigger.
///
/// Stored as JSON. Missing keys default to enabled so that a partially
/// written row never silently disables delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelToggles {
    /// Deliver by email.
    #[serde(default = "default_true")]
    pub email: bool,
    /// Create in-app notifications.
    #[serde(default = "default_true")]
    pub in_app: bool,
    /// Deliver by SMS.
    #[serde(default)]
    pub sms: bool,
}

impl Default for ChannelToggles {
    fn default() -> Self {
        Self {
            email: true,
            in_app: true,
            sms: false,
        }
    }
}

/// A tenant's configuration for a single trigger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommunicationAlert {
    /// Configuration identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Trigger key.
    pub trigger_event: String,
    /// Master enable switch.
    pub is_enabled: bool,
    /// Channel toggles.
    pub channels: Json<ChannelToggles>,
    /// Per-trigger recipient override.
    pub recipient_emails: Option<Vec<String>>,
    /// When the row was last changed.
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommunicationAlert {
    /// Reason the email channel must not be used, if any.
    pub fn email_block_reason(&self) -> Option<String> {
        if !self.is_enabled {
            Some(format!("Alert '{}' is disabled for this tenant", self.trigger_event))
        } else if !self.channels.email {
            Some(format!(
                "Email channel is disabled for alert '{}'",
                self.trigger_event
            ))
        } else {
            None
        }
    }

    /// Override recipients, or an empty slice.
    pub fn override_recipients(&self) -> &[String] {
        self.recipient_emails.as_deref().unwrap_or(&[])
    }
}

fn default_true() -> bool {
    true
}
