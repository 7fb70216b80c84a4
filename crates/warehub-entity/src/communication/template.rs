//! Tenant-authored communication templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Delivery channel a template is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Email.
    Email,
    /// SMS.
    Sms,
    /// In-app notification.
    InApp,
}

impl Channel {
    /// Return the channel as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::InApp => "in_app",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subject/body template for one alert configuration and channel.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommunicationTemplate {
    /// Template identifier.
    pub id: Uuid,
    /// Owning alert configuration.
    pub alert_id: Uuid,
    /// Channel name (`email`, `sms`, `in_app`).
    pub channel: String,
    /// Subject template (email only).
    pub subject_template: Option<String>,
    /// Body template (HTML for email).
    pub body_template: String,
    /// Optional explicit plaintext template.
    pub body_text_template: Option<String>,
    /// Inactive templates are ignored.
    pub is_active: bool,
    /// When the template was last edited.
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommunicationTemplate {
    /// Whether this template can be used for rendering.
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.body_template.trim().is_empty()
    }
}
