//! Alert queue entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::AlertStatus;
use crate::record::EntityRef;

/// A queued alert awaiting dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Trigger key (e.g. `"task_overdue"`).
    pub alert_type: String,
    /// Entity type of the referenced business record.
    pub entity_type: Option<String>,
    /// Identifier of the referenced business record.
    pub entity_id: Option<Uuid>,
    /// Explicit recipients attached by the producer.
    pub recipient_emails: Option<Vec<String>>,
    /// Pre-rendered subject.
    pub subject: Option<String>,
    /// Pre-rendered HTML body.
    pub body_html: Option<String>,
    /// Pre-rendered plaintext body.
    pub body_text: Option<String>,
    /// Current lifecycle status.
    #[sqlx(try_from = "String")]
    pub status: AlertStatus,
    /// Diagnostic message for failed or skipped alerts.
    pub error_message: Option<String>,
    /// When the email was accepted by the provider.
    pub sent_at: Option<DateTime<Utc>>,
    /// When the alert was queued.
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Resolve the polymorphic entity reference, if it names a known kind.
    pub fn entity(&self) -> Option<EntityRef> {
        match (self.entity_type.as_deref(), self.entity_id) {
            (Some(kind), Some(id)) => EntityRef::parse(kind, id),
            _ => None,
        }
    }

    /// Explicit recipients, or an empty slice.
    pub fn explicit_recipients(&self) -> &[String] {
        self.recipient_emails.as_deref().unwrap_or(&[])
    }

    /// Pre-rendered subject and HTML body, when both are present.
    pub fn prerendered(&self) -> Option<(&str, &str)> {
        match (self.subject.as_deref(), self.body_html.as_deref()) {
            (Some(subject), Some(html)) if !subject.trim().is_empty() && !html.trim().is_empty() => {
                Some((subject, html))
            }
            _ => None,
        }
    }
}

/// Filter applied when pulling a batch from the queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertQueueFilter {
    /// Restrict to a single tenant.
    pub tenant_id: Option<Uuid>,
    /// Restrict to a single alert.
    pub alert_id: Option<Uuid>,
    /// Maximum number of alerts to fetch.
    pub limit: u32,
}

/// Content recorded on an alert once it has been sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveredContent {
    /// Rendered subject.
    pub subject: String,
    /// Rendered HTML body.
    pub body_html: String,
    /// Rendered plaintext body.
    pub body_text: String,
    /// Addresses the email was sent to.
    pub recipients: Vec<String>,
    /// Provider message identifier.
    pub provider_message_id: Option<String>,
    /// When the provider accepted the email.
    pub sent_at: DateTime<Utc>,
}
