//! Client account entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A client account (the owner of stored goods).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Account identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Account display name.
    pub account_name: String,
    /// Short account code.
    pub account_code: Option<String>,
    /// Primary contact name.
    pub primary_contact_name: Option<String>,
    /// Primary contact email.
    pub primary_contact_email: Option<String>,
    /// Address that receives client alerts.
    pub alerts_contact_email: Option<String>,
    /// Name of the alerts contact.
    pub alerts_contact_name: Option<String>,
    /// Comma-separated additional alert recipients.
    pub additional_alert_emails: Option<String>,
}

/// Read-through projection of an entity's owning account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    /// Account identifier.
    pub account_id: Uuid,
    /// Account display name.
    pub account_name: String,
}
