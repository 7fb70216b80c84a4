//! Release order record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A release of items to a client, carrier, or third party.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Release {
    /// Release identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Human-readable number.
    pub release_number: String,
    /// Owning account.
    pub account_id: Option<Uuid>,
    /// Workflow status.
    pub status: Option<String>,
    /// `will_call` or `delivery`.
    pub release_type: Option<String>,
    /// Party the items are released to.
    pub release_to_name: Option<String>,
    /// Scheduled pickup or delivery date.
    pub scheduled_date: Option<NaiveDate>,
}
