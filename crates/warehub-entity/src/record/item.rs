//! Inventory item record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored inventory item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Item identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Item code printed on the label.
    pub item_code: String,
    /// Description.
    pub description: Option<String>,
    /// Owning account.
    pub account_id: Option<Uuid>,
    /// Client sidemark.
    pub sidemark: Option<String>,
    /// Vendor.
    pub vendor: Option<String>,
    /// Current warehouse location code.
    pub location_code: Option<String>,
    /// Workflow status.
    pub status: Option<String>,
    /// Date the item was received.
    pub received_date: Option<NaiveDate>,
}
