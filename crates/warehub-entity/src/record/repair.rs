//! Repair quote records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A repair quote for a single item. The account is reached through the
/// item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RepairQuote {
    /// Quote identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Item being repaired.
    pub item_id: Option<Uuid>,
    /// Workflow status.
    pub status: Option<String>,
    /// Quoted total.
    pub total_amount: Option<f64>,
    /// Technician preparing the quote.
    pub technician_name: Option<String>,
    /// Notes for the client.
    pub notes: Option<String>,
    /// Date the quote expires.
    pub expires_on: Option<NaiveDate>,
}

/// One line of work on a repair quote.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RepairAction {
    /// Action name (e.g. "Touch-up finish").
    pub action: String,
    /// Extra notes.
    pub notes: Option<String>,
    /// Estimated cost.
    pub estimated_cost: Option<f64>,
}
