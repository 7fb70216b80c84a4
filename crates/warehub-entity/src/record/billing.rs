//! Invoice and billing event records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A client invoice.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    /// Invoice identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Human-readable number.
    pub invoice_number: String,
    /// Owning account.
    pub account_id: Option<Uuid>,
    /// Workflow status.
    pub status: Option<String>,
    /// Invoice total.
    pub total_amount: Option<f64>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Billing period start.
    pub period_start: Option<NaiveDate>,
    /// Billing period end.
    pub period_end: Option<NaiveDate>,
}

/// A single billable event (storage day, handling charge, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillingEvent {
    /// Event identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Owning account.
    pub account_id: Option<Uuid>,
    /// Charge type code.
    pub charge_type: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Quantity billed.
    pub quantity: Option<f64>,
    /// Rate per unit.
    pub unit_rate: Option<f64>,
    /// Total amount.
    pub total_amount: Option<f64>,
    /// When the billable event happened.
    pub occurred_at: Option<DateTime<Utc>>,
}
