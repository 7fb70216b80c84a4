//! Shipment record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An inbound or outbound shipment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shipment {
    /// Shipment identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Human-readable number (e.g. `SHP-00042`).
    pub shipment_number: String,
    /// `inbound`, `outbound`, or `return`.
    pub shipment_type: Option<String>,
    /// Workflow status.
    pub status: Option<String>,
    /// Owning account.
    pub account_id: Option<Uuid>,
    /// Carrier name.
    pub carrier: Option<String>,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
    /// Client purchase order number.
    pub po_number: Option<String>,
    /// Expected arrival date.
    pub expected_arrival_date: Option<NaiveDate>,
    /// When the shipment was received.
    pub received_at: Option<DateTime<Utc>>,
    /// Free-form notes.
    pub notes: Option<String>,
}
