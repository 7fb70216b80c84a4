//! Claim record.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A damage or loss claim filed by a client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    /// Claim identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Human-readable number.
    pub claim_number: String,
    /// Owning account.
    pub account_id: Option<Uuid>,
    /// Workflow status.
    pub status: Option<String>,
    /// `damage`, `loss`, ...
    pub claim_type: Option<String>,
    /// Description supplied by the client.
    pub description: Option<String>,
    /// Amount claimed.
    pub claimed_amount: Option<f64>,
}
