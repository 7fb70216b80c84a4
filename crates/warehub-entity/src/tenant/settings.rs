//! Tenant company settings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Company-level settings of a tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct TenantSettings {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Company display name.
    pub company_name: Option<String>,
    /// Main office email.
    pub company_email: Option<String>,
    /// Main office phone.
    pub company_phone: Option<String>,
    /// Postal address, single line.
    pub company_address: Option<String>,
    /// Comma-separated list of addresses that receive internal alerts.
    pub office_alert_emails: Option<String>,
}
