//! Client account and client-contact repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_entity::account::Account;

/// Read access to client accounts and their alert contacts.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Find an account within a tenant.
    async fn account(&self, tenant_id: Uuid, account_id: Uuid) -> AppResult<Option<Account>>;

    /// Emails of active client contacts subscribed to a trigger for an account.
    ///
    /// Contacts are matched to the account by name, case-insensitively.
    async fn client_alert_recipients(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
        account_name: &str,
    ) -> AppResult<Vec<String>>;
}

/// PostgreSQL-backed account store.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn account(&self, tenant_id: Uuid, account_id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT id, tenant_id, account_name, account_code, primary_contact_name, \
                 primary_contact_email, alerts_contact_email, alerts_contact_name, \
                 additional_alert_emails \
             FROM accounts WHERE id = $1 AND tenant_id = $2",
        )
        .bind(account_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load account", e))
    }

    async fn client_alert_recipients(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
        account_name: &str,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT c.email FROM client_alert_recipients car \
             JOIN client_contacts c ON c.id = car.contact_id \
             WHERE car.tenant_id = $1 AND car.trigger_event = $2 \
               AND LOWER(c.account_name) = LOWER($3) \
               AND c.is_active = TRUE AND c.email IS NOT NULL \
             ORDER BY c.email",
        )
        .bind(tenant_id)
        .bind(trigger_event)
        .bind(account_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load client recipients", e)
        })
    }
}
