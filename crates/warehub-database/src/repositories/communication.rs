//! Trigger catalog, communication alert, and template lookups.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_entity::catalog::TriggerCatalogEntry;
use warehub_entity::communication::{Channel, CommunicationAlert, CommunicationTemplate};

/// Read access to trigger metadata and per-tenant alert configuration.
#[async_trait]
pub trait CommunicationStore: Send + Sync + 'static {
    /// Look up a trigger catalog entry by key.
    async fn trigger_entry(&self, key: &str) -> AppResult<Option<TriggerCatalogEntry>>;

    /// Find the tenant's configuration row for a trigger.
    async fn alert_config(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
    ) -> AppResult<Option<CommunicationAlert>>;

    /// Find the most recently updated template for a configuration row and channel.
    async fn template(
        &self,
        alert_config_id: Uuid,
        channel: Channel,
    ) -> AppResult<Option<CommunicationTemplate>>;
}

/// PostgreSQL-backed communication store.
#[derive(Debug, Clone)]
pub struct CommunicationRepository {
    pool: PgPool,
}

impl CommunicationRepository {
    /// Create a new communication repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunicationStore for CommunicationRepository {
    async fn trigger_entry(&self, key: &str) -> AppResult<Option<TriggerCatalogEntry>> {
        sqlx::query_as::<_, TriggerCatalogEntry>(
            "SELECT key, display_name, audience, is_active FROM trigger_catalog WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load trigger", e))
    }

    async fn alert_config(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
    ) -> AppResult<Option<CommunicationAlert>> {
        sqlx::query_as::<_, CommunicationAlert>(
            "SELECT id, tenant_id, trigger_event, is_enabled, channels, recipient_emails, updated_at \
             FROM communication_alerts WHERE tenant_id = $1 AND trigger_event = $2 \
             ORDER BY updated_at DESC NULLS LAST LIMIT 1",
        )
        .bind(tenant_id)
        .bind(trigger_event)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load alert configuration", e)
        })
    }

    async fn template(
        &self,
        alert_config_id: Uuid,
        channel: Channel,
    ) -> AppResult<Option<CommunicationTemplate>> {
        sqlx::query_as::<_, CommunicationTemplate>(
            "SELECT id, alert_id, channel, subject_template, body_template, body_text_template, \
                 is_active, updated_at \
             FROM communication_templates WHERE alert_id = $1 AND channel = $2 \
             ORDER BY updated_at DESC NULLS LAST LIMIT 1",
        )
        .bind(alert_config_id)
        .bind(channel.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load template", e))
    }
}
