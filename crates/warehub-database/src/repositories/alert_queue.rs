//! Alert queue repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_entity::alert::{Alert, AlertQueueFilter, AlertStatus, DeliveredContent};

/// Access to the durable alert queue.
///
/// A batch first claims pending rows, moving them to `processing`, so that
/// concurrent batches never see the same alert. Every terminal update is
/// conditional on the row still being `processing`; an update that matches
/// no row returns a `Conflict` error so a row can never leave a terminal
/// state.
#[async_trait]
pub trait AlertQueueStore: Send + Sync + 'static {
    /// Atomically claim pending alerts, oldest first, moving them to `processing`.
    async fn claim_pending(&self, filter: &AlertQueueFilter) -> AppResult<Vec<Alert>>;

    /// Find a single alert regardless of status.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>>;

    /// Mark an alert as sent and store the delivered content.
    async fn mark_sent(&self, id: Uuid, content: &DeliveredContent) -> AppResult<()>;

    /// Mark an alert as failed with a human-readable reason.
    async fn mark_failed(&self, id: Uuid, error_message: &str) -> AppResult<()>;

    /// Mark an alert as skipped with a human-readable reason.
    async fn mark_skipped(&self, id: Uuid, reason: &str) -> AppResult<()>;

    /// Count alerts grouped by status, optionally scoped to a tenant.
    async fn count_by_status(&self, tenant_id: Option<Uuid>) -> AppResult<Vec<(AlertStatus, i64)>>;
}

const ALERT_COLUMNS: &str = "id, tenant_id, alert_type, entity_type, entity_id, recipient_emails, \
     subject, body_html, body_text, status, error_message, sent_at, created_at";

/// PostgreSQL-backed alert queue.
#[derive(Debug, Clone)]
pub struct AlertQueueRepository {
    pool: PgPool,
}

impl AlertQueueRepository {
    /// Create a new alert queue repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn close_claimed(
        &self,
        id: Uuid,
        status: AlertStatus,
        error_message: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE alert_queue SET status = $2, error_message = $3, processed_at = NOW() \
             WHERE id = $1 AND status = 'processing'",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to mark alert {status}"),
                e,
            )
        })?;

        ensure_updated(id, result.rows_affected())
    }
}

fn ensure_updated(id: Uuid, rows: u64) -> AppResult<()> {
    if rows == 0 {
        return Err(AppError::conflict(format!(
            "Alert {id} is not claimed for processing"
        )));
    }
    Ok(())
}

#[async_trait]
impl AlertQueueStore for AlertQueueRepository {
    async fn claim_pending(&self, filter: &AlertQueueFilter) -> AppResult<Vec<Alert>> {
        let sql = format!(
            "UPDATE alert_queue SET status = 'processing', processed_at = NOW() \
             WHERE id IN ( \
                 SELECT id FROM alert_queue \
                 WHERE status = 'pending' \
                   AND ($1::uuid IS NULL OR tenant_id = $1) \
                   AND ($2::uuid IS NULL OR id = $2) \
                 ORDER BY created_at ASC LIMIT $3 \
                 FOR UPDATE SKIP LOCKED) \
             RETURNING {ALERT_COLUMNS}"
        );
        let mut alerts = sqlx::query_as::<_, Alert>(&sql)
            .bind(filter.tenant_id)
            .bind(filter.alert_id)
            .bind(i64::from(filter.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to claim pending alerts", e)
            })?;
        alerts.sort_by_key(|a| a.created_at);
        Ok(alerts)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        let sql = format!("SELECT {ALERT_COLUMNS} FROM alert_queue WHERE id = $1");
        sqlx::query_as::<_, Alert>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find alert", e))
    }

    async fn mark_sent(&self, id: Uuid, content: &DeliveredContent) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE alert_queue SET status = 'sent', sent_at = $2, processed_at = NOW(), \
                 subject = $3, body_html = $4, body_text = $5, sent_recipients = $6, \
                 provider_message_id = $7, error_message = NULL \
             WHERE id = $1 AND status = 'processing'",
        )
        .bind(id)
        .bind(content.sent_at)
        .bind(&content.subject)
        .bind(&content.body_html)
        .bind(&content.body_text)
        .bind(&content.recipients)
        .bind(content.provider_message_id.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark alert sent", e))?;

        ensure_updated(id, result.rows_affected())
    }

    async fn mark_failed(&self, id: Uuid, error_message: &str) -> AppResult<()> {
        self.close_claimed(id, AlertStatus::Failed, error_message)
            .await
    }

    async fn mark_skipped(&self, id: Uuid, reason: &str) -> AppResult<()> {
        self.close_claimed(id, AlertStatus::Skipped, reason).await
    }

    async fn count_by_status(&self, tenant_id: Option<Uuid>) -> AppResult<Vec<(AlertStatus, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM alert_queue \
             WHERE ($1::uuid IS NULL OR tenant_id = $1) \
             GROUP BY status ORDER BY status",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count alerts", e))?;

        rows.into_iter()
            .map(|(status, count)| {
                status
                    .parse::<AlertStatus>()
                    .map(|s| (s, count))
                    .map_err(|e| AppError::database(format!("Unexpected alert status: {e}")))
            })
            .collect()
    }
}
