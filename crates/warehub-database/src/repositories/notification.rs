//! In-app notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_entity::notification::NewInAppNotification;

/// Write access to in-app notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Insert a batch of notifications atomically. Returns the number inserted.
    async fn create_in_app(&self, notifications: &[NewInAppNotification]) -> AppResult<u64>;
}

/// PostgreSQL-backed notification store.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create_in_app(&self, notifications: &[NewInAppNotification]) -> AppResult<u64> {
        if notifications.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut inserted = 0;
        for n in notifications {
            let result = sqlx::query(
                "INSERT INTO in_app_notifications \
                     (tenant_id, user_id, title, body, alert_type, entity_type, entity_id, action_url) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(n.tenant_id)
            .bind(n.user_id)
            .bind(&n.title)
            .bind(&n.body)
            .bind(&n.alert_type)
            .bind(n.entity_type.as_deref())
            .bind(n.entity_id)
            .bind(n.action_url.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
            })?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit notifications", e)
        })?;

        Ok(inserted)
    }
}
