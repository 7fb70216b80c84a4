//! Staff directory lookups (users and their roles).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_entity::user::User;

/// Read access to a tenant's staff users.
#[async_trait]
pub trait DirectoryStore: Send + Sync + 'static {
    /// Active users of the tenant holding any of the given role names.
    ///
    /// Role names are compared case-insensitively. Soft-deleted users,
    /// roles, and role assignments are excluded.
    async fn users_with_roles(&self, tenant_id: Uuid, roles: &[String]) -> AppResult<Vec<User>>;

    /// Find an active user of the tenant.
    async fn find_user(&self, tenant_id: Uuid, user_id: Uuid) -> AppResult<Option<User>>;
}

/// PostgreSQL-backed directory store.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for DirectoryRepository {
    async fn users_with_roles(&self, tenant_id: Uuid, roles: &[String]) -> AppResult<Vec<User>> {
        let roles: Vec<String> = roles.iter().map(|r| r.to_lowercase()).collect();
        sqlx::query_as::<_, User>(
            "SELECT DISTINCT u.id, u.tenant_id, u.email, u.first_name, u.last_name, u.deleted_at \
             FROM users u \
             JOIN user_roles ur ON ur.user_id = u.id AND ur.deleted_at IS NULL \
             JOIN roles r ON r.id = ur.role_id AND r.deleted_at IS NULL \
             WHERE u.tenant_id = $1 AND r.tenant_id = $1 \
               AND u.deleted_at IS NULL \
               AND LOWER(r.name) = ANY($2) \
             ORDER BY u.email",
        )
        .bind(tenant_id)
        .bind(roles)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load role users", e))
    }

    async fn find_user(&self, tenant_id: Uuid, user_id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, tenant_id, email, first_name, last_name, deleted_at FROM users \
             WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }
}
