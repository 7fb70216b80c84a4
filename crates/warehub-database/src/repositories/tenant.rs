//! Tenant settings and branding repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_entity::tenant::{BrandingSettings, TenantSettings};

/// Read access to tenant-level settings.
#[async_trait]
pub trait TenantStore: Send + Sync + 'static {
    /// Company settings for a tenant.
    async fn settings(&self, tenant_id: Uuid) -> AppResult<Option<TenantSettings>>;

    /// Branding and sender identity for a tenant.
    async fn branding(&self, tenant_id: Uuid) -> AppResult<Option<BrandingSettings>>;
}

/// PostgreSQL-backed tenant store.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Create a new tenant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for TenantRepository {
    async fn settings(&self, tenant_id: Uuid) -> AppResult<Option<TenantSettings>> {
        sqlx::query_as::<_, TenantSettings>(
            "SELECT tenant_id, company_name, company_email, company_phone, company_address, \
                 office_alert_emails \
             FROM tenant_company_settings WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load tenant settings", e)
        })
    }

    async fn branding(&self, tenant_id: Uuid) -> AppResult<Option<BrandingSettings>> {
        sqlx::query_as::<_, BrandingSettings>(
            "SELECT tenant_id, brand_logo_url, brand_primary_color, brand_support_email, \
                 portal_base_url, from_name, custom_from_email, custom_email_domain, \
                 COALESCE(email_domain_verified, FALSE) AS email_domain_verified \
             FROM communication_brand_settings WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load tenant branding", e)
        })
    }
}
