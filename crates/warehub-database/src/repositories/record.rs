//! Business record lookups used for template enrichment and account context.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_entity::account::AccountContext;
use warehub_entity::record::{
    AccountLink, BillingEvent, Claim, EntityKind, EntityRecord, EntityRef, InspectionFinding,
    Invoice, Item, Release, RepairAction, RepairQuote, Shipment, Task, TaskServiceLine,
};

/// Read access to the business records alerts refer to.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Load the typed record an alert refers to.
    async fn load(&self, tenant_id: Uuid, entity: EntityRef) -> AppResult<Option<EntityRecord>>;

    /// Resolve the account owning a record, if it has one.
    async fn account_context(
        &self,
        tenant_id: Uuid,
        entity: EntityRef,
    ) -> AppResult<Option<AccountContext>>;

    /// Item identifiers attached to a shipment, task, or release.
    async fn linked_item_ids(&self, tenant_id: Uuid, entity: EntityRef) -> AppResult<Vec<Uuid>>;

    /// Load items by identifier, ordered by item code.
    async fn items_by_ids(&self, tenant_id: Uuid, ids: &[Uuid]) -> AppResult<Vec<Item>>;

    /// Inspection findings recorded against the given items.
    async fn inspection_findings(
        &self,
        tenant_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<Vec<InspectionFinding>>;

    /// Billable service lines recorded on a task.
    async fn task_services(&self, tenant_id: Uuid, task_id: Uuid) -> AppResult<Vec<TaskServiceLine>>;

    /// Proposed actions on a repair quote.
    async fn repair_actions(&self, tenant_id: Uuid, quote_id: Uuid) -> AppResult<Vec<RepairAction>>;
}

/// Link table and owner column holding a record's items.
fn item_link(kind: EntityKind) -> Option<(&'static str, &'static str)> {
    match kind {
        EntityKind::Shipment => Some(("shipment_items", "shipment_id")),
        EntityKind::Task => Some(("task_items", "task_id")),
        EntityKind::Release => Some(("release_items", "release_id")),
        EntityKind::Item
        | EntityKind::Invoice
        | EntityKind::Claim
        | EntityKind::RepairQuote
        | EntityKind::BillingEvent => None,
    }
}

/// PostgreSQL-backed record store.
#[derive(Debug, Clone)]
pub struct RecordRepository {
    pool: PgPool,
}

impl RecordRepository {
    /// Create a new record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch<T>(&self, sql: &str, tenant_id: Uuid, id: Uuid) -> AppResult<Option<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(sql)
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load record", e))
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    async fn load(&self, tenant_id: Uuid, entity: EntityRef) -> AppResult<Option<EntityRecord>> {
        let id = entity.id;
        let record = match entity.kind {
            EntityKind::Shipment => self
                .fetch::<Shipment>(
                    "SELECT id, tenant_id, shipment_number, shipment_type, status, account_id, \
                         carrier, tracking_number, po_number, expected_arrival_date, received_at, notes \
                     FROM shipments WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::Shipment),
            EntityKind::Item => self
                .fetch::<Item>(
                    "SELECT id, tenant_id, item_code, description, account_id, sidemark, vendor, \
                         location_code, status, received_date \
                     FROM items WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::Item),
            EntityKind::Task => self
                .fetch::<Task>(
                    "SELECT id, tenant_id, title, task_type, status, priority, due_date, \
                         assigned_to, account_id, description, completed_at \
                     FROM tasks WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::Task),
            EntityKind::Invoice => self
                .fetch::<Invoice>(
                    "SELECT id, tenant_id, invoice_number, account_id, status, \
                         total_amount::float8 AS total_amount, due_date, period_start, period_end \
                     FROM invoices WHERE id = $1 AND tenant_id = $2",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::Invoice),
            EntityKind::Release => self
                .fetch::<Release>(
                    "SELECT id, tenant_id, release_number, account_id, status, release_type, \
                         release_to_name, scheduled_date \
                     FROM releases WHERE id = $1 AND tenant_id = $2",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::Release),
            EntityKind::Claim => self
                .fetch::<Claim>(
                    "SELECT id, tenant_id, claim_number, account_id, status, claim_type, \
                         description, claimed_amount::float8 AS claimed_amount \
                     FROM claims WHERE id = $1 AND tenant_id = $2",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::Claim),
            EntityKind::RepairQuote => self
                .fetch::<RepairQuote>(
                    "SELECT id, tenant_id, item_id, status, total_amount::float8 AS total_amount, \
                         technician_name, notes, expires_on \
                     FROM repair_quotes WHERE id = $1 AND tenant_id = $2",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::RepairQuote),
            EntityKind::BillingEvent => self
                .fetch::<BillingEvent>(
                    "SELECT id, tenant_id, account_id, charge_type, description, \
                         quantity::float8 AS quantity, unit_rate::float8 AS unit_rate, \
                         total_amount::float8 AS total_amount, occurred_at \
                     FROM billing_events WHERE id = $1 AND tenant_id = $2",
                    tenant_id,
                    id,
                )
                .await?
                .map(EntityRecord::BillingEvent),
        };
        Ok(record)
    }

    async fn account_context(
        &self,
        tenant_id: Uuid,
        entity: EntityRef,
    ) -> AppResult<Option<AccountContext>> {
        let table = entity.kind.table();
        let sql = match entity.kind.account_link() {
            AccountLink::Direct => format!(
                "SELECT a.id, a.account_name FROM {table} t \
                 JOIN accounts a ON a.id = t.account_id AND a.tenant_id = t.tenant_id \
                 WHERE t.id = $1 AND t.tenant_id = $2"
            ),
            AccountLink::ViaItem => format!(
                "SELECT a.id, a.account_name FROM {table} t \
                 JOIN items i ON i.id = t.item_id AND i.tenant_id = t.tenant_id \
                 JOIN accounts a ON a.id = i.account_id AND a.tenant_id = t.tenant_id \
                 WHERE t.id = $1 AND t.tenant_id = $2"
            ),
        };

        let row: Option<(Uuid, String)> = sqlx::query_as(&sql)
            .bind(entity.id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve account context", e)
            })?;

        Ok(row.map(|(account_id, account_name)| AccountContext {
            account_id,
            account_name,
        }))
    }

    async fn linked_item_ids(&self, tenant_id: Uuid, entity: EntityRef) -> AppResult<Vec<Uuid>> {
        let Some((table, owner)) = item_link(entity.kind) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT l.item_id FROM {table} l JOIN items i ON i.id = l.item_id \
             WHERE l.{owner} = $1 AND i.tenant_id = $2 ORDER BY i.item_code"
        );
        sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(entity.id)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load linked items", e))
    }

    async fn items_by_ids(&self, tenant_id: Uuid, ids: &[Uuid]) -> AppResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Item>(
            "SELECT id, tenant_id, item_code, description, account_id, sidemark, vendor, \
                 location_code, status, received_date \
             FROM items WHERE tenant_id = $1 AND id = ANY($2) ORDER BY item_code",
        )
        .bind(tenant_id)
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load items", e))
    }

    async fn inspection_findings(
        &self,
        tenant_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<Vec<InspectionFinding>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, InspectionFinding>(
            "SELECT ii.item_id, i.item_code, ii.condition, ii.notes, \
                 COALESCE(ii.photo_count, 0)::int8 AS photo_count \
             FROM item_inspections ii JOIN items i ON i.id = ii.item_id \
             WHERE i.tenant_id = $1 AND ii.item_id = ANY($2) \
             ORDER BY i.item_code, ii.created_at",
        )
        .bind(tenant_id)
        .bind(item_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load inspection findings", e)
        })
    }

    async fn task_services(&self, tenant_id: Uuid, task_id: Uuid) -> AppResult<Vec<TaskServiceLine>> {
        sqlx::query_as::<_, TaskServiceLine>(
            "SELECT service_name, quantity::float8 AS quantity, rate::float8 AS rate, \
                 total::float8 AS total \
             FROM task_service_lines WHERE tenant_id = $1 AND task_id = $2 \
             ORDER BY created_at",
        )
        .bind(tenant_id)
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load task services", e))
    }

    async fn repair_actions(&self, tenant_id: Uuid, quote_id: Uuid) -> AppResult<Vec<RepairAction>> {
        sqlx::query_as::<_, RepairAction>(
            "SELECT action, notes, estimated_cost::float8 AS estimated_cost \
             FROM repair_quote_actions WHERE tenant_id = $1 AND quote_id = $2 \
             ORDER BY sort_order, created_at",
        )
        .bind(tenant_id)
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load repair actions", e))
    }
}
