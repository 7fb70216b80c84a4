//! Owning-account resolution for alert entities.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use warehub_database::RecordStore;
use warehub_entity::account::AccountContext;
use warehub_entity::record::{EntityKind, EntityRef};

/// Maps an alert's entity to the client account that owns it.
///
/// Never fails: unknown kinds, missing rows, rows without an account, and
/// lookup errors all resolve to `None`.
#[derive(Clone)]
pub struct AccountContextResolver {
    records: Arc<dyn RecordStore>,
}

impl AccountContextResolver {
    /// Creates a new resolver.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Resolve from the raw `(entity_type, entity_id)` pair stored on an alert.
    pub async fn resolve(
        &self,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
        tenant_id: Uuid,
    ) -> Option<AccountContext> {
        let (Some(kind), Some(id)) = (entity_type, entity_id) else {
            return None;
        };
        let Some(kind) = EntityKind::parse(kind) else {
            debug!(entity_type = kind, "Unknown entity type, no account context");
            return None;
        };
        self.resolve_ref(EntityRef::new(kind, id), tenant_id).await
    }

    /// Resolve from a typed entity reference.
    pub async fn resolve_ref(&self, entity: EntityRef, tenant_id: Uuid) -> Option<AccountContext> {
        match self.records.account_context(tenant_id, entity).await {
            Ok(Some(context)) => Some(context),
            Ok(None) => {
                debug!(entity_type = %entity.kind, entity_id = %entity.id, "Entity has no account");
                None
            }
            Err(e) => {
                warn!(
                    entity_type = %entity.kind,
                    entity_id = %entity.id,
                    error = %e,
                    "Account context lookup failed"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for AccountContextResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountContextResolver").finish_non_exhaustive()
    }
}
