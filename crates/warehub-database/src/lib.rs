//! # warehub-database
//!
//! Database layer for the alert pipeline: PostgreSQL connection management,
//! store traits with sqlx repository implementations, and an in-memory
//! store for tests and dry runs.

pub mod connection;
pub mod memory;
pub mod repositories;

use std::sync::Arc;

use sqlx::PgPool;

pub use connection::DatabasePool;
pub use memory::InMemoryStore;
pub use repositories::{
    AccountStore, AlertQueueStore, CommunicationStore, DirectoryStore, NotificationStore,
    RecordStore, TenantStore,
};

/// The set of stores the alert pipeline reads from and writes to.
#[derive(Clone)]
pub struct Stores {
    /// Alert queue.
    pub alerts: Arc<dyn AlertQueueStore>,
    /// Trigger catalog, alert configuration, and templates.
    pub communication: Arc<dyn CommunicationStore>,
    /// Tenant settings and branding.
    pub tenants: Arc<dyn TenantStore>,
    /// Staff users and roles.
    pub directory: Arc<dyn DirectoryStore>,
    /// Client accounts and contacts.
    pub accounts: Arc<dyn AccountStore>,
    /// Business records.
    pub records: Arc<dyn RecordStore>,
    /// In-app notifications.
    pub notifications: Arc<dyn NotificationStore>,
}

impl Stores {
    /// Build PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            alerts: Arc::new(repositories::AlertQueueRepository::new(pool.clone())),
            communication: Arc::new(repositories::CommunicationRepository::new(pool.clone())),
            tenants: Arc::new(repositories::TenantRepository::new(pool.clone())),
            directory: Arc::new(repositories::DirectoryRepository::new(pool.clone())),
            accounts: Arc::new(repositories::AccountRepository::new(pool.clone())),
            records: Arc::new(repositories::RecordRepository::new(pool.clone())),
            notifications: Arc::new(repositories::NotificationRepository::new(pool)),
        }
    }

    /// Build stores backed by a single in-memory store.
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            alerts: Arc::new(store.clone()),
            communication: Arc::new(store.clone()),
            tenants: Arc::new(store.clone()),
            directory: Arc::new(store.clone()),
            accounts: Arc::new(store.clone()),
            records: Arc::new(store.clone()),
            notifications: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
