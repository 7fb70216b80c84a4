//! Store traits and their PostgreSQL repository implementations.
//!
//! Each module defines a `*Store` trait describing the queries the alert
//! pipeline needs and a concrete `*Repository` over a [`sqlx::PgPool`].

pub mod account;
pub mod alert_queue;
pub mod communication;
pub mod directory;
pub mod notification;
pub mod record;
pub mod tenant;

pub use account::{AccountRepository, AccountStore};
pub use alert_queue::{AlertQueueRepository, AlertQueueStore};
pub use communication::{CommunicationRepository, CommunicationStore};
pub use directory::{DirectoryRepository, DirectoryStore};
pub use notification::{NotificationRepository, NotificationStore};
pub use record::{RecordRepository, RecordStore};
pub use tenant::{TenantRepository, TenantStore};
