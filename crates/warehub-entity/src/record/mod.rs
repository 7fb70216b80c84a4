//! Business records an alert can refer to.
//!
//! Alerts store a loosely typed `(entity_type, entity_id)` pair. It is
//! parsed once into an [`EntityRef`] and loaded into an [`EntityRecord`],
//! so every consumer matches exhaustively over the known kinds.

pub mod billing;
pub mod claim;
pub mod detail;
pub mod item;
pub mod kind;
pub mod release;
pub mod repair;
pub mod shipment;
pub mod task;

use uuid::Uuid;

pub use billing::{BillingEvent, Invoice};
pub use claim::Claim;
pub use detail::{InspectionFinding, TaskServiceLine};
pub use item::Item;
pub use kind::{AccountLink, EntityKind, EntityRef};
pub use release::Release;
pub use repair::{RepairAction, RepairQuote};
pub use shipment::Shipment;
pub use task::Task;

/// A loaded business record with its typed payload.
#[derive(Debug, Clone)]
pub enum EntityRecord {
    /// Shipment.
    Shipment(Shipment),
    /// Item.
    Item(Item),
    /// Task.
    Task(Task),
    /// Invoice.
    Invoice(Invoice),
    /// Release.
    Release(Release),
    /// Claim.
    Claim(Claim),
    /// Repair quote.
    RepairQuote(RepairQuote),
    /// Billing event.
    BillingEvent(BillingEvent),
}

impl EntityRecord {
    /// The kind of this record.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Shipment(_) => EntityKind::Shipment,
            Self::Item(_) => EntityKind::Item,
            Self::Task(_) => EntityKind::Task,
            Self::Invoice(_) => EntityKind::Invoice,
            Self::Release(_) => EntityKind::Release,
            Self::Claim(_) => EntityKind::Claim,
            Self::RepairQuote(_) => EntityKind::RepairQuote,
            Self::BillingEvent(_) => EntityKind::BillingEvent,
        }
    }

    /// Record identifier.
    pub fn id(&self) -> Uuid {
        match self {
            Self::Shipment(r) => r.id,
            Self::Item(r) => r.id,
            Self::Task(r) => r.id,
            Self::Invoice(r) => r.id,
            Self::Release(r) => r.id,
            Self::Claim(r) => r.id,
            Self::RepairQuote(r) => r.id,
            Self::BillingEvent(r) => r.id,
        }
    }

    /// Typed reference to this record.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind(), self.id())
    }
}
