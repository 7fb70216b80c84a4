//! Polymorphic entity references carried by alerts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kinds of business records an alert can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Inbound or outbound shipment.
    Shipment,
    /// Stored inventory item.
    Item,
    /// Warehouse task.
    Task,
    /// Client invoice.
    Invoice,
    /// Release (will-call / delivery) order.
    Release,
    /// Damage or loss claim.
    Claim,
    /// Repair quote for an item.
    RepairQuote,
    /// Billable event.
    BillingEvent,
}

/// How an entity table reaches its owning account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountLink {
    /// The table carries an `account_id` column.
    Direct,
    /// The table carries an `item_id`; the item carries the account.
    ViaItem,
}

impl EntityKind {
    /// All kinds, in a stable order.
    pub const ALL: [EntityKind; 8] = [
        Self::Shipment,
        Self::Item,
        Self::Task,
        Self::Invoice,
        Self::Release,
        Self::Claim,
        Self::RepairQuote,
        Self::BillingEvent,
    ];

    /// Parse the `entity_type` string stored on an alert.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "shipment" => Some(Self::Shipment),
            "item" => Some(Self::Item),
            "task" => Some(Self::Task),
            "invoice" => Some(Self::Invoice),
            "release" => Some(Self::Release),
            "claim" => Some(Self::Claim),
            "repair_quote" => Some(Self::RepairQuote),
            "billing_event" => Some(Self::BillingEvent),
            _ => None,
        }
    }

    /// Return the kind as stored on alerts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shipment => "shipment",
            Self::Item => "item",
            Self::Task => "task",
            Self::Invoice => "invoice",
            Self::Release => "release",
            Self::Claim => "claim",
            Self::RepairQuote => "repair_quote",
            Self::BillingEvent => "billing_event",
        }
    }

    /// Backing table.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Shipment => "shipments",
            Self::Item => "items",
            Self::Task => "tasks",
            Self::Invoice => "invoices",
            Self::Release => "releases",
            Self::Claim => "claims",
            Self::RepairQuote => "repair_quotes",
            Self::BillingEvent => "billing_events",
        }
    }

    /// How the table reaches its owning account.
    pub fn account_link(&self) -> AccountLink {
        match self {
            Self::RepairQuote => AccountLink::ViaItem,
            Self::Shipment
            | Self::Item
            | Self::Task
            | Self::Invoice
            | Self::Release
            | Self::Claim
            | Self::BillingEvent => AccountLink::Direct,
        }
    }

    /// Portal path segment used in deep links.
    pub fn portal_path(&self) -> &'static str {
        match self {
            Self::Shipment => "shipments",
            Self::Item => "inventory",
            Self::Task => "tasks",
            Self::Invoice => "billing/invoices",
            Self::Release => "releases",
            Self::Claim => "claims",
            Self::RepairQuote => "repairs",
            Self::BillingEvent => "billing",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed reference to one business record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity kind.
    pub kind: EntityKind,
    /// Record identifier.
    pub id: Uuid,
}

impl EntityRef {
    /// Create a reference.
    pub fn new(kind: EntityKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    /// Parse an alert's `(entity_type, entity_id)` pair.
    pub fn parse(kind: &str, id: Uuid) -> Option<Self> {
        EntityKind::parse(kind).map(|kind| Self { kind, id })
    }

    /// Portal deep link for this record.
    pub fn portal_url(&self, base: &str) -> String {
        format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            self.kind.portal_path(),
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_kind() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("Shipment "), Some(EntityKind::Shipment));
        assert_eq!(EntityKind::parse("shipmnet"), None);
    }

    #[test]
    fn test_portal_url() {
        let id = Uuid::nil();
        let entity = EntityRef::new(EntityKind::Invoice, id);
        assert_eq!(
            entity.portal_url("https://portal.example.com/"),
            format!("https://portal.example.com/billing/invoices/{id}")
        );
    }
}
