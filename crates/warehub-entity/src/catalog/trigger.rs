//! Trigger catalog entries and audience tags.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Who an alert is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Warehouse staff of the tenant.
    Internal,
    /// External clients (account contacts).
    Client,
    /// Both staff and clients.
    Both,
}

impl Audience {
    /// Whether internal staff receive the alert.
    pub fn includes_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Both)
    }

    /// Whether client contacts receive the alert.
    pub fn includes_client(&self) -> bool {
        matches!(self, Self::Client | Self::Both)
    }

    /// Return the audience as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Client => "client",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(Self::Internal),
            "client" => Ok(Self::Client),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown audience '{other}'")),
        }
    }
}

impl TryFrom<String> for Audience {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Read-only catalog row mapping a trigger key to its audience.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TriggerCatalogEntry {
    /// Trigger key (matches `Alert::alert_type`).
    pub key: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Intended audience.
    #[sqlx(try_from = "String")]
    pub audience: Audience,
    /// Inactive entries are treated as absent.
    pub is_active: bool,
}
