//! Who receives an alert: audience classification, account context, and
//! the internal and client recipient precedence chains.

pub mod account;
pub mod audience;
pub mod client;
pub mod email;
pub mod internal;

use serde::Serialize;

pub use account::AccountContextResolver;
pub use audience::AudienceClassifier;
pub use client::ClientRecipientResolver;
pub use internal::RecipientResolver;

/// The tier that produced a recipient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientSource {
    /// Explicit recipients stored on the alert.
    Alert,
    /// Per-trigger override list.
    TriggerOverride,
    /// Tenant-wide office alert emails.
    OfficeAlertEmails,
    /// Users holding an internal role.
    RoleFallback,
    /// Client contacts subscribed to the trigger.
    ClientAlertRecipients,
    /// Account alert contact fields.
    AccountContacts,
    /// Nothing resolvable.
    None,
}

impl RecipientSource {
    /// Return the source name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::TriggerOverride => "trigger_override",
            Self::OfficeAlertEmails => "office_alert_emails",
            Self::RoleFallback => "role_fallback",
            Self::ClientAlertRecipients => "client_alert_recipients",
            Self::AccountContacts => "account_contacts",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for RecipientSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cleaned recipient list and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRecipients {
    /// Lowercased, validated, de-duplicated addresses.
    pub emails: Vec<String>,
    /// Producing tier.
    pub source: RecipientSource,
}

impl ResolvedRecipients {
    /// Create a resolved list.
    pub fn new(emails: Vec<String>, source: RecipientSource) -> Self {
        Self { emails, source }
    }

    /// An empty list with source `none`.
    pub fn none() -> Self {
        Self::new(Vec::new(), RecipientSource::None)
    }

    /// Whether no address was resolved.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
