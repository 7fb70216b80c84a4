//! Outbound email provider trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A fully rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    /// Sender, either `addr@domain` or `Name <addr@domain>`.
    pub from: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Optional reply-to address.
    pub reply_to: Option<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plaintext body.
    pub text: String,
}

/// Receipt returned by a provider after accepting an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Provider-assigned message identifier.
    pub message_id: String,
}

/// Abstraction over the service that actually delivers email.
///
/// Implementations map provider rejections into
/// [`ErrorKind::ExternalService`](crate::error::ErrorKind::ExternalService)
/// and missing credentials into
/// [`ErrorKind::Configuration`](crate::error::ErrorKind::Configuration).
#[async_trait]
pub trait EmailProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider name for logging.
    fn name(&self) -> &str;

    /// Deliver a single email.
    async fn send(&self, email: &OutboundEmail) -> AppResult<DeliveryReceipt>;
}
