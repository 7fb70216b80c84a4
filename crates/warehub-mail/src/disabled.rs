//! Log-only provider used when outbound email is switched off.

use async_trait::async_trait;
use tracing::warn;

use warehub_core::result::AppResult;
use warehub_core::traits::{DeliveryReceipt, EmailProvider, OutboundEmail};

/// Accepts every email and only logs it.
#[derive(Debug, Clone, Default)]
pub struct DisabledProvider;

#[async_trait]
impl EmailProvider for DisabledProvider {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn send(&self, email: &OutboundEmail) -> AppResult<DeliveryReceipt> {
        warn!(
            to = ?email.to,
            subject = %email.subject,
            "Skipping alert email delivery (provider disabled)"
        );
        Ok(DeliveryReceipt {
            message_id: "disabled".to_string(),
        })
    }
}
