//! In-memory outbox provider.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use warehub_core::error::AppError;
use warehub_core::result::AppResult;
use warehub_core::traits::{DeliveryReceipt, EmailProvider, OutboundEmail};

#[derive(Debug, Default)]
struct OutboxState {
    sent: Vec<OutboundEmail>,
    failure: Option<String>,
}

/// Captures outgoing email instead of delivering it.
///
/// Can be told to reject every message to exercise provider failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutbox {
    state: Arc<Mutex<OutboxState>>,
}

impl MemoryOutbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject subsequent sends with the given provider message.
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(message.into());
    }

    /// Emails accepted so far.
    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.state.lock().await.sent.clone()
    }
}

#[async_trait]
impl EmailProvider for MemoryOutbox {
    fn name(&self) -> &str {
        "outbox"
    }

    async fn send(&self, email: &OutboundEmail) -> AppResult<DeliveryReceipt> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.failure {
            return Err(AppError::external(message.clone()));
        }
        state.sent.push(email.clone());
        Ok(DeliveryReceipt {
            message_id: format!("outbox-{}", state.sent.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "alerts@notifications.warehub.app".to_string(),
            to: vec!["ops@acme.test".to_string()],
            reply_to: None,
            subject: "Test".to_string(),
            html: "<p>Test</p>".to_string(),
            text: "Test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_outbox_captures_and_fails() {
        let outbox = MemoryOutbox::new();
        let receipt = outbox.send(&email()).await.unwrap();
        assert_eq!(receipt.message_id, "outbox-1");

        outbox.fail_with("mailbox full").await;
        assert!(outbox.send(&email()).await.is_err());
        assert_eq!(outbox.sent().await.len(), 1);
    }
}
