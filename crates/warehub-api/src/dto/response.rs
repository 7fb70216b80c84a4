//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Result of the diagnostic test send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSendResponse {
    /// Whether the email was accepted by the provider.
    pub success: bool,
    /// Confirmation message on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestSendResponse {
    /// Successful send.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Failed send.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Application version.
    pub version: String,
}
