//! Resend HTTP API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use warehub_core::config::MailConfig;
use warehub_core::error::{AppError, ErrorKind};
use warehub_core::result::AppResult;
use warehub_core::traits::{DeliveryReceipt, EmailProvider, OutboundEmail};

/// Request body for `POST /emails`.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Delivers email through the Resend API.
#[derive(Debug, Clone)]
pub struct ResendProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendProvider {
    /// Create a client from mail configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build email HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.trim().to_string(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    fn name(&self) -> &str {
        "resend"
    }

    async fn send(&self, email: &OutboundEmail) -> AppResult<DeliveryReceipt> {
        if self.api_key.is_empty() {
            return Err(AppError::configuration(
                "Email provider is not configured: set mail.api_key (WAREHUB__MAIL__API_KEY)",
            ));
        }

        let body = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Email provider request failed: {e}"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&raw)
                .ok()
                .and_then(|e| e.message.or(e.name))
                .unwrap_or(raw);
            return Err(AppError::external(format!(
                "Email provider rejected the message ({status}): {detail}"
            )));
        }

        let sent: SendEmailResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Email provider returned an unreadable response",
                e,
            )
        })?;

        debug!(message_id = %sent.id, recipients = email.to.len(), "Email accepted by Resend");
        Ok(DeliveryReceipt {
            message_id: sent.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Acme Storage <alerts@notifications.warehub.app>".to_string(),
            to: vec!["ops@acme.test".to_string()],
            reply_to: Some("support@acme.test".to_string()),
            subject: "Shipment received".to_string(),
            html: "<p>Hello</p>".to_string(),
            text: "Hello".to_string(),
        }
    }

    fn config(server: &MockServer, api_key: &str) -> MailConfig {
        MailConfig {
            api_key: api_key.to_string(),
            api_base_url: server.uri(),
            ..MailConfig::default()
        }
    }

    #[tokio::test]
    async fn test_send_returns_message_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(bearer_token("re_test"))
            .and(body_partial_json(serde_json::json!({
                "to": ["ops@acme.test"],
                "reply_to": "support@acme.test",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "msg_123"})))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ResendProvider::new(&config(&server, "re_test")).unwrap();
        let receipt = provider.send(&email()).await.unwrap();
        assert_eq!(receipt.message_id, "msg_123");
    }

    #[tokio::test]
    async fn test_provider_rejection_maps_to_external_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "name": "validation_error",
                "message": "The from domain is not verified",
            })))
            .mount(&server)
            .await;

        let provider = ResendProvider::new(&config(&server, "re_test")).unwrap();
        let err = provider.send(&email()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(err.message.contains("not verified"));
    }

    #[tokio::test]
    async fn test_missing_api_key_never_calls_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = ResendProvider::new(&config(&server, "  ")).unwrap();
        let err = provider.send(&email()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
