//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use warehub_service::DispatchRequest;

/// Body of `POST /send-alerts`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SendAlertsRequest {
    /// Only process alerts of this tenant.
    pub tenant_id: Option<Uuid>,
    /// Only process this alert.
    pub alert_queue_id: Option<Uuid>,
    /// Maximum alerts to process.
    pub limit: Option<u32>,
    /// Send a diagnostic email instead of processing the queue.
    #[serde(default)]
    pub test_send: bool,
    /// Recipient of the diagnostic email.
    #[validate(email(message = "test_email must be a valid email address"))]
    pub test_email: Option<String>,
}

impl SendAlertsRequest {
    /// Scope of the batch run described by this request.
    pub fn dispatch_request(&self) -> DispatchRequest {
        DispatchRequest {
            tenant_id: self.tenant_id,
            alert_id: self.alert_queue_id,
            limit: self.limit,
        }
    }
}

/// Body of `POST /api/templates/validate`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValidateTemplateRequest {
    /// Subject template.
    pub subject: Option<String>,
    /// Body template.
    #[validate(length(min = 1, message = "Template body is required"))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_alerts_request_defaults_and_mapping() {
        let req: SendAlertsRequest = serde_json::from_str("{}").unwrap();
        assert!(!req.test_send);
        assert!(req.validate().is_ok());

        let id = Uuid::new_v4();
        let req: SendAlertsRequest =
            serde_json::from_value(serde_json::json!({"alert_queue_id": id, "limit": 5})).unwrap();
        let dispatch = req.dispatch_request();
        assert_eq!(dispatch.alert_id, Some(id));
        assert_eq!(dispatch.limit, Some(5));
    }

    #[test]
    fn test_invalid_test_email_rejected() {
        let req = SendAlertsRequest {
            test_send: true,
            test_email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
