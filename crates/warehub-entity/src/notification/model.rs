//! In-app notification rows created by the alert fan-out.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Data required to create an in-app notification for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInAppNotification {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Target user.
    pub user_id: Uuid,
    /// Notification title.
    pub title: String,
    /// Short plaintext body.
    pub body: String,
    /// Trigger key that produced the notification.
    pub alert_type: String,
    /// Referenced entity type.
    pub entity_type: Option<String>,
    /// Referenced entity identifier.
    pub entity_id: Option<Uuid>,
    /// Deep link into the portal.
    pub action_url: Option<String>,
}
