//! Internal (staff) recipient precedence chain.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use warehub_database::{CommunicationStore, DirectoryStore, TenantStore};

use super::email::{clean_emails, split_list};
use super::{RecipientSource, ResolvedRecipients};

/// Resolves staff recipients: first non-empty tier wins.
///
/// 1. explicit recipients stored on the alert
/// 2. the per-trigger override list in the tenant's alert configuration
/// 3. the tenant's `office_alert_emails`
/// 4. users holding one of the internal roles
#[derive(Clone)]
pub struct RecipientResolver {
    communication: Arc<dyn CommunicationStore>,
    tenants: Arc<dyn TenantStore>,
    directory: Arc<dyn DirectoryStore>,
    internal_roles: Vec<String>,
}

impl RecipientResolver {
    /// Creates a new resolver.
    pub fn new(
        communication: Arc<dyn CommunicationStore>,
        tenants: Arc<dyn TenantStore>,
        directory: Arc<dyn DirectoryStore>,
        internal_roles: Vec<String>,
    ) -> Self {
        Self {
            communication,
            tenants,
            directory,
            internal_roles,
        }
    }

    /// Resolve the recipients for an alert.
    ///
    /// Lookup failures are logged and treated as an empty tier.
    pub async fn resolve(
        &self,
        tenant_id: Uuid,
        alert_type: &str,
        explicit: &[String],
    ) -> ResolvedRecipients {
        let emails = clean_emails(explicit);
        if !emails.is_empty() {
            return ResolvedRecipients::new(emails, RecipientSource::Alert);
        }

        let emails = self.trigger_override(tenant_id, alert_type).await;
        if !emails.is_empty() {
            return ResolvedRecipients::new(emails, RecipientSource::TriggerOverride);
        }

        let emails = self.office_alert_emails(tenant_id).await;
        if !emails.is_empty() {
            return ResolvedRecipients::new(emails, RecipientSource::OfficeAlertEmails);
        }

        let emails = self.role_fallback(tenant_id).await;
        if !emails.is_empty() {
            return ResolvedRecipients::new(emails, RecipientSource::RoleFallback);
        }

        debug!(%tenant_id, alert_type, "No internal recipients at any tier");
        ResolvedRecipients::none()
    }

    async fn trigger_override(&self, tenant_id: Uuid, alert_type: &str) -> Vec<String> {
        match self.communication.alert_config(tenant_id, alert_type).await {
            Ok(Some(config)) => clean_emails(config.override_recipients()),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(%tenant_id, alert_type, error = %e, "Failed to load trigger recipients");
                Vec::new()
            }
        }
    }

    async fn office_alert_emails(&self, tenant_id: Uuid) -> Vec<String> {
        match self.tenants.settings(tenant_id).await {
            Ok(Some(settings)) => settings
                .office_alert_emails
                .as_deref()
                .map(|raw| clean_emails(split_list(raw)))
                .unwrap_or_default(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(%tenant_id, error = %e, "Failed to load office alert emails");
                Vec::new()
            }
        }
    }

    async fn role_fallback(&self, tenant_id: Uuid) -> Vec<String> {
        match self
            .directory
            .users_with_roles(tenant_id, &self.internal_roles)
            .await
        {
            Ok(users) => clean_emails(users.iter().map(|u| u.email.as_str())),
            Err(e) => {
                warn!(%tenant_id, error = %e, "Failed to load role fallback recipients");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for RecipientResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientResolver")
            .field("internal_roles", &self.internal_roles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;
    use warehub_database::InMemoryStore;
    use warehub_entity::communication::{ChannelToggles, CommunicationAlert};
    use warehub_entity::tenant::TenantSettings;
    use warehub_entity::user::User;

    use super::*;

    fn resolver(store: &InMemoryStore) -> RecipientResolver {
        RecipientResolver::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            vec!["admin".into(), "manager".into(), "tenant_admin".into()],
        )
    }

    fn user(tenant_id: Uuid, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id,
            email: email.to_string(),
            first_name: None,
            last_name: None,
            deleted_at: None,
        }
    }

    async fn seed_fallbacks(store: &InMemoryStore, tenant_id: Uuid) {
        store
            .set_settings(TenantSettings {
                tenant_id,
                office_alert_emails: Some("office@acme.test, OFFICE@acme.test".to_string()),
                ..Default::default()
            })
            .await;
        store
            .insert_user(user(tenant_id, "boss@acme.test"), &["Manager"])
            .await;
    }

    #[tokio::test]
    async fn test_explicit_recipients_win_over_every_fallback() {
        let store = InMemoryStore::new();
        let tenant_id = Uuid::new_v4();
        seed_fallbacks(&store, tenant_id).await;

        let explicit = vec![
            "Dock@Acme.test".to_string(),
            "bad".to_string(),
            "dock@acme.test".to_string(),
        ];
        let resolved = resolver(&store)
            .resolve(tenant_id, "shipment_received", &explicit)
            .await;
        assert_eq!(resolved.source, RecipientSource::Alert);
        assert_eq!(resolved.emails, vec!["dock@acme.test"]);
    }

    #[tokio::test]
    async fn test_trigger_override_then_office_then_roles() {
        let store = InMemoryStore::new();
        let tenant_id = Uuid::new_v4();
        let resolver = resolver(&store);

        store
            .insert_user(user(tenant_id, "Boss@acme.test"), &["manager"])
            .await;
        store
            .insert_user(user(tenant_id, "picker@acme.test"), &["warehouse"])
            .await;
        let mut gone = user(tenant_id, "former@acme.test");
        gone.deleted_at = Some(chrono::Utc::now());
        store.insert_user(gone, &["admin"]).await;

        let resolved = resolver.resolve(tenant_id, "task_overdue", &[]).await;
        assert_eq!(resolved.source, RecipientSource::RoleFallback);
        assert_eq!(resolved.emails, vec!["boss@acme.test"]);

        seed_fallbacks(&store, tenant_id).await;
        let resolved = resolver.resolve(tenant_id, "task_overdue", &[]).await;
        assert_eq!(resolved.source, RecipientSource::OfficeAlertEmails);
        assert_eq!(resolved.emails, vec!["office@acme.test"]);

        store
            .insert_alert_config(CommunicationAlert {
                id: Uuid::new_v4(),
                tenant_id,
                trigger_event: "task_overdue".to_string(),
                is_enabled: true,
                channels: Json(ChannelToggles::default()),
                recipient_emails: Some(vec!["leads@acme.test".to_string()]),
                updated_at: None,
            })
            .await;
        let resolved = resolver.resolve(tenant_id, "task_overdue", &[]).await;
        assert_eq!(resolved.source, RecipientSource::TriggerOverride);
        assert_eq!(resolved.emails, vec!["leads@acme.test"]);
    }

    #[tokio::test]
    async fn test_nothing_resolvable_returns_none() {
        let store = InMemoryStore::new();
        let resolved = resolver(&store)
            .resolve(Uuid::new_v4(), "task_overdue", &["nope".to_string()])
            .await;
        assert!(resolved.is_empty());
        assert_eq!(resolved.source, RecipientSource::None);
    }

    #[tokio::test]
    async fn test_lookup_errors_fall_through_to_none() {
        let store = InMemoryStore::new();
        store.set_unavailable(true).await;
        let resolved = resolver(&store)
            .resolve(Uuid::new_v4(), "task_overdue", &[])
            .await;
        assert_eq!(resolved.source, RecipientSource::None);
    }
}
