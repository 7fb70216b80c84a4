//! In-memory store implementing every store trait.
//!
//! Backs the pipeline in tests; suitable for a single process only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use warehub_core::error::AppError;
use warehub_core::result::AppResult;
use warehub_entity::account::{Account, AccountContext};
use warehub_entity::alert::{Alert, AlertQueueFilter, AlertStatus, DeliveredContent};
use warehub_entity::catalog::TriggerCatalogEntry;
use warehub_entity::communication::{Channel, CommunicationAlert, CommunicationTemplate};
use warehub_entity::notification::NewInAppNotification;
use warehub_entity::record::{
    EntityKind, EntityRecord, EntityRef, InspectionFinding, Item, RepairAction, TaskServiceLine,
};
use warehub_entity::tenant::{BrandingSettings, TenantSettings};
use warehub_entity::user::User;

use crate::repositories::{
    AccountStore, AlertQueueStore, CommunicationStore, DirectoryStore, NotificationStore,
    RecordStore, TenantStore,
};

/// A client contact subscribed to a trigger.
#[derive(Debug, Clone)]
struct ClientSubscription {
    tenant_id: Uuid,
    trigger_event: String,
    account_name: String,
    email: String,
    is_active: bool,
}

#[derive(Debug, Default)]
struct InnerState {
    alerts: Vec<Alert>,
    delivered: HashMap<Uuid, DeliveredContent>,
    triggers: HashMap<String, TriggerCatalogEntry>,
    alert_configs: Vec<CommunicationAlert>,
    templates: Vec<CommunicationTemplate>,
    settings: HashMap<Uuid, TenantSettings>,
    branding: HashMap<Uuid, BrandingSettings>,
    users: Vec<(User, Vec<String>)>,
    accounts: Vec<Account>,
    subscriptions: Vec<ClientSubscription>,
    records: HashMap<EntityRef, (Uuid, EntityRecord)>,
    item_links: HashMap<EntityRef, Vec<Uuid>>,
    findings: Vec<InspectionFinding>,
    task_services: HashMap<Uuid, Vec<TaskServiceLine>>,
    repair_actions: HashMap<Uuid, Vec<RepairAction>>,
    notifications: Vec<NewInAppNotification>,
    unavailable: bool,
    reject_mark_sent: bool,
}

/// In-memory store guarded by a Tokio mutex.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an alert.
    pub async fn insert_alert(&self, alert: Alert) {
        self.state.lock().await.alerts.push(alert);
    }

    /// Register a trigger catalog entry.
    pub async fn insert_trigger(&self, entry: TriggerCatalogEntry) {
        self.state
            .lock()
            .await
            .triggers
            .insert(entry.key.clone(), entry);
    }

    /// Register a tenant's alert configuration row.
    pub async fn insert_alert_config(&self, config: CommunicationAlert) {
        self.state.lock().await.alert_configs.push(config);
    }

    /// Register a communication template.
    pub async fn insert_template(&self, template: CommunicationTemplate) {
        self.state.lock().await.templates.push(template);
    }

    /// Set a tenant's company settings.
    pub async fn set_settings(&self, settings: TenantSettings) {
        self.state
            .lock()
            .await
            .settings
            .insert(settings.tenant_id, settings);
    }

    /// Set a tenant's branding.
    pub async fn set_branding(&self, branding: BrandingSettings) {
        self.state
            .lock()
            .await
            .branding
            .insert(branding.tenant_id, branding);
    }

    /// Register a staff user holding the given roles.
    pub async fn insert_user(&self, user: User, roles: &[&str]) {
        let roles = roles.iter().map(|r| r.to_string()).collect();
        self.state.lock().await.users.push((user, roles));
    }

    /// Register a client account.
    pub async fn insert_account(&self, account: Account) {
        self.state.lock().await.accounts.push(account);
    }

    /// Subscribe a client contact to a trigger for an account.
    pub async fn subscribe_client_contact(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
        account_name: &str,
        email: &str,
    ) {
        self.state.lock().await.subscriptions.push(ClientSubscription {
            tenant_id,
            trigger_event: trigger_event.to_string(),
            account_name: account_name.to_string(),
            email: email.to_string(),
            is_active: true,
        });
    }

    /// Register a business record under a tenant.
    pub async fn insert_record(&self, tenant_id: Uuid, record: EntityRecord) {
        self.state
            .lock()
            .await
            .records
            .insert(record.entity_ref(), (tenant_id, record));
    }

    /// Attach items to a shipment, task, or release.
    pub async fn link_items(&self, entity: EntityRef, item_ids: Vec<Uuid>) {
        self.state.lock().await.item_links.insert(entity, item_ids);
    }

    /// Record an inspection finding.
    pub async fn insert_finding(&self, finding: InspectionFinding) {
        self.state.lock().await.findings.push(finding);
    }

    /// Record a billable service line on a task.
    pub async fn insert_task_service(&self, task_id: Uuid, line: TaskServiceLine) {
        self.state
            .lock()
            .await
            .task_services
            .entry(task_id)
            .or_default()
            .push(line);
    }

    /// Record a proposed action on a repair quote.
    pub async fn insert_repair_action(&self, quote_id: Uuid, action: RepairAction) {
        self.state
            .lock()
            .await
            .repair_actions
            .entry(quote_id)
            .or_default()
            .push(action);
    }

    /// Make every query fail with a database error.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    /// Make `mark_sent` fail while every other query keeps working.
    pub async fn set_reject_mark_sent(&self, reject: bool) {
        self.state.lock().await.reject_mark_sent = reject;
    }

    /// Snapshot of an alert row.
    pub async fn alert(&self, id: Uuid) -> Option<Alert> {
        self.state
            .lock()
            .await
            .alerts
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Content stored when an alert was marked sent.
    pub async fn delivered(&self, id: Uuid) -> Option<DeliveredContent> {
        self.state.lock().await.delivered.get(&id).cloned()
    }

    /// All in-app notifications created so far.
    pub async fn notifications(&self) -> Vec<NewInAppNotification> {
        self.state.lock().await.notifications.clone()
    }
}

impl InnerState {
    fn check_available(&self) -> AppResult<()> {
        if self.unavailable {
            return Err(AppError::database("In-memory store is unavailable"));
        }
        Ok(())
    }

    fn claimed_mut(&mut self, id: Uuid) -> AppResult<&mut Alert> {
        self.check_available()?;
        self.alerts
            .iter_mut()
            .find(|a| a.id == id && a.status == AlertStatus::Processing)
            .ok_or_else(|| AppError::conflict(format!("Alert {id} is not claimed for processing")))
    }

    fn close(&mut self, id: Uuid, status: AlertStatus, message: &str) -> AppResult<()> {
        let alert = self.claimed_mut(id)?;
        alert.status = status;
        alert.error_message = Some(message.to_string());
        Ok(())
    }

    fn record(&self, tenant_id: Uuid, entity: EntityRef) -> Option<&EntityRecord> {
        self.records
            .get(&entity)
            .filter(|(owner, _)| *owner == tenant_id)
            .map(|(_, record)| record)
    }

    fn item(&self, tenant_id: Uuid, id: Uuid) -> Option<&Item> {
        match self.record(tenant_id, EntityRef::new(EntityKind::Item, id)) {
            Some(EntityRecord::Item(item)) => Some(item),
            _ => None,
        }
    }
}

fn record_account_id(state: &InnerState, tenant_id: Uuid, record: &EntityRecord) -> Option<Uuid> {
    match record {
        EntityRecord::Shipment(r) => r.account_id,
        EntityRecord::Item(r) => r.account_id,
        EntityRecord::Task(r) => r.account_id,
        EntityRecord::Invoice(r) => r.account_id,
        EntityRecord::Release(r) => r.account_id,
        EntityRecord::Claim(r) => r.account_id,
        EntityRecord::BillingEvent(r) => r.account_id,
        EntityRecord::RepairQuote(r) => r
            .item_id
            .and_then(|item_id| state.item(tenant_id, item_id))
            .and_then(|item| item.account_id),
    }
}

#[async_trait]
impl AlertQueueStore for InMemoryStore {
    async fn claim_pending(&self, filter: &AlertQueueFilter) -> AppResult<Vec<Alert>> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        let mut pending: Vec<&mut Alert> = state
            .alerts
            .iter_mut()
            .filter(|a| a.status == AlertStatus::Pending)
            .filter(|a| filter.tenant_id.is_none_or(|t| a.tenant_id == t))
            .filter(|a| filter.alert_id.is_none_or(|id| a.id == id))
            .collect();
        pending.sort_by_key(|a| a.created_at);
        pending.truncate(filter.limit as usize);
        Ok(pending
            .into_iter()
            .map(|alert| {
                alert.status = AlertStatus::Processing;
                alert.clone()
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.alerts.iter().find(|a| a.id == id).cloned())
    }

    async fn mark_sent(&self, id: Uuid, content: &DeliveredContent) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.reject_mark_sent {
            return Err(AppError::database("In-memory store rejected the sent update"));
        }
        let alert = state.claimed_mut(id)?;
        alert.status = AlertStatus::Sent;
        alert.sent_at = Some(content.sent_at);
        alert.subject = Some(content.subject.clone());
        alert.body_html = Some(content.body_html.clone());
        alert.body_text = Some(content.body_text.clone());
        alert.error_message = None;
        state.delivered.insert(id, content.clone());
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error_message: &str) -> AppResult<()> {
        self.state
            .lock()
            .await
            .close(id, AlertStatus::Failed, error_message)
    }

    async fn mark_skipped(&self, id: Uuid, reason: &str) -> AppResult<()> {
        self.state
            .lock()
            .await
            .close(id, AlertStatus::Skipped, reason)
    }

    async fn count_by_status(&self, tenant_id: Option<Uuid>) -> AppResult<Vec<(AlertStatus, i64)>> {
        let state = self.state.lock().await;
        state.check_available()?;
        let mut counts: HashMap<AlertStatus, i64> = HashMap::new();
        for alert in state
            .alerts
            .iter()
            .filter(|a| tenant_id.is_none_or(|t| a.tenant_id == t))
        {
            *counts.entry(alert.status).or_default() += 1;
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by_key(|(status, _)| status.as_str());
        Ok(counts)
    }
}

#[async_trait]
impl CommunicationStore for InMemoryStore {
    async fn trigger_entry(&self, key: &str) -> AppResult<Option<TriggerCatalogEntry>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.triggers.get(key).cloned())
    }

    async fn alert_config(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
    ) -> AppResult<Option<CommunicationAlert>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .alert_configs
            .iter()
            .filter(|c| c.tenant_id == tenant_id && c.trigger_event == trigger_event)
            .max_by_key(|c| c.updated_at)
            .cloned())
    }

    async fn template(
        &self,
        alert_config_id: Uuid,
        channel: Channel,
    ) -> AppResult<Option<CommunicationTemplate>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .templates
            .iter()
            .filter(|t| t.alert_id == alert_config_id && t.channel == channel.as_str())
            .max_by_key(|t| t.updated_at)
            .cloned())
    }
}

#[async_trait]
impl TenantStore for InMemoryStore {
    async fn settings(&self, tenant_id: Uuid) -> AppResult<Option<TenantSettings>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.settings.get(&tenant_id).cloned())
    }

    async fn branding(&self, tenant_id: Uuid) -> AppResult<Option<BrandingSettings>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.branding.get(&tenant_id).cloned())
    }
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn users_with_roles(&self, tenant_id: Uuid, roles: &[String]) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        state.check_available()?;
        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|(u, _)| u.tenant_id == tenant_id && u.deleted_at.is_none())
            .filter(|(_, held)| {
                held.iter()
                    .any(|h| roles.iter().any(|r| r.eq_ignore_ascii_case(h)))
            })
            .map(|(u, _)| u.clone())
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn find_user(&self, tenant_id: Uuid, user_id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .users
            .iter()
            .map(|(u, _)| u)
            .find(|u| u.id == user_id && u.tenant_id == tenant_id && u.deleted_at.is_none())
            .cloned())
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn account(&self, tenant_id: Uuid, account_id: Uuid) -> AppResult<Option<Account>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .accounts
            .iter()
            .find(|a| a.id == account_id && a.tenant_id == tenant_id)
            .cloned())
    }

    async fn client_alert_recipients(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
        account_name: &str,
    ) -> AppResult<Vec<String>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| {
                s.is_active
                    && s.tenant_id == tenant_id
                    && s.trigger_event == trigger_event
                    && s.account_name.eq_ignore_ascii_case(account_name)
            })
            .map(|s| s.email.clone())
            .collect())
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn load(&self, tenant_id: Uuid, entity: EntityRef) -> AppResult<Option<EntityRecord>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.record(tenant_id, entity).cloned())
    }

    async fn account_context(
        &self,
        tenant_id: Uuid,
        entity: EntityRef,
    ) -> AppResult<Option<AccountContext>> {
        let state = self.state.lock().await;
        state.check_available()?;
        let Some(record) = state.record(tenant_id, entity) else {
            return Ok(None);
        };
        let context = record_account_id(&state, tenant_id, record).and_then(|account_id| {
            state
                .accounts
                .iter()
                .find(|a| a.id == account_id && a.tenant_id == tenant_id)
                .map(|a| AccountContext {
                    account_id,
                    account_name: a.account_name.clone(),
                })
        });
        Ok(context)
    }

    async fn linked_item_ids(&self, tenant_id: Uuid, entity: EntityRef) -> AppResult<Vec<Uuid>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .item_links
            .get(&entity)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| state.item(tenant_id, *id).is_some())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn items_by_ids(&self, tenant_id: Uuid, ids: &[Uuid]) -> AppResult<Vec<Item>> {
        let state = self.state.lock().await;
        state.check_available()?;
        let mut items: Vec<Item> = ids
            .iter()
            .filter_map(|id| state.item(tenant_id, *id).cloned())
            .collect();
        items.sort_by(|a, b| a.item_code.cmp(&b.item_code));
        Ok(items)
    }

    async fn inspection_findings(
        &self,
        tenant_id: Uuid,
        item_ids: &[Uuid],
    ) -> AppResult<Vec<InspectionFinding>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .findings
            .iter()
            .filter(|f| item_ids.contains(&f.item_id) && state.item(tenant_id, f.item_id).is_some())
            .cloned()
            .collect())
    }

    async fn task_services(&self, tenant_id: Uuid, task_id: Uuid) -> AppResult<Vec<TaskServiceLine>> {
        let state = self.state.lock().await;
        state.check_available()?;
        let owned = state
            .records
            .get(&EntityRef::new(EntityKind::Task, task_id))
            .is_some_and(|(owner, _)| *owner == tenant_id);
        if !owned {
            return Ok(Vec::new());
        }
        Ok(state.task_services.get(&task_id).cloned().unwrap_or_default())
    }

    async fn repair_actions(&self, tenant_id: Uuid, quote_id: Uuid) -> AppResult<Vec<RepairAction>> {
        let state = self.state.lock().await;
        state.check_available()?;
        let owned = state
            .records
            .get(&EntityRef::new(EntityKind::RepairQuote, quote_id))
            .is_some_and(|(owner, _)| *owner == tenant_id);
        if !owned {
            return Ok(Vec::new());
        }
        Ok(state
            .repair_actions
            .get(&quote_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn create_in_app(&self, notifications: &[NewInAppNotification]) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.notifications.extend_from_slice(notifications);
        Ok(notifications.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn filter(tenant_id: Option<Uuid>, limit: u32) -> AlertQueueFilter {
        AlertQueueFilter {
            tenant_id,
            alert_id: None,
            limit,
        }
    }

    fn pending_alert(tenant_id: Uuid) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            tenant_id,
            alert_type: "shipment_received".to_string(),
            entity_type: None,
            entity_id: None,
            recipient_emails: None,
            subject: None,
            body_html: None,
            body_text: None,
            status: AlertStatus::Pending,
            error_message: None,
            sent_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_status_updates_require_claim() {
        let store = InMemoryStore::new();
        let alert = pending_alert(Uuid::new_v4());
        let id = alert.id;
        store.insert_alert(alert).await;

        let err = store.mark_skipped(id, "disabled").await.unwrap_err();
        assert_eq!(err.kind, warehub_core::error::ErrorKind::Conflict);

        store.claim_pending(&filter(None, 10)).await.unwrap();
        store.mark_skipped(id, "disabled").await.unwrap();
        let err = store.mark_failed(id, "late failure").await.unwrap_err();
        assert_eq!(err.kind, warehub_core::error::ErrorKind::Conflict);

        let stored = store.alert(id).await.unwrap();
        assert_eq!(stored.status, AlertStatus::Skipped);
        assert_eq!(stored.error_message.as_deref(), Some("disabled"));
    }

    #[tokio::test]
    async fn test_claim_pending_scopes_and_limits() {
        let store = InMemoryStore::new();
        let tenant = Uuid::new_v4();
        for _ in 0..3 {
            store.insert_alert(pending_alert(tenant)).await;
        }
        store.insert_alert(pending_alert(Uuid::new_v4())).await;

        let batch = store.claim_pending(&filter(Some(tenant), 2)).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|a| a.tenant_id == tenant));
        assert!(batch.iter().all(|a| a.status == AlertStatus::Processing));

        let rest = store.claim_pending(&filter(Some(tenant), 10)).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert!(batch.iter().all(|a| a.id != rest[0].id));
    }

    #[tokio::test]
    async fn test_concurrent_claims_never_share_alerts() {
        let store = InMemoryStore::new();
        let alert = pending_alert(Uuid::new_v4());
        store.insert_alert(alert.clone()).await;

        let wide = filter(None, 10);
        let (a, b) = tokio::join!(store.claim_pending(&wide), store.claim_pending(&wide));
        assert_eq!(a.unwrap().len() + b.unwrap().len(), 1);
        assert_eq!(store.alert(alert.id).await.unwrap().status, AlertStatus::Processing);
    }

    #[tokio::test]
    async fn test_rejected_sent_update_leaves_claim() {
        let store = InMemoryStore::new();
        let alert = pending_alert(Uuid::new_v4());
        store.insert_alert(alert.clone()).await;
        store.claim_pending(&filter(None, 10)).await.unwrap();
        store.set_reject_mark_sent(true).await;

        let content = DeliveredContent {
            subject: "Shipment received".to_string(),
            body_html: "<p>ok</p>".to_string(),
            body_text: "ok".to_string(),
            recipients: vec!["ops@acme.test".to_string()],
            provider_message_id: None,
            sent_at: Utc::now(),
        };
        assert!(store.mark_sent(alert.id, &content).await.is_err());
        assert_eq!(store.alert(alert.id).await.unwrap().status, AlertStatus::Processing);
        assert!(store.claim_pending(&filter(None, 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_errors() {
        let store = InMemoryStore::new();
        store.set_unavailable(true).await;
        assert!(store.claim_pending(&AlertQueueFilter::default()).await.is_err());
    }
}
