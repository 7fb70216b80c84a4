//! Template variable construction.
//!
//! Defaults (tenant, branding, office, portal links, dates) are always
//! populated first. The alert's entity is then loaded as a typed
//! [`EntityRecord`] and enriched by an exhaustive match over its kind.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use warehub_database::{AccountStore, DirectoryStore, RecordStore, TenantStore};
use warehub_entity::record::{
    BillingEvent, Claim, EntityKind, EntityRecord, EntityRef, Invoice, Item, Release,
    RepairQuote, Shipment, Task,
};
use warehub_entity::tenant::{BrandingSettings, TenantSettings};

use super::format::{
    NOT_AVAILABLE, days_overdue, format_date, format_opt_currency, format_opt_date,
    format_quantity, format_timestamp, humanize, or_empty, or_na,
};
use super::renderer::Variables;
use super::tables::{NO_FINDINGS, NO_ITEMS, NO_REPAIR_ACTIONS, NO_SERVICES, TableGenerator};

const DEFAULT_PRIMARY_COLOR: &str = "#1d4ed8";
const DEFAULT_TENANT_NAME: &str = "Your Warehouse";

/// Every variable name the builder can produce.
pub const KNOWN_VARIABLES: &[&str] = &[
    // tenant and branding
    "tenant_name",
    "company_name",
    "company_email",
    "company_phone",
    "company_address",
    "brand_logo_url",
    "brand_primary_color",
    "brand_support_email",
    "portal_base_url",
    "portal_url",
    "current_date",
    "current_year",
    // alert
    "alert_type",
    "alert_title",
    "entity_type",
    "entity_id",
    "entity_url",
    "account_name",
    "account_code",
    "items_count",
    // shipment
    "shipment_number",
    "shipment_type",
    "shipment_status",
    "shipment_carrier",
    "shipment_tracking_number",
    "shipment_po_number",
    "shipment_expected_date",
    "shipment_received_date",
    "shipment_notes",
    "shipment_url",
    // item
    "item_code",
    "item_description",
    "item_sidemark",
    "item_vendor",
    "item_location",
    "item_status",
    "item_received_date",
    "item_url",
    // task
    "task_title",
    "task_type",
    "task_status",
    "task_priority",
    "task_due_date",
    "task_assigned_to",
    "task_description",
    "task_completed_date",
    "task_days_overdue",
    "task_url",
    // invoice
    "invoice_number",
    "invoice_status",
    "invoice_total",
    "invoice_due_date",
    "invoice_period",
    "invoice_days_overdue",
    "invoice_url",
    // release
    "release_number",
    "release_status",
    "release_type",
    "release_to_name",
    "release_scheduled_date",
    "release_url",
    // claim
    "claim_number",
    "claim_status",
    "claim_type",
    "claim_description",
    "claim_amount",
    "claim_url",
    // repair
    "repair_quote_status",
    "repair_total",
    "repair_technician",
    "repair_notes",
    "repair_expires_date",
    "repair_url",
    // billing event
    "billing_charge_type",
    "billing_description",
    "billing_quantity",
    "billing_unit_rate",
    "billing_total",
    "billing_date",
    // overdue alias
    "days_overdue",
    // html fragments
    "items_table_html",
    "inspection_findings_html",
    "task_services_html",
    "repair_actions_html",
];

/// Variables for one alert plus the items they reference.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateVariables {
    /// Flat key/value map.
    pub variables: Variables,
    /// Items associated with the alert's entity.
    pub item_ids: Vec<Uuid>,
}

impl TemplateVariables {
    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.variables.insert(key.to_string(), value.into());
    }
}

/// Builds the variable map for an alert.
#[derive(Clone)]
pub struct VariableBuilder {
    tenants: Arc<dyn TenantStore>,
    records: Arc<dyn RecordStore>,
    accounts: Arc<dyn AccountStore>,
    directory: Arc<dyn DirectoryStore>,
    tables: TableGenerator,
    default_portal_url: String,
    default_tenant_name: String,
}

impl VariableBuilder {
    /// Creates a new builder.
    pub fn new(
        tenants: Arc<dyn TenantStore>,
        records: Arc<dyn RecordStore>,
        accounts: Arc<dyn AccountStore>,
        directory: Arc<dyn DirectoryStore>,
        default_portal_url: impl Into<String>,
    ) -> Self {
        let tables = TableGenerator::new(records.clone());
        Self {
            tenants,
            records,
            accounts,
            directory,
            tables,
            default_portal_url: default_portal_url.into(),
            default_tenant_name: DEFAULT_TENANT_NAME.to_string(),
        }
    }

    /// Name used for tenants with neither a company name nor a sender name.
    ///
    /// A blank name keeps the built-in label.
    pub fn with_default_tenant_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.default_tenant_name = name.trim().to_string();
        }
        self
    }

    /// Build variables for an alert as of today.
    pub async fn build(
        &self,
        alert_type: &str,
        entity: Option<EntityRef>,
        tenant_id: Uuid,
    ) -> TemplateVariables {
        self.build_at(alert_type, entity, tenant_id, Utc::now().date_naive())
            .await
    }

    /// Build variables for an alert as of `today`.
    pub async fn build_at(
        &self,
        alert_type: &str,
        entity: Option<EntityRef>,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> TemplateVariables {
        let mut vars = TemplateVariables::default();
        let portal = self.defaults(&mut vars, alert_type, tenant_id, today).await;

        let Some(entity) = entity else {
            return vars;
        };
        vars.set("entity_type", entity.kind.as_str());
        vars.set("entity_id", entity.id.to_string());
        vars.set("entity_url", entity.portal_url(&portal));

        let record = match self.records.load(tenant_id, entity).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(entity_type = %entity.kind, entity_id = %entity.id, "Alert entity not found");
                return vars;
            }
            Err(e) => {
                warn!(entity_type = %entity.kind, entity_id = %entity.id, error = %e, "Failed to load alert entity");
                return vars;
            }
        };

        let url = entity.portal_url(&portal);
        match &record {
            EntityRecord::Shipment(s) => self.shipment(&mut vars, tenant_id, s, url).await,
            EntityRecord::Item(i) => self.item(&mut vars, tenant_id, i, url).await,
            EntityRecord::Task(t) => self.task(&mut vars, tenant_id, t, url, today).await,
            EntityRecord::Invoice(i) => self.invoice(&mut vars, tenant_id, i, url, today).await,
            EntityRecord::Release(r) => self.release(&mut vars, tenant_id, r, url).await,
            EntityRecord::Claim(c) => self.claim(&mut vars, tenant_id, c, url).await,
            EntityRecord::RepairQuote(q) => {
                self.repair_quote(&mut vars, tenant_id, q, url, &portal, alert_type)
                    .await
            }
            EntityRecord::BillingEvent(b) => self.billing_event(&mut vars, tenant_id, b).await,
        }
        vars
    }

    /// Populate defaults and return the portal base URL in effect.
    async fn defaults(
        &self,
        vars: &mut TemplateVariables,
        alert_type: &str,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> String {
        let settings = match self.tenants.settings(tenant_id).await {
            Ok(settings) => settings.unwrap_or_default(),
            Err(e) => {
                warn!(%tenant_id, error = %e, "Failed to load tenant settings for variables");
                TenantSettings::default()
            }
        };
        let branding = match self.tenants.branding(tenant_id).await {
            Ok(branding) => branding.unwrap_or_default(),
            Err(e) => {
                warn!(%tenant_id, error = %e, "Failed to load branding for variables");
                BrandingSettings::default()
            }
        };

        let tenant_name = tenant_display_name(&settings, &branding, &self.default_tenant_name);
        let portal = branding
            .portal_base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(self.default_portal_url.as_str())
            .trim_end_matches('/')
            .to_string();
        let support_email = branding
            .brand_support_email
            .as_deref()
            .or(settings.company_email.as_deref());

        vars.set("tenant_name", tenant_name.clone());
        vars.set("company_name", tenant_name);
        vars.set("company_email", or_empty(settings.company_email.as_deref()));
        vars.set("company_phone", or_empty(settings.company_phone.as_deref()));
        vars.set("company_address", or_empty(settings.company_address.as_deref()));
        vars.set("brand_logo_url", or_empty(branding.brand_logo_url.as_deref()));
        vars.set(
            "brand_primary_color",
            branding
                .brand_primary_color
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_PRIMARY_COLOR),
        );
        vars.set("brand_support_email", or_empty(support_email));
        vars.set("portal_base_url", portal.clone());
        vars.set("portal_url", portal.clone());
        vars.set("current_date", format_date(today));
        vars.set("current_year", today.year().to_string());
        vars.set("alert_type", alert_type);
        vars.set("alert_title", humanize(alert_type));
        vars.set("account_name", NOT_AVAILABLE);
        vars.set("account_code", NOT_AVAILABLE);
        vars.set("items_count", "0");
        vars.set("items_table_html", NO_ITEMS);
        vars.set("inspection_findings_html", NO_FINDINGS);
        vars.set("task_services_html", NO_SERVICES);
        vars.set("repair_actions_html", NO_REPAIR_ACTIONS);
        portal
    }

    async fn account(&self, vars: &mut TemplateVariables, tenant_id: Uuid, account_id: Option<Uuid>) {
        let Some(account_id) = account_id else {
            return;
        };
        match self.accounts.account(tenant_id, account_id).await {
            Ok(Some(account)) => {
                vars.set("account_name", account.account_name);
                vars.set("account_code", or_na(account.account_code.as_deref()));
            }
            Ok(None) => {}
            Err(e) => warn!(%tenant_id, %account_id, error = %e, "Failed to load account for variables"),
        }
    }

    async fn linked_items(&self, vars: &mut TemplateVariables, tenant_id: Uuid, entity: EntityRef) {
        let ids = match self.records.linked_item_ids(tenant_id, entity).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(entity_type = %entity.kind, entity_id = %entity.id, error = %e, "Failed to load linked items");
                Vec::new()
            }
        };
        self.set_items(vars, tenant_id, ids).await;
    }

    async fn set_items(&self, vars: &mut TemplateVariables, tenant_id: Uuid, ids: Vec<Uuid>) {
        vars.set("items_count", ids.len().to_string());
        vars.set("items_table_html", self.tables.items_table(tenant_id, &ids).await);
        vars.set(
            "inspection_findings_html",
            self.tables.inspection_findings_table(tenant_id, &ids).await,
        );
        vars.item_ids = ids;
    }

    async fn shipment(&self, vars: &mut TemplateVariables, tenant_id: Uuid, s: &Shipment, url: String) {
        vars.set("shipment_number", s.shipment_number.clone());
        vars.set("shipment_type", or_na(s.shipment_type.as_deref()));
        vars.set("shipment_status", or_na(s.status.as_deref()));
        vars.set("shipment_carrier", or_na(s.carrier.as_deref()));
        vars.set("shipment_tracking_number", or_na(s.tracking_number.as_deref()));
        vars.set("shipment_po_number", or_na(s.po_number.as_deref()));
        vars.set("shipment_expected_date", format_opt_date(s.expected_arrival_date));
        vars.set(
            "shipment_received_date",
            s.received_at
                .map(format_timestamp)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
        vars.set("shipment_notes", or_empty(s.notes.as_deref()));
        vars.set("shipment_url", url);
        self.account(vars, tenant_id, s.account_id).await;
        self.linked_items(vars, tenant_id, EntityRef::new(EntityKind::Shipment, s.id))
            .await;
    }

    async fn item(&self, vars: &mut TemplateVariables, tenant_id: Uuid, i: &Item, url: String) {
        set_item_fields(vars, i);
        vars.set("item_url", url);
        self.account(vars, tenant_id, i.account_id).await;
        self.set_items(vars, tenant_id, vec![i.id]).await;
    }

    async fn task(
        &self,
        vars: &mut TemplateVariables,
        tenant_id: Uuid,
        t: &Task,
        url: String,
        today: NaiveDate,
    ) {
        vars.set("task_title", t.title.clone());
        vars.set("task_type", or_na(t.task_type.as_deref()));
        vars.set("task_status", or_na(t.status.as_deref()));
        vars.set("task_priority", or_na(t.priority.as_deref()));
        vars.set("task_due_date", format_opt_date(t.due_date));
        vars.set("task_description", or_empty(t.description.as_deref()));
        vars.set(
            "task_completed_date",
            t.completed_at
                .map(format_timestamp)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
        let overdue = t
            .due_date
            .map(|due| days_overdue(due, today))
            .unwrap_or_default()
            .to_string();
        vars.set("task_days_overdue", overdue.clone());
        vars.set("days_overdue", overdue);
        vars.set("task_url", url);

        let assignee = match t.assigned_to {
            Some(user_id) => match self.directory.find_user(tenant_id, user_id).await {
                Ok(Some(user)) => user.display_name(),
                Ok(None) => NOT_AVAILABLE.to_string(),
                Err(e) => {
                    warn!(%tenant_id, %user_id, error = %e, "Failed to load task assignee");
                    NOT_AVAILABLE.to_string()
                }
            },
            None => "Unassigned".to_string(),
        };
        vars.set("task_assigned_to", assignee);

        self.account(vars, tenant_id, t.account_id).await;
        self.linked_items(vars, tenant_id, EntityRef::new(EntityKind::Task, t.id))
            .await;
        vars.set(
            "task_services_html",
            self.tables.task_services_table(tenant_id, t.id).await,
        );
    }

    async fn invoice(
        &self,
        vars: &mut TemplateVariables,
        tenant_id: Uuid,
        i: &Invoice,
        url: String,
        today: NaiveDate,
    ) {
        vars.set("invoice_number", i.invoice_number.clone());
        vars.set("invoice_status", or_na(i.status.as_deref()));
        vars.set("invoice_total", format_opt_currency(i.total_amount));
        vars.set("invoice_due_date", format_opt_date(i.due_date));
        let period = match (i.period_start, i.period_end) {
            (Some(start), Some(end)) => format!("{} - {}", format_date(start), format_date(end)),
            (Some(start), None) => format_date(start),
            (None, Some(end)) => format_date(end),
            (None, None) => NOT_AVAILABLE.to_string(),
        };
        vars.set("invoice_period", period);
        let overdue = i
            .due_date
            .map(|due| days_overdue(due, today))
            .unwrap_or_default()
            .to_string();
        vars.set("invoice_days_overdue", overdue.clone());
        vars.set("days_overdue", overdue);
        vars.set("invoice_url", url);
        self.account(vars, tenant_id, i.account_id).await;
    }

    async fn release(&self, vars: &mut TemplateVariables, tenant_id: Uuid, r: &Release, url: String) {
        vars.set("release_number", r.release_number.clone());
        vars.set("release_status", or_na(r.status.as_deref()));
        vars.set("release_type", or_na(r.release_type.as_deref()));
        vars.set("release_to_name", or_na(r.release_to_name.as_deref()));
        vars.set("release_scheduled_date", format_opt_date(r.scheduled_date));
        vars.set("release_url", url);
        self.account(vars, tenant_id, r.account_id).await;
        self.linked_items(vars, tenant_id, EntityRef::new(EntityKind::Release, r.id))
            .await;
    }

    async fn claim(&self, vars: &mut TemplateVariables, tenant_id: Uuid, c: &Claim, url: String) {
        vars.set("claim_number", c.claim_number.clone());
        vars.set("claim_status", or_na(c.status.as_deref()));
        vars.set("claim_type", or_na(c.claim_type.as_deref()));
        vars.set("claim_description", or_empty(c.description.as_deref()));
        vars.set("claim_amount", format_opt_currency(c.claimed_amount));
        vars.set("claim_url", url);
        self.account(vars, tenant_id, c.account_id).await;
    }

    async fn repair_quote(
        &self,
        vars: &mut TemplateVariables,
        tenant_id: Uuid,
        q: &RepairQuote,
        url: String,
        portal: &str,
        alert_type: &str,
    ) {
        if let Some(item_id) = q.item_id {
            let item_ref = EntityRef::new(EntityKind::Item, item_id);
            match self.records.load(tenant_id, item_ref).await {
                Ok(Some(EntityRecord::Item(item))) => {
                    set_item_fields(vars, &item);
                    vars.set("item_url", item_ref.portal_url(portal));
                    self.account(vars, tenant_id, item.account_id).await;
                }
                Ok(_) => debug!(%item_id, "Repair quote item not found"),
                Err(e) => warn!(%item_id, error = %e, "Failed to load repair quote item"),
            }
            self.set_items(vars, tenant_id, vec![item_id]).await;
        }

        if !alert_type.starts_with("repair") {
            return;
        }
        vars.set("repair_quote_status", or_na(q.status.as_deref()));
        vars.set("repair_total", format_opt_currency(q.total_amount));
        vars.set("repair_technician", or_na(q.technician_name.as_deref()));
        vars.set("repair_notes", or_empty(q.notes.as_deref()));
        vars.set("repair_expires_date", format_opt_date(q.expires_on));
        vars.set("repair_url", url);
        vars.set(
            "repair_actions_html",
            self.tables.repair_actions_table(tenant_id, q.id).await,
        );
    }

    async fn billing_event(&self, vars: &mut TemplateVariables, tenant_id: Uuid, b: &BillingEvent) {
        vars.set("billing_charge_type", or_na(b.charge_type.as_deref()));
        vars.set("billing_description", or_empty(b.description.as_deref()));
        vars.set(
            "billing_quantity",
            b.quantity
                .map(format_quantity)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
        vars.set("billing_unit_rate", format_opt_currency(b.unit_rate));
        vars.set("billing_total", format_opt_currency(b.total_amount));
        vars.set(
            "billing_date",
            b.occurred_at
                .map(format_timestamp)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
        self.account(vars, tenant_id, b.account_id).await;
    }
}

impl std::fmt::Debug for VariableBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableBuilder")
            .field("default_portal_url", &self.default_portal_url)
            .field("default_tenant_name", &self.default_tenant_name)
            .finish_non_exhaustive()
    }
}

fn set_item_fields(vars: &mut TemplateVariables, i: &Item) {
    vars.set("item_code", i.item_code.clone());
    vars.set("item_description", or_na(i.description.as_deref()));
    vars.set("item_sidemark", or_na(i.sidemark.as_deref()));
    vars.set("item_vendor", or_na(i.vendor.as_deref()));
    vars.set("item_location", or_na(i.location_code.as_deref()));
    vars.set("item_status", or_na(i.status.as_deref()));
    vars.set("item_received_date", format_opt_date(i.received_date));
}

/// Display name for a tenant: company name, then sender name, then `fallback`.
pub fn tenant_display_name(
    settings: &TenantSettings,
    branding: &BrandingSettings,
    fallback: &str,
) -> String {
    [settings.company_name.as_deref(), branding.from_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|n| !n.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use warehub_database::InMemoryStore;
    use warehub_entity::account::Account;
    use warehub_entity::record::{InspectionFinding, RepairAction, TaskServiceLine};

    use super::*;

    struct Fixture {
        store: InMemoryStore,
        builder: VariableBuilder,
        tenant_id: Uuid,
        account_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let tenant_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        store
            .set_settings(TenantSettings {
                tenant_id,
                company_name: Some("Acme Storage".to_string()),
                ..Default::default()
            })
            .await;
        store
            .insert_account(Account {
                id: account_id,
                tenant_id,
                account_name: "Harbor Furniture".to_string(),
                account_code: Some("HARB".to_string()),
                primary_contact_name: None,
                primary_contact_email: None,
                alerts_contact_email: None,
                alerts_contact_name: None,
                additional_alert_emails: None,
            })
            .await;
        let builder = VariableBuilder::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            "https://app.warehub.app",
        );
        Fixture {
            store,
            builder,
            tenant_id,
            account_id,
        }
    }

    fn task(tenant_id: Uuid, account_id: Uuid, due_date: NaiveDate) -> Task {
        Task {
            id: Uuid::new_v4(),
            tenant_id,
            title: "Inspect inbound pallets".to_string(),
            task_type: Some("inspection".to_string()),
            status: Some("open".to_string()),
            priority: None,
            due_date: Some(due_date),
            assigned_to: None,
            account_id: Some(account_id),
            description: None,
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_defaults_without_entity() {
        let f = fixture().await;
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let vars = f
            .builder
            .build_at("shipment_received", None, f.tenant_id, today)
            .await;
        let v = &vars.variables;
        assert_eq!(v["tenant_name"], "Acme Storage");
        assert_eq!(v["current_date"], "Jan 5, 2026");
        assert_eq!(v["current_year"], "2026");
        assert_eq!(v["alert_title"], "Shipment Received");
        assert_eq!(v["portal_url"], "https://app.warehub.app");
        assert_eq!(v["items_table_html"], NO_ITEMS);
        assert!(vars.item_ids.is_empty());
    }

    fn stored_item(tenant_id: Uuid, account_id: Uuid, code: &str, sidemark: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            tenant_id,
            item_code: code.to_string(),
            description: Some("Walnut dresser".to_string()),
            account_id: Some(account_id),
            sidemark: Some(sidemark.to_string()),
            vendor: None,
            location_code: Some("A-01-03".to_string()),
            status: Some("in_storage".to_string()),
            received_date: None,
        }
    }

    #[tokio::test]
    async fn test_shipment_lists_linked_items_and_findings() {
        let f = fixture().await;
        let first = stored_item(f.tenant_id, f.account_id, "HARB-002", "Lobby");
        let second = stored_item(f.tenant_id, f.account_id, "HARB-001", "Suite 400");
        let shipment = Shipment {
            id: Uuid::new_v4(),
            tenant_id: f.tenant_id,
            shipment_number: "SHP-00042".to_string(),
            shipment_type: Some("inbound".to_string()),
            status: Some("received".to_string()),
            account_id: Some(f.account_id),
            carrier: None,
            tracking_number: None,
            po_number: None,
            expected_arrival_date: None,
            received_at: None,
            notes: None,
        };
        let entity = EntityRef::new(EntityKind::Shipment, shipment.id);
        f.store
            .insert_finding(InspectionFinding {
                item_id: first.id,
                item_code: first.item_code.clone(),
                condition: Some("Scratched top".to_string()),
                notes: Some("Left corner".to_string()),
                photo_count: 2,
            })
            .await;
        // Linked but never stored under this tenant.
        let stray = Uuid::new_v4();
        f.store.link_items(entity, vec![first.id, second.id, stray]).await;
        f.store.insert_record(f.tenant_id, EntityRecord::Item(first.clone())).await;
        f.store.insert_record(f.tenant_id, EntityRecord::Item(second.clone())).await;
        f.store
            .insert_record(f.tenant_id, EntityRecord::Shipment(shipment))
            .await;

        let vars = f
            .builder
            .build_at("shipment_received", Some(entity), f.tenant_id, Utc::now().date_naive())
            .await;
        let v = &vars.variables;
        assert_eq!(vars.item_ids, vec![first.id, second.id]);
        assert_eq!(v["items_count"], "2");
        assert_eq!(v["shipment_number"], "SHP-00042");
        assert_eq!(v["account_name"], "Harbor Furniture");

        let table = &v["items_table_html"];
        let (a, b) = (table.find("HARB-001").unwrap(), table.find("HARB-002").unwrap());
        assert!(a < b);
        assert!(table.contains("Suite 400"));
        assert!(table.contains("A-01-03"));

        let findings = &v["inspection_findings_html"];
        assert_ne!(findings, NO_FINDINGS);
        assert!(findings.contains("Scratched top"));
        assert!(findings.contains("HARB-002"));
    }

    #[tokio::test]
    async fn test_task_lists_services_with_total() {
        let f = fixture().await;
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let t = task(f.tenant_id, f.account_id, today);
        let entity = EntityRef::new(EntityKind::Task, t.id);
        f.store
            .insert_task_service(
                t.id,
                TaskServiceLine {
                    service_name: "Receiving".to_string(),
                    quantity: 3.0,
                    rate: Some(25.0),
                    total: None,
                },
            )
            .await;
        f.store
            .insert_task_service(
                t.id,
                TaskServiceLine {
                    service_name: "Assembly".to_string(),
                    quantity: 1.0,
                    rate: None,
                    total: Some(1200.0),
                },
            )
            .await;
        f.store.insert_record(f.tenant_id, EntityRecord::Task(t)).await;

        let vars = f
            .builder
            .build_at("task_overdue", Some(entity), f.tenant_id, today)
            .await;
        let services = &vars.variables["task_services_html"];
        assert!(services.contains("Receiving"));
        assert!(services.contains("$75.00"));
        assert!(services.contains("Total"));
        assert!(services.contains("$1,275.00"));
        assert_eq!(vars.variables["items_count"], "0");
    }

    #[tokio::test]
    async fn test_unnamed_tenant_uses_fallback_name() {
        let f = fixture().await;
        let unnamed = Uuid::new_v4();
        let today = Utc::now().date_naive();

        let vars = f.builder.build_at("shipment_received", None, unnamed, today).await;
        assert_eq!(vars.variables["tenant_name"], DEFAULT_TENANT_NAME);

        let named = f.builder.clone().with_default_tenant_name("  Northside Storage ");
        let vars = named.build_at("shipment_received", None, unnamed, today).await;
        assert_eq!(vars.variables["tenant_name"], "Northside Storage");

        let blank = f.builder.clone().with_default_tenant_name(" ");
        let vars = blank.build_at("shipment_received", None, unnamed, today).await;
        assert_eq!(vars.variables["tenant_name"], DEFAULT_TENANT_NAME);

        assert_eq!(
            tenant_display_name(&TenantSettings::default(), &BrandingSettings::default(), "Warehub"),
            "Warehub"
        );
    }

    #[tokio::test]
    async fn test_task_overdue_days() {
        let f = fixture().await;
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let t = task(f.tenant_id, f.account_id, today - Duration::days(3));
        let entity = EntityRef::new(EntityKind::Task, t.id);
        f.store.insert_record(f.tenant_id, EntityRecord::Task(t)).await;

        let vars = f
            .builder
            .build_at("task_overdue", Some(entity), f.tenant_id, today)
            .await;
        assert_eq!(vars.variables["task_days_overdue"], "3");
        assert_eq!(vars.variables["account_name"], "Harbor Furniture");
        assert_eq!(vars.variables["task_assigned_to"], "Unassigned");
        assert_eq!(vars.variables["task_services_html"], NO_SERVICES);
    }

    #[tokio::test]
    async fn test_future_due_date_is_not_overdue() {
        let f = fixture().await;
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let t = task(f.tenant_id, f.account_id, today + Duration::days(2));
        let entity = EntityRef::new(EntityKind::Task, t.id);
        f.store.insert_record(f.tenant_id, EntityRecord::Task(t)).await;

        let vars = f
            .builder
            .build_at("task_overdue", Some(entity), f.tenant_id, today)
            .await;
        assert_eq!(vars.variables["task_days_overdue"], "0");
    }

    #[tokio::test]
    async fn test_repair_fields_only_for_repair_alerts() {
        let f = fixture().await;
        let quote = RepairQuote {
            id: Uuid::new_v4(),
            tenant_id: f.tenant_id,
            item_id: None,
            status: Some("pending_approval".to_string()),
            total_amount: Some(1250.0),
            technician_name: Some("Dana".to_string()),
            notes: None,
            expires_on: None,
        };
        let entity = EntityRef::new(EntityKind::RepairQuote, quote.id);
        f.store
            .insert_repair_action(
                quote.id,
                RepairAction {
                    action: "Re-glue leg".to_string(),
                    notes: None,
                    estimated_cost: Some(80.0),
                },
            )
            .await;
        f.store
            .insert_record(f.tenant_id, EntityRecord::RepairQuote(quote))
            .await;

        let today = Utc::now().date_naive();
        let repair = f
            .builder
            .build_at("repair_quote_ready", Some(entity), f.tenant_id, today)
            .await;
        assert_eq!(repair.variables["repair_total"], "$1,250.00");
        assert!(repair.variables["repair_actions_html"].contains("Re-glue leg"));

        let other = f
            .builder
            .build_at("claim_filed", Some(entity), f.tenant_id, today)
            .await;
        assert!(!other.variables.contains_key("repair_total"));
        assert_eq!(other.variables["repair_actions_html"], NO_REPAIR_ACTIONS);
    }

    #[tokio::test]
    async fn test_missing_entity_keeps_defaults() {
        let f = fixture().await;
        let entity = EntityRef::new(EntityKind::Shipment, Uuid::new_v4());
        let vars = f
            .builder
            .build_at("shipment_received", Some(entity), f.tenant_id, Utc::now().date_naive())
            .await;
        assert_eq!(vars.variables["entity_type"], "shipment");
        assert!(!vars.variables.contains_key("shipment_number"));
        assert_eq!(vars.variables["account_name"], "N/A");
    }

    #[tokio::test]
    async fn test_every_produced_key_is_known() {
        let f = fixture().await;
        let today = Utc::now().date_naive();
        let t = task(f.tenant_id, f.account_id, today);
        let entity = EntityRef::new(EntityKind::Task, t.id);
        f.store.insert_record(f.tenant_id, EntityRecord::Task(t)).await;

        let vars = f
            .builder
            .build_at("task_overdue", Some(entity), f.tenant_id, today)
            .await;
        for key in vars.variables.keys() {
            assert!(KNOWN_VARIABLES.contains(&key.as_str()), "{key} missing from catalog");
        }
    }
}
