//! Self-contained HTML tables embedded in alert emails.
//!
//! Every generator returns either a table or a one-line placeholder; the
//! output is never empty, so a template slot never collapses silently.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use warehub_database::RecordStore;
use warehub_entity::record::{InspectionFinding, Item, RepairAction, TaskServiceLine};

use super::format::{format_currency, format_opt_currency, format_opt_date, format_quantity, or_na};
use super::renderer::escape;

const TABLE_STYLE: &str =
    "width:100%;border-collapse:collapse;font-family:Arial,Helvetica,sans-serif;font-size:13px;margin:12px 0;";
const HEAD_STYLE: &str =
    "text-align:left;padding:8px 10px;background-color:#f1f5f9;border-bottom:2px solid #e2e8f0;color:#334155;";
const CELL_STYLE: &str = "padding:8px 10px;border-bottom:1px solid #e2e8f0;color:#1e293b;";
const STRIPE_COLOR: &str = "#f8fafc";

/// Placeholder shown when there are no items.
pub const NO_ITEMS: &str = r#"<p style="color:#64748b;font-style:italic;margin:12px 0;">No items</p>"#;
/// Placeholder shown when there are no inspection findings.
pub const NO_FINDINGS: &str =
    r#"<p style="color:#64748b;font-style:italic;margin:12px 0;">No inspection findings</p>"#;
/// Placeholder shown when a task has no billable services.
pub const NO_SERVICES: &str =
    r#"<p style="color:#64748b;font-style:italic;margin:12px 0;">No services recorded</p>"#;
/// Placeholder shown when a repair quote has no actions.
pub const NO_REPAIR_ACTIONS: &str =
    r#"<p style="color:#64748b;font-style:italic;margin:12px 0;">No repair actions</p>"#;

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut html = format!(r#"<table role="presentation" style="{TABLE_STYLE}"><thead><tr>"#);
    for header in headers {
        html.push_str(&format!(r#"<th style="{HEAD_STYLE}">{}</th>"#, escape(header)));
    }
    html.push_str("</tr></thead><tbody>");
    for (index, row) in rows.iter().enumerate() {
        if index % 2 == 1 {
            html.push_str(&format!(r#"<tr style="background-color:{STRIPE_COLOR};">"#));
        } else {
            html.push_str("<tr>");
        }
        for cell in row {
            html.push_str(&format!(r#"<td style="{CELL_STYLE}">{}</td>"#, escape(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Items: code, description, sidemark, location.
pub fn items_table_html(items: &[Item]) -> String {
    if items.is_empty() {
        return NO_ITEMS.to_string();
    }
    let rows = items
        .iter()
        .map(|i| {
            vec![
                i.item_code.clone(),
                or_na(i.description.as_deref()),
                or_na(i.sidemark.as_deref()),
                or_na(i.location_code.as_deref()),
            ]
        })
        .collect();
    table(&["Item", "Description", "Sidemark", "Location"], rows)
}

/// Inspection findings: item, condition, notes, photos.
pub fn inspection_findings_html(findings: &[InspectionFinding]) -> String {
    if findings.is_empty() {
        return NO_FINDINGS.to_string();
    }
    let rows = findings
        .iter()
        .map(|f| {
            vec![
                f.item_code.clone(),
                or_na(f.condition.as_deref()),
                or_na(f.notes.as_deref()),
                f.photo_count.to_string(),
            ]
        })
        .collect();
    table(&["Item", "Condition", "Notes", "Photos"], rows)
}

/// Task services: service, quantity, rate, total, with a grand total row.
pub fn task_services_html(lines: &[TaskServiceLine]) -> String {
    if lines.is_empty() {
        return NO_SERVICES.to_string();
    }
    let mut grand_total = 0.0;
    let mut rows: Vec<Vec<String>> = lines
        .iter()
        .map(|l| {
            let total = l.total.or(l.rate.map(|r| r * l.quantity));
            grand_total += total.unwrap_or_default();
            vec![
                l.service_name.clone(),
                format_quantity(l.quantity),
                format_opt_currency(l.rate),
                format_opt_currency(total),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".to_string(),
        String::new(),
        String::new(),
        format_currency(grand_total),
    ]);
    table(&["Service", "Qty", "Rate", "Total"], rows)
}

/// Repair actions: action, notes, estimated cost.
pub fn repair_actions_html(actions: &[RepairAction]) -> String {
    if actions.is_empty() {
        return NO_REPAIR_ACTIONS.to_string();
    }
    let rows = actions
        .iter()
        .map(|a| {
            vec![
                a.action.clone(),
                or_na(a.notes.as_deref()),
                format_opt_currency(a.estimated_cost),
            ]
        })
        .collect();
    table(&["Action", "Notes", "Estimated Cost"], rows)
}

/// Loads table data through a record store and renders it.
///
/// Lookup failures are logged and rendered as the placeholder.
#[derive(Clone)]
pub struct TableGenerator {
    records: Arc<dyn RecordStore>,
}

impl TableGenerator {
    /// Creates a new generator.
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Items table for the given item IDs.
    pub async fn items_table(&self, tenant_id: Uuid, item_ids: &[Uuid]) -> String {
        if item_ids.is_empty() {
            return NO_ITEMS.to_string();
        }
        match self.records.items_by_ids(tenant_id, item_ids).await {
            Ok(items) => items_table_html(&items),
            Err(e) => {
                warn!(%tenant_id, error = %e, "Failed to load items for table");
                NO_ITEMS.to_string()
            }
        }
    }

    /// Inspection findings table for the given item IDs.
    pub async fn inspection_findings_table(&self, tenant_id: Uuid, item_ids: &[Uuid]) -> String {
        if item_ids.is_empty() {
            return NO_FINDINGS.to_string();
        }
        match self.records.inspection_findings(tenant_id, item_ids).await {
            Ok(findings) => inspection_findings_html(&findings),
            Err(e) => {
                warn!(%tenant_id, error = %e, "Failed to load inspection findings for table");
                NO_FINDINGS.to_string()
            }
        }
    }

    /// Billable services table for a task.
    pub async fn task_services_table(&self, tenant_id: Uuid, task_id: Uuid) -> String {
        match self.records.task_services(tenant_id, task_id).await {
            Ok(lines) => task_services_html(&lines),
            Err(e) => {
                warn!(%tenant_id, %task_id, error = %e, "Failed to load task services for table");
                NO_SERVICES.to_string()
            }
        }
    }

    /// Repair actions table for a quote.
    pub async fn repair_actions_table(&self, tenant_id: Uuid, quote_id: Uuid) -> String {
        match self.records.repair_actions(tenant_id, quote_id).await {
            Ok(actions) => repair_actions_html(&actions),
            Err(e) => {
                warn!(%tenant_id, %quote_id, error = %e, "Failed to load repair actions for table");
                NO_REPAIR_ACTIONS.to_string()
            }
        }
    }
}

impl std::fmt::Debug for TableGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableGenerator").finish_non_exhaustive()
    }
}
