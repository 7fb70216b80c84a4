//! Bundled email templates used when a tenant has no custom template.
//!
//! Templates are written with canonical `{{key}}` placeholders and wrapped in
//! a branded layout. Styles are inline only.

/// A subject and HTML body pair before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledTemplate {
    /// Subject template.
    pub subject: String,
    /// HTML body template.
    pub body_html: String,
}

impl BundledTemplate {
    fn new(subject: &str, heading: &str, content: &str) -> Self {
        Self {
            subject: subject.to_string(),
            body_html: layout(heading, content),
        }
    }
}

/// Wrap content in the branded email layout.
pub fn layout(heading: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="margin:0;padding:0;background-color:#f1f5f9;font-family:Arial,Helvetica,sans-serif;">
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:#f1f5f9;padding:24px 0;">
<tr><td align="center">
<table role="presentation" width="600" cellpadding="0" cellspacing="0" style="background-color:#ffffff;border-radius:8px;overflow:hidden;">
<tr><td style="background-color:{{{{brand_primary_color}}}};padding:20px 24px;">
<img src="{{{{brand_logo_url}}}}" alt="{{{{tenant_name}}}}" style="max-height:40px;border:0;">
<div style="color:#ffffff;font-size:18px;font-weight:bold;">{{{{tenant_name}}}}</div>
</td></tr>
<tr><td style="padding:24px;color:#1e293b;font-size:14px;line-height:1.6;">
<h1 style="font-size:20px;margin:0 0 16px 0;color:#0f172a;">{heading}</h1>
{content}
</td></tr>
<tr><td style="padding:16px 24px;background-color:#f8fafc;color:#64748b;font-size:12px;">
<p style="margin:0;">{{{{company_name}}}} &middot; {{{{company_phone}}}} &middot; {{{{company_address}}}}</p>
<p style="margin:4px 0 0 0;">Questions? Contact <a href="mailto:{{{{brand_support_email}}}}" style="color:#64748b;">{{{{brand_support_email}}}}</a></p>
<p style="margin:4px 0 0 0;">&copy; {{{{current_year}}}} {{{{company_name}}}}</p>
</td></tr>
</table>
</td></tr>
</table>
</body>
</html>"#
    )
}

fn button(url_key: &str, label: &str) -> String {
    format!(
        r#"<p style="margin:24px 0;"><a href="{{{{{url_key}}}}}" style="background-color:{{{{brand_primary_color}}}};color:#ffffff;padding:10px 18px;border-radius:6px;text-decoration:none;display:inline-block;">{label}</a></p>"#
    )
}

fn details(rows: &[(&str, &str)]) -> String {
    let mut html = String::from(
        r#"<table role="presentation" style="width:100%;border-collapse:collapse;margin:12px 0;">"#,
    );
    for (label, key) in rows {
        html.push_str(&format!(
            r#"<tr><td style="padding:6px 0;color:#64748b;width:40%;">{label}</td><td style="padding:6px 0;font-weight:bold;">{{{{{key}}}}}</td></tr>"#
        ));
    }
    html.push_str("</table>");
    html
}

/// Look up the bundled template for an alert type.
pub fn for_alert_type(alert_type: &str) -> Option<BundledTemplate> {
    let template = match alert_type {
        "shipment_received" => BundledTemplate::new(
            "Shipment {{shipment_number}} received",
            "Shipment received",
            &format!(
                "<p>Shipment <strong>{{{{shipment_number}}}}</strong> for {{{{account_name}}}} has been received at the warehouse.</p>{}<p>Items received ({{{{items_count}}}}):</p>{{{{items_table_html}}}}{}",
                details(&[
                    ("Carrier", "shipment_carrier"),
                    ("Tracking number", "shipment_tracking_number"),
                    ("PO number", "shipment_po_number"),
                    ("Received", "shipment_received_date"),
                ]),
                button("shipment_url", "View shipment"),
            ),
        ),
        "shipment_created" | "shipment_scheduled" => BundledTemplate::new(
            "Shipment {{shipment_number}} scheduled",
            "Shipment scheduled",
            &format!(
                "<p>A new {{{{shipment_type}}}} shipment <strong>{{{{shipment_number}}}}</strong> has been created for {{{{account_name}}}}.</p>{}{}",
                details(&[
                    ("Expected arrival", "shipment_expected_date"),
                    ("Carrier", "shipment_carrier"),
                    ("PO number", "shipment_po_number"),
                ]),
                button("shipment_url", "View shipment"),
            ),
        ),
        "shipment_completed" | "shipment_shipped" => BundledTemplate::new(
            "Shipment {{shipment_number}} completed",
            "Shipment completed",
            &format!(
                "<p>Shipment <strong>{{{{shipment_number}}}}</strong> for {{{{account_name}}}} is complete.</p>{{{{items_table_html}}}}{}",
                button("shipment_url", "View shipment"),
            ),
        ),
        "item_received" => BundledTemplate::new(
            "Item {{item_code}} received",
            "Item received",
            &format!(
                "<p>Item <strong>{{{{item_code}}}}</strong> ({{{{item_description}}}}) has been received for {{{{account_name}}}}.</p>{}{}",
                details(&[
                    ("Sidemark", "item_sidemark"),
                    ("Vendor", "item_vendor"),
                    ("Location", "item_location"),
                    ("Received", "item_received_date"),
                ]),
                button("item_url", "View item"),
            ),
        ),
        "inspection_completed" | "item_damaged" => BundledTemplate::new(
            "Inspection results for {{account_name}}",
            "Inspection completed",
            &format!(
                "<p>An inspection has been completed for {{{{account_name}}}}.</p>{{{{inspection_findings_html}}}}{}",
                button("entity_url", "View details"),
            ),
        ),
        "task_assigned" | "task_created" => BundledTemplate::new(
            "Task assigned: {{task_title}}",
            "New task",
            &format!(
                "<p>The task <strong>{{{{task_title}}}}</strong> has been assigned to {{{{task_assigned_to}}}}.</p>{}{{{{items_table_html}}}}{}",
                details(&[
                    ("Type", "task_type"),
                    ("Priority", "task_priority"),
                    ("Due", "task_due_date"),
                    ("Account", "account_name"),
                ]),
                button("task_url", "Open task"),
            ),
        ),
        "task_completed" => BundledTemplate::new(
            "Task completed: {{task_title}}",
            "Task completed",
            &format!(
                "<p>The task <strong>{{{{task_title}}}}</strong> for {{{{account_name}}}} was completed on {{{{task_completed_date}}}}.</p>{{{{task_services_html}}}}{{{{inspection_findings_html}}}}{}",
                button("task_url", "View task"),
            ),
        ),
        "task_overdue" => BundledTemplate::new(
            "Overdue task: {{task_title}} ({{task_days_overdue}} days)",
            "Task overdue",
            &format!(
                "<p>The task <strong>{{{{task_title}}}}</strong> is <strong>{{{{task_days_overdue}}}} days</strong> overdue.</p>{}{}",
                details(&[
                    ("Due", "task_due_date"),
                    ("Assigned to", "task_assigned_to"),
                    ("Priority", "task_priority"),
                    ("Account", "account_name"),
                ]),
                button("task_url", "Open task"),
            ),
        ),
        "invoice_created" | "invoice_sent" => BundledTemplate::new(
            "Invoice {{invoice_number}} from {{tenant_name}}",
            "New invoice",
            &format!(
                "<p>A new invoice is available for {{{{account_name}}}}.</p>{}{}",
                details(&[
                    ("Invoice", "invoice_number"),
                    ("Billing period", "invoice_period"),
                    ("Amount due", "invoice_total"),
                    ("Due date", "invoice_due_date"),
                ]),
                button("invoice_url", "View invoice"),
            ),
        ),
        "invoice_overdue" => BundledTemplate::new(
            "Invoice {{invoice_number}} is overdue",
            "Invoice overdue",
            &format!(
                "<p>Invoice <strong>{{{{invoice_number}}}}</strong> for {{{{invoice_total}}}} is {{{{invoice_days_overdue}}}} days past due.</p>{}",
                button("invoice_url", "Pay invoice"),
            ),
        ),
        "release_created" | "release_scheduled" => BundledTemplate::new(
            "Release {{release_number}} scheduled",
            "Release scheduled",
            &format!(
                "<p>Release <strong>{{{{release_number}}}}</strong> for {{{{account_name}}}} is scheduled for {{{{release_scheduled_date}}}}.</p>{}{{{{items_table_html}}}}{}",
                details(&[
                    ("Type", "release_type"),
                    ("Released to", "release_to_name"),
                ]),
                button("release_url", "View release"),
            ),
        ),
        "release_completed" => BundledTemplate::new(
            "Release {{release_number}} completed",
            "Release completed",
            &format!(
                "<p>Release <strong>{{{{release_number}}}}</strong> has been completed and released to {{{{release_to_name}}}}.</p>{{{{items_table_html}}}}{}",
                button("release_url", "View release"),
            ),
        ),
        "claim_filed" | "claim_created" | "claim_updated" => BundledTemplate::new(
            "Claim {{claim_number}}: {{claim_status}}",
            "Claim update",
            &format!(
                "<p>Claim <strong>{{{{claim_number}}}}</strong> for {{{{account_name}}}} is now <strong>{{{{claim_status}}}}</strong>.</p>{}{}",
                details(&[
                    ("Type", "claim_type"),
                    ("Amount claimed", "claim_amount"),
                    ("Description", "claim_description"),
                ]),
                button("claim_url", "View claim"),
            ),
        ),
        "repair_quote_ready" | "repair_quote_sent" => BundledTemplate::new(
            "Repair quote ready for {{item_code}}",
            "Repair quote ready",
            &format!(
                "<p>A repair quote is ready for item <strong>{{{{item_code}}}}</strong> ({{{{item_description}}}}).</p>{{{{repair_actions_html}}}}{}{}",
                details(&[
                    ("Quote total", "repair_total"),
                    ("Technician", "repair_technician"),
                    ("Expires", "repair_expires_date"),
                ]),
                button("repair_url", "Review quote"),
            ),
        ),
        "repair_quote_approved" | "repair_completed" => BundledTemplate::new(
            "Repair update for {{item_code}}",
            "Repair update",
            &format!(
                "<p>The repair quote for item <strong>{{{{item_code}}}}</strong> is now {{{{repair_quote_status}}}}.</p>{{{{repair_actions_html}}}}{}",
                button("repair_url", "View repair"),
            ),
        ),
        "billing_event" | "billing_event_created" => BundledTemplate::new(
            "New charge: {{billing_charge_type}}",
            "New charge recorded",
            &format!(
                "<p>A charge has been recorded for {{{{account_name}}}}.</p>{}",
                details(&[
                    ("Charge", "billing_charge_type"),
                    ("Description", "billing_description"),
                    ("Quantity", "billing_quantity"),
                    ("Rate", "billing_unit_rate"),
                    ("Total", "billing_total"),
                    ("Date", "billing_date"),
                ]),
            ),
        ),
        _ => return None,
    };
    Some(template)
}

/// Generic template for alert types without a bundled template.
pub fn generic() -> BundledTemplate {
    BundledTemplate::new(
        "{{alert_title}} - {{tenant_name}}",
        "{{alert_title}}",
        &format!(
            "<p>There is a new update regarding your account with {{{{tenant_name}}}}.</p>{}",
            button("portal_url", "Open portal"),
        ),
    )
}

/// Template used for manual test sends.
pub fn test_email() -> BundledTemplate {
    BundledTemplate::new(
        "Test email from {{tenant_name}}",
        "Email delivery is working",
        "<p>This is a test message sent on {{current_date}} to confirm that alert emails from {{tenant_name}} can be delivered.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::renderer::validate;

    #[test]
    fn test_known_alert_types_have_templates() {
        for key in ["shipment_received", "task_overdue", "invoice_created", "repair_quote_ready"] {
            assert!(for_alert_type(key).is_some(), "{key}");
        }
        assert!(for_alert_type("mystery_event").is_none());
    }

    #[test]
    fn test_bundled_templates_only_use_known_variables() {
        let keys = [
            "shipment_received",
            "shipment_created",
            "shipment_completed",
            "item_received",
            "inspection_completed",
            "task_assigned",
            "task_completed",
            "task_overdue",
            "invoice_created",
            "invoice_overdue",
            "release_created",
            "release_completed",
            "claim_filed",
            "repair_quote_ready",
            "repair_quote_approved",
            "billing_event",
        ];
        let mut templates: Vec<BundledTemplate> =
            keys.iter().filter_map(|k| for_alert_type(k)).collect();
        assert_eq!(templates.len(), keys.len());
        templates.push(generic());
        templates.push(test_email());

        for template in templates {
            let result = validate(&[&template.subject, &template.body_html]);
            assert!(result.valid, "{}: {result:?}", template.subject);
        }
    }
}
