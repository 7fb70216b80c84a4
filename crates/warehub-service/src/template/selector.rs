//! Template selection: tenant custom template, pre-rendered content,
//! bundled template, or the generic fallback.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use warehub_database::CommunicationStore;
use warehub_entity::alert::Alert;
use warehub_entity::communication::{Channel, CommunicationTemplate};

use super::legacy::{self, layout};

/// Outcome of looking for a tenant-authored template.
#[derive(Debug, Clone)]
pub enum TemplateChoice {
    /// The tenant's active template for the channel.
    Custom(CommunicationTemplate),
    /// No usable custom template.
    NoCustom,
}

/// Where the content for an alert came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateOrigin {
    /// Tenant custom template.
    Custom,
    /// Subject and body stored on the alert.
    Prerendered,
    /// Bundled template for the alert type.
    Bundled,
    /// Generic fallback.
    Generic,
}

/// Unrendered content chosen for an alert.
#[derive(Debug, Clone)]
pub struct SelectedTemplate {
    /// Subject template.
    pub subject: String,
    /// HTML body template.
    pub body_html: String,
    /// Plaintext body template, if one was authored.
    pub body_text: Option<String>,
    /// Origin of the content.
    pub origin: TemplateOrigin,
}

/// Chooses the template for an alert.
#[derive(Clone)]
pub struct TemplateSelector {
    communication: Arc<dyn CommunicationStore>,
}

impl TemplateSelector {
    /// Creates a new selector.
    pub fn new(communication: Arc<dyn CommunicationStore>) -> Self {
        Self { communication }
    }

    /// Find the tenant's custom template for a trigger and channel.
    ///
    /// A template is only used when its alert configuration exists and is
    /// enabled, and the template is active with a non-empty body. Lookup
    /// failures are logged and treated as no custom template.
    pub async fn select(&self, alert_type: &str, tenant_id: Uuid, channel: Channel) -> TemplateChoice {
        let config = match self.communication.alert_config(tenant_id, alert_type).await {
            Ok(Some(config)) if config.is_enabled => config,
            Ok(_) => return TemplateChoice::NoCustom,
            Err(e) => {
                warn!(%tenant_id, alert_type, error = %e, "Failed to load alert configuration for template");
                return TemplateChoice::NoCustom;
            }
        };

        match self.communication.template(config.id, channel).await {
            Ok(Some(template)) if template.is_usable() => TemplateChoice::Custom(template),
            Ok(Some(_)) => {
                debug!(%tenant_id, alert_type, "Custom template is inactive or empty");
                TemplateChoice::NoCustom
            }
            Ok(None) => TemplateChoice::NoCustom,
            Err(e) => {
                warn!(%tenant_id, alert_type, error = %e, "Failed to load custom template");
                TemplateChoice::NoCustom
            }
        }
    }

    /// Resolve the email content for an alert using the full precedence chain.
    pub async fn resolve_email(&self, alert: &Alert) -> SelectedTemplate {
        let choice = self
            .select(&alert.alert_type, alert.tenant_id, Channel::Email)
            .await;
        resolve_content(alert, choice)
    }
}

impl std::fmt::Debug for TemplateSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSelector").finish_non_exhaustive()
    }
}

/// Apply the precedence chain: custom, pre-rendered, bundled, generic.
pub fn resolve_content(alert: &Alert, choice: TemplateChoice) -> SelectedTemplate {
    if let TemplateChoice::Custom(template) = choice {
        let body_html = if template.body_template.to_lowercase().contains("<html") {
            template.body_template.clone()
        } else {
            layout("{{alert_title}}", &template.body_template)
        };
        return SelectedTemplate {
            subject: template
                .subject_template
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "{{alert_title}} - {{tenant_name}}".to_string()),
            body_html,
            body_text: template.body_text_template.filter(|t| !t.trim().is_empty()),
            origin: TemplateOrigin::Custom,
        };
    }

    if let Some((subject, body_html)) = alert.prerendered() {
        return SelectedTemplate {
            subject: subject.to_string(),
            body_html: body_html.to_string(),
            body_text: alert.body_text.clone().filter(|t| !t.trim().is_empty()),
            origin: TemplateOrigin::Prerendered,
        };
    }

    match legacy::for_alert_type(&alert.alert_type) {
        Some(bundled) => SelectedTemplate {
            subject: bundled.subject,
            body_html: bundled.body_html,
            body_text: None,
            origin: TemplateOrigin::Bundled,
        },
        None => {
            let generic = legacy::generic();
            SelectedTemplate {
                subject: generic.subject,
                body_html: generic.body_html,
                body_text: None,
                origin: TemplateOrigin::Generic,
            }
        }
    }
}
