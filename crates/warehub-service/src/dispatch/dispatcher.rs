//! Alert dispatcher: drives each queued alert to a terminal status.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use warehub_core::config::{DispatchConfig, MailConfig};
use warehub_core::error::AppError;
use warehub_core::result::AppResult;
use warehub_core::traits::{EmailProvider, OutboundEmail};
use warehub_database::Stores;
use warehub_entity::alert::{Alert, AlertQueueFilter, DeliveredContent};
use warehub_entity::catalog::Audience;
use warehub_entity::communication::CommunicationAlert;
use warehub_entity::notification::NewInAppNotification;
use warehub_entity::tenant::BrandingSettings;

use crate::recipient::email::{clean_emails, is_valid_email, merge};
use crate::recipient::{
    AccountContextResolver, AudienceClassifier, ClientRecipientResolver, RecipientResolver,
};
use crate::template::legacy;
use crate::template::{TemplateSelector, Variables, VariableBuilder, html_to_text, render};

use super::sender::SenderIdentity;
use super::summary::{AlertOutcome, BatchSummary, DispatchRequest};

const IN_APP_BODY_LIMIT: usize = 280;

/// Final content of one email.
#[derive(Debug, Clone)]
struct RenderedEmail {
    subject: String,
    html: String,
    text: String,
}

/// Processes queued alerts one at a time.
///
/// Alerts are claimed before any work starts, so concurrent batches from the
/// HTTP endpoint, the cron runner, or another process never send the same
/// alert twice. Each claimed alert ends `sent`, `failed`, or `skipped`.
/// Errors and panics while handling one alert are recorded on that alert and
/// never abort the batch.
#[derive(Clone)]
pub struct AlertDispatcher {
    stores: Stores,
    provider: Arc<dyn EmailProvider>,
    audience: AudienceClassifier,
    recipients: RecipientResolver,
    account_context: AccountContextResolver,
    client_recipients: ClientRecipientResolver,
    variables: VariableBuilder,
    selector: TemplateSelector,
    config: DispatchConfig,
    default_from_email: String,
}

impl AlertDispatcher {
    /// Creates a new dispatcher over the given stores and email provider.
    pub fn new(
        stores: Stores,
        provider: Arc<dyn EmailProvider>,
        config: DispatchConfig,
        mail: &MailConfig,
    ) -> Self {
        let audience =
            AudienceClassifier::new(stores.communication.clone(), config.catalog_cache_ttl_seconds);
        let recipients = RecipientResolver::new(
            stores.communication.clone(),
            stores.tenants.clone(),
            stores.directory.clone(),
            config.internal_roles.clone(),
        );
        let account_context = AccountContextResolver::new(stores.records.clone());
        let client_recipients = ClientRecipientResolver::new(stores.accounts.clone());
        let variables = VariableBuilder::new(
            stores.tenants.clone(),
            stores.records.clone(),
            stores.accounts.clone(),
            stores.directory.clone(),
            config.portal_base_url.clone(),
        )
        .with_default_tenant_name(mail.default_from_name.clone());
        let selector = TemplateSelector::new(stores.communication.clone());

        Self {
            stores,
            provider,
            audience,
            recipients,
            account_context,
            client_recipients,
            variables,
            selector,
            config,
            default_from_email: mail.default_from_email.clone(),
        }
    }

    /// Dispatch configuration in effect.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Claim a batch of pending alerts and process them sequentially.
    ///
    /// Fails only when the queue itself cannot be read.
    pub async fn run_batch(&self, request: &DispatchRequest) -> AppResult<BatchSummary> {
        let filter = AlertQueueFilter {
            tenant_id: request.tenant_id,
            alert_id: request.alert_id,
            limit: self.config.effective_limit(request.limit),
        };
        let alerts = self.stores.alerts.claim_pending(&filter).await?;

        info!(
            count = alerts.len(),
            tenant_id = ?filter.tenant_id,
            alert_id = ?filter.alert_id,
            limit = filter.limit,
            "Processing alert batch"
        );

        let mut summary = BatchSummary::default();
        for alert in &alerts {
            let outcome = self.dispatch_alert(alert).await;
            summary.record(&outcome);
        }
        let summary = summary.finish();
        info!(
            processed = summary.processed,
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            "Alert batch complete"
        );
        Ok(summary)
    }

    /// Process one claimed alert, converting errors and panics into a `failed` status.
    async fn dispatch_alert(&self, alert: &Alert) -> AlertOutcome {
        let reason = match AssertUnwindSafe(self.process(alert)).catch_unwind().await {
            Ok(Ok(outcome)) => return outcome,
            Ok(Err(e)) => {
                error!(alert_id = %alert.id, alert_type = %alert.alert_type, error = %e, "Alert processing failed");
                e.message
            }
            Err(panic) => {
                let message = format!("Unexpected error while processing alert: {}", panic_message(&panic));
                error!(alert_id = %alert.id, alert_type = %alert.alert_type, "{message}");
                message
            }
        };

        if let Err(e) = self.stores.alerts.mark_failed(alert.id, &reason).await {
            error!(alert_id = %alert.id, error = %e, "Failed to record alert failure");
        }
        AlertOutcome::Failed { reason }
    }

    async fn process(&self, alert: &Alert) -> AppResult<AlertOutcome> {
        let config = match self
            .stores
            .communication
            .alert_config(alert.tenant_id, &alert.alert_type)
            .await
        {
            Ok(config) => config,
            Err(e) => {
                warn!(alert_id = %alert.id, error = %e, "Failed to load alert configuration, assuming defaults");
                None
            }
        };

        if let Some(reason) = config.as_ref().and_then(CommunicationAlert::email_block_reason) {
            info!(alert_id = %alert.id, alert_type = %alert.alert_type, %reason, "Skipping alert");
            self.stores.alerts.mark_skipped(alert.id, &reason).await?;
            return Ok(AlertOutcome::Skipped { reason });
        }

        let audience = self.audience.classify(&alert.alert_type).await;
        let recipients = self.resolve_recipients(alert, audience).await;
        if recipients.is_empty() {
            let reason = no_recipients_message(&alert.alert_type, audience);
            warn!(alert_id = %alert.id, audience = %audience, "No recipients for alert");
            self.stores.alerts.mark_failed(alert.id, &reason).await?;
            return Ok(AlertOutcome::Failed { reason });
        }

        let variables = self
            .variables
            .build(&alert.alert_type, alert.entity(), alert.tenant_id)
            .await;
        let selected = self.selector.resolve_email(alert).await;
        debug!(alert_id = %alert.id, origin = ?selected.origin, "Template selected");

        let vars = &variables.variables;
        let html = render(&selected.body_html, vars, true);
        let text = match &selected.body_text {
            Some(template) => render(template, vars, false),
            None => html_to_text(&html),
        };
        let content = RenderedEmail {
            subject: single_line(&render(&selected.subject, vars, false)),
            html,
            text,
        };

        let branding = self.branding(alert.tenant_id).await;
        let sender = SenderIdentity::resolve(
            &branding,
            vars.get("tenant_name").map(String::as_str).unwrap_or_default(),
            &self.default_from_email,
        );
        let email = OutboundEmail {
            from: sender.from,
            to: recipients.clone(),
            reply_to: sender.reply_to,
            subject: content.subject.clone(),
            html: content.html.clone(),
            text: content.text.clone(),
        };

        let receipt = match self.provider.send(&email).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(alert_id = %alert.id, provider = self.provider.name(), error = %e, "Email delivery failed");
                self.stores.alerts.mark_failed(alert.id, &e.message).await?;
                return Ok(AlertOutcome::Failed { reason: e.message });
            }
        };

        let delivered = DeliveredContent {
            subject: content.subject.clone(),
            body_html: content.html.clone(),
            body_text: content.text.clone(),
            recipients: recipients.clone(),
            provider_message_id: Some(receipt.message_id.clone()),
            sent_at: Utc::now(),
        };
        // Delivered email counts as sent even when the status write fails.
        if let Err(e) = self.stores.alerts.mark_sent(alert.id, &delivered).await {
            error!(
                alert_id = %alert.id,
                message_id = %receipt.message_id,
                error = %e,
                "Failed to record sent alert, leaving it claimed"
            );
        }
        info!(
            alert_id = %alert.id,
            alert_type = %alert.alert_type,
            recipients = recipients.len(),
            message_id = %receipt.message_id,
            "Alert sent"
        );

        let in_app_enabled = config.as_ref().is_none_or(|c| c.channels.in_app);
        if audience.includes_internal() && in_app_enabled {
            self.fan_out_in_app(alert, &content, vars).await;
        }

        Ok(AlertOutcome::Sent { recipients })
    }

    async fn resolve_recipients(&self, alert: &Alert, audience: Audience) -> Vec<String> {
        let explicit = clean_emails(alert.explicit_recipients());
        if !explicit.is_empty() {
            debug!(alert_id = %alert.id, source = "alert", "Using explicit recipients");
            return explicit;
        }

        let internal = if audience.includes_internal() {
            let resolved = self
                .recipients
                .resolve(alert.tenant_id, &alert.alert_type, &[])
                .await;
            debug!(alert_id = %alert.id, source = %resolved.source, count = resolved.emails.len(), "Internal recipients");
            resolved.emails
        } else {
            Vec::new()
        };

        let client = if audience.includes_client() {
            match self
                .account_context
                .resolve(alert.entity_type.as_deref(), alert.entity_id, alert.tenant_id)
                .await
            {
                Some(context) => {
                    let resolved = self
                        .client_recipients
                        .resolve(
                            alert.tenant_id,
                            &alert.alert_type,
                            context.account_id,
                            &context.account_name,
                        )
                        .await;
                    debug!(alert_id = %alert.id, source = %resolved.source, count = resolved.emails.len(), "Client recipients");
                    resolved.emails
                }
                None => Vec::new(),
            }
        } else {
            Vec::new()
        };

        merge(&[&internal, &client])
    }

    async fn branding(&self, tenant_id: Uuid) -> BrandingSettings {
        match self.stores.tenants.branding(tenant_id).await {
            Ok(branding) => branding.unwrap_or_default(),
            Err(e) => {
                warn!(%tenant_id, error = %e, "Failed to load branding for sender identity");
                BrandingSettings::default()
            }
        }
    }

    async fn fan_out_in_app(&self, alert: &Alert, content: &RenderedEmail, vars: &Variables) {
        let users = match self
            .stores
            .directory
            .users_with_roles(alert.tenant_id, &self.config.internal_roles)
            .await
        {
            Ok(users) => users,
            Err(e) => {
                warn!(alert_id = %alert.id, error = %e, "Failed to load in-app notification users");
                return;
            }
        };
        if users.is_empty() {
            return;
        }

        let action_url = vars
            .get("entity_url")
            .or_else(|| vars.get("portal_url"))
            .cloned();
        let body = truncate(&content.text, IN_APP_BODY_LIMIT);
        let notifications: Vec<NewInAppNotification> = users
            .iter()
            .map(|user| NewInAppNotification {
                tenant_id: alert.tenant_id,
                user_id: user.id,
                title: content.subject.clone(),
                body: body.clone(),
                alert_type: alert.alert_type.clone(),
                entity_type: alert.entity_type.clone(),
                entity_id: alert.entity_id,
                action_url: action_url.clone(),
            })
            .collect();

        match self.stores.notifications.create_in_app(&notifications).await {
            Ok(count) => debug!(alert_id = %alert.id, count, "In-app notifications created"),
            Err(e) => warn!(alert_id = %alert.id, error = %e, "Failed to create in-app notifications"),
        }
    }

    /// Send a test email to one address using the tenant's branding.
    pub async fn send_test(&self, tenant_id: Option<Uuid>, to: &str) -> AppResult<String> {
        let to = to.trim().to_lowercase();
        if !is_valid_email(&to) {
            return Err(AppError::validation(format!(
                "Invalid test email address: '{to}'"
            )));
        }

        let tenant_id = tenant_id.unwrap_or(Uuid::nil());
        let variables = self.variables.build("test_email", None, tenant_id).await;
        let vars = &variables.variables;
        let template = legacy::test_email();
        let html = render(&template.body_html, vars, true);
        let branding = self.branding(tenant_id).await;
        let sender = SenderIdentity::resolve(
            &branding,
            vars.get("tenant_name").map(String::as_str).unwrap_or_default(),
            &self.default_from_email,
        );

        let email = OutboundEmail {
            from: sender.from,
            to: vec![to.clone()],
            reply_to: sender.reply_to,
            subject: single_line(&render(&template.subject, vars, false)),
            text: html_to_text(&html),
            html,
        };
        let receipt = self.provider.send(&email).await?;
        info!(%tenant_id, to = %to, message_id = %receipt.message_id, "Test email sent");
        Ok(format!("Test email sent to {to}"))
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn no_recipients_message(alert_type: &str, audience: Audience) -> String {
    let mut message = format!(
        "No recipients found for alert '{alert_type}'. Configure office alert emails in tenant settings or assign users the admin or manager role"
    );
    if audience.includes_client() {
        message.push_str(", or set an alerts contact email on the client account");
    }
    message.push('.');
    message
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let mut out: String = value.chars().take(limit.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
