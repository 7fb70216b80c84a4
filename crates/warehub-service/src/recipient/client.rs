//! Client (account contact) recipient precedence chain.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use warehub_database::AccountStore;

use super::email::{clean_emails, split_list};
use super::{RecipientSource, ResolvedRecipients};

/// Resolves client recipients for an account: first non-empty tier wins.
///
/// 1. contacts subscribed to the trigger for the account
/// 2. the account's alert contact plus its additional alert emails
#[derive(Clone)]
pub struct ClientRecipientResolver {
    accounts: Arc<dyn AccountStore>,
}

impl ClientRecipientResolver {
    /// Creates a new resolver.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Resolve client recipients. Lookup failures degrade to the next tier.
    pub async fn resolve(
        &self,
        tenant_id: Uuid,
        trigger_event: &str,
        account_id: Uuid,
        account_name: &str,
    ) -> ResolvedRecipients {
        match self
            .accounts
            .client_alert_recipients(tenant_id, trigger_event, account_name)
            .await
        {
            Ok(emails) => {
                let emails = clean_emails(emails);
                if !emails.is_empty() {
                    return ResolvedRecipients::new(emails, RecipientSource::ClientAlertRecipients);
                }
            }
            Err(e) => {
                warn!(%tenant_id, trigger_event, error = %e, "Client recipient lookup failed");
            }
        }

        match self.accounts.account(tenant_id, account_id).await {
            Ok(Some(account)) => {
                let candidates = account
                    .alerts_contact_email
                    .as_deref()
                    .into_iter()
                    .chain(
                        account
                            .additional_alert_emails
                            .as_deref()
                            .into_iter()
                            .flat_map(split_list),
                    );
                let emails = clean_emails(candidates);
                if !emails.is_empty() {
                    return ResolvedRecipients::new(emails, RecipientSource::AccountContacts);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(%tenant_id, %account_id, error = %e, "Account contact lookup failed");
            }
        }

        ResolvedRecipients::none()
    }
}

impl std::fmt::Debug for ClientRecipientResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRecipientResolver").finish_non_exhaustive()
    }
}
