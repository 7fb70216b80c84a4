//! Sender identity for outgoing alert email.

use warehub_entity::tenant::BrandingSettings;

use crate::recipient::email::is_valid_email;

/// `From` and `Reply-To` for a tenant's email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    /// Formatted `Name <address>` sender.
    pub from: String,
    /// Reply-to address, if the tenant has a support email.
    pub reply_to: Option<String>,
}

impl SenderIdentity {
    /// Resolve the sender for a tenant.
    ///
    /// A verified custom domain address is used when available; otherwise
    /// the platform default address is sent under the tenant's display name.
    pub fn resolve(branding: &BrandingSettings, tenant_name: &str, default_from_email: &str) -> Self {
        let address = branding
            .verified_from_email()
            .unwrap_or(default_from_email)
            .trim();
        let name = branding
            .from_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(tenant_name);
        let reply_to = branding
            .brand_support_email
            .as_deref()
            .map(str::trim)
            .filter(|e| is_valid_email(e))
            .map(str::to_lowercase);

        Self {
            from: format!("{} <{address}>", sanitize_display_name(name)),
            reply_to,
        }
    }
}

fn sanitize_display_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\r' | '\n'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sender_uses_tenant_name() {
        let branding = BrandingSettings {
            brand_support_email: Some("Help@Acme.test".to_string()),
            ..Default::default()
        };
        let sender = SenderIdentity::resolve(&branding, "Acme <Storage>", "alerts@notifications.warehub.app");
        assert_eq!(sender.from, "Acme Storage <alerts@notifications.warehub.app>");
        assert_eq!(sender.reply_to.as_deref(), Some("help@acme.test"));
    }

    #[test]
    fn test_verified_custom_domain() {
        let branding = BrandingSettings {
            from_name: Some("Acme Alerts".to_string()),
            custom_from_email: Some("alerts@acme.test".to_string()),
            custom_email_domain: Some("acme.test".to_string()),
            email_domain_verified: true,
            ..Default::default()
        };
        let sender = SenderIdentity::resolve(&branding, "Acme", "alerts@notifications.warehub.app");
        assert_eq!(sender.from, "Acme Alerts <alerts@acme.test>");
        assert_eq!(sender.reply_to, None);
    }
}
