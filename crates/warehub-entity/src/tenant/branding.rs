//! Tenant branding and sender identity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cosmetic and sender-identity settings for a tenant's emails.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct BrandingSettings {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Logo shown in the email header.
    pub brand_logo_url: Option<String>,
    /// Primary color as a CSS hex value.
    pub brand_primary_color: Option<String>,
    /// Support address, also used as reply-to.
    pub brand_support_email: Option<String>,
    /// Client portal base URL.
    pub portal_base_url: Option<String>,
    /// Sender display name.
    pub from_name: Option<String>,
    /// Sender address on the tenant's own domain.
    pub custom_from_email: Option<String>,
    /// Tenant's own sending domain.
    pub custom_email_domain: Option<String>,
    /// Whether the sending domain passed provider verification.
    pub email_domain_verified: bool,
}

impl BrandingSettings {
    /// The tenant's own from-address, if its domain is verified and the
    /// address belongs to that domain.
    pub fn verified_from_email(&self) -> Option<&str> {
        if !self.email_domain_verified {
            return None;
        }
        let email = self.custom_from_email.as_deref()?.trim();
        let domain = self.custom_email_domain.as_deref()?.trim();
        if email.is_empty() || domain.is_empty() {
            return None;
        }
        email
            .rsplit_once('@')
            .filter(|(_, d)| d.eq_ignore_ascii_case(domain))
            .map(|_| email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verified_from_email_requires_verification_and_matching_domain() {
        let mut branding = BrandingSettings {
            custom_from_email: Some("alerts@acme-storage.com".to_string()),
            custom_email_domain: Some("acme-storage.com".to_string()),
            ..Default::default()
        };
        assert_eq!(branding.verified_from_email(), None);

        branding.email_domain_verified = true;
        assert_eq!(
            branding.verified_from_email(),
            Some("alerts@acme-storage.com")
        );

        branding.custom_email_domain = Some("other.com".to_string());
        assert_eq!(branding.verified_from_email(), None);
    }
}
