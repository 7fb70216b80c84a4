//! # warehub-mail
//!
//! Outbound email providers: the Resend HTTP API, a log-only provider for
//! environments without email, and an in-memory outbox.

pub mod disabled;
pub mod outbox;
pub mod resend;

use std::sync::Arc;

use tracing::info;

use warehub_core::config::MailConfig;
use warehub_core::error::AppError;
use warehub_core::traits::EmailProvider;

pub use disabled::DisabledProvider;
pub use outbox::MemoryOutbox;
pub use resend::ResendProvider;

/// Build the email provider selected by `mail.provider`.
pub fn build_provider(config: &MailConfig) -> Result<Arc<dyn EmailProvider>, AppError> {
    let provider: Arc<dyn EmailProvider> = match config.provider.trim().to_lowercase().as_str() {
        "resend" => Arc::new(ResendProvider::new(config)?),
        "disabled" | "none" => Arc::new(DisabledProvider),
        "memory" => Arc::new(MemoryOutbox::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown mail provider '{other}' (expected resend, disabled, or memory)"
            )));
        }
    };
    info!(provider = provider.name(), "Email provider initialized");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_provider_by_name() {
        let mut config = MailConfig::default();
        assert_eq!(build_provider(&config).unwrap().name(), "resend");

        config.provider = "Disabled".to_string();
        assert_eq!(build_provider(&config).unwrap().name(), "disabled");

        config.provider = "smtp".to_string();
        assert!(build_provider(&config).is_err());
    }
}
