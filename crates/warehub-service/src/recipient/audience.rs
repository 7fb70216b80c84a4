//! Audience classification from the trigger catalog.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, warn};

use warehub_database::CommunicationStore;
use warehub_entity::catalog::Audience;

/// Classifies a trigger as internal, client, or both.
///
/// Unknown or inactive triggers, and lookup failures, classify as
/// [`Audience::Internal`] so an alert never reaches clients by accident.
/// Successful lookups are cached for the configured TTL.
#[derive(Clone)]
pub struct AudienceClassifier {
    communication: Arc<dyn CommunicationStore>,
    cache: Cache<String, Audience>,
}

impl AudienceClassifier {
    /// Creates a new classifier with a cache of the given TTL.
    pub fn new(communication: Arc<dyn CommunicationStore>, ttl_seconds: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();
        Self {
            communication,
            cache,
        }
    }

    /// Classify an alert type.
    pub async fn classify(&self, alert_type: &str) -> Audience {
        if let Some(audience) = self.cache.get(alert_type).await {
            return audience;
        }

        let audience = match self.communication.trigger_entry(alert_type).await {
            Ok(Some(entry)) if entry.is_active => entry.audience,
            Ok(Some(_)) => {
                debug!(alert_type, "Trigger is inactive, defaulting to internal audience");
                Audience::Internal
            }
            Ok(None) => {
                debug!(alert_type, "Trigger not in catalog, defaulting to internal audience");
                Audience::Internal
            }
            Err(e) => {
                warn!(alert_type, error = %e, "Trigger lookup failed, defaulting to internal audience");
                return Audience::Internal;
            }
        };

        self.cache.insert(alert_type.to_string(), audience).await;
        audience
    }
}

impl std::fmt::Debug for AudienceClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudienceClassifier")
            .field("cached_entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
