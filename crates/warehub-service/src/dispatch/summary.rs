//! Batch requests and outcomes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scope of one dispatch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Only process alerts of this tenant.
    pub tenant_id: Option<Uuid>,
    /// Only process this alert.
    pub alert_id: Option<Uuid>,
    /// Maximum alerts to process; clamped to the configured maximum.
    pub limit: Option<u32>,
}

/// Terminal outcome of one alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertOutcome {
    /// Email accepted by the provider.
    Sent {
        /// Delivered-to addresses.
        recipients: Vec<String>,
    },
    /// Delivery did not happen.
    Failed {
        /// Reason recorded on the alert.
        reason: String,
    },
    /// The tenant disabled the trigger or its email channel.
    Skipped {
        /// Reason recorded on the alert.
        reason: String,
    },
}

/// Counters for a dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Human-readable summary.
    pub message: String,
    /// Alerts picked up.
    pub processed: u32,
    /// Alerts sent.
    pub sent: u32,
    /// Alerts failed.
    pub failed: u32,
    /// Alerts skipped.
    pub skipped: u32,
}

impl BatchSummary {
    /// Count one outcome.
    pub fn record(&mut self, outcome: &AlertOutcome) {
        self.processed += 1;
        match outcome {
            AlertOutcome::Sent { .. } => self.sent += 1,
            AlertOutcome::Failed { .. } => self.failed += 1,
            AlertOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    /// Fill in the summary message.
    pub fn finish(mut self) -> Self {
        self.message = if self.processed == 0 {
            "No pending alerts to process".to_string()
        } else {
            format!(
                "Processed {} alert(s): {} sent, {} failed, {} skipped",
                self.processed, self.sent, self.failed, self.skipped
            )
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::default();
        summary.record(&AlertOutcome::Sent {
            recipients: vec!["a@b.co".to_string()],
        });
        summary.record(&AlertOutcome::Skipped {
            reason: "off".to_string(),
        });
        let summary = summary.finish();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.message, "Processed 2 alert(s): 1 sent, 0 failed, 1 skipped");

        assert_eq!(BatchSummary::default().finish().message, "No pending alerts to process");
    }
}
