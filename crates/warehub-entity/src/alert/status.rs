//! Alert lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a queued alert.
///
/// Transitions are monotonic: a batch claims a `Pending` alert by moving it
/// to `Processing`, which then moves to exactly one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Waiting to be dispatched.
    Pending,
    /// Claimed by a dispatch batch.
    Processing,
    /// Email accepted by the provider.
    Sent,
    /// Dispatch attempted and failed.
    Failed,
    /// Not dispatched because the tenant disabled the trigger or channel.
    Skipped,
}

impl AlertStatus {
    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Processing)
    }

    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        match self {
            Self::Pending => next == Self::Processing,
            Self::Processing => next.is_terminal(),
            _ => false,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            other => Err(format!("unknown alert status '{other}'")),
        }
    }
}

impl TryFrom<String> for AlertStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_monotonic() {
        assert!(AlertStatus::Pending.can_transition_to(AlertStatus::Processing));
        assert!(!AlertStatus::Pending.can_transition_to(AlertStatus::Sent));
        assert!(AlertStatus::Processing.can_transition_to(AlertStatus::Sent));
        assert!(AlertStatus::Processing.can_transition_to(AlertStatus::Skipped));
        assert!(!AlertStatus::Processing.can_transition_to(AlertStatus::Pending));
        assert!(!AlertStatus::Failed.can_transition_to(AlertStatus::Pending));
        assert!(!AlertStatus::Sent.can_transition_to(AlertStatus::Failed));
        assert!(!AlertStatus::Pending.can_transition_to(AlertStatus::Pending));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("SENT".parse::<AlertStatus>().unwrap(), AlertStatus::Sent);
        assert!("retrying".parse::<AlertStatus>().is_err());
    }
}
