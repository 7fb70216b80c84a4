//! Warehouse task record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A warehouse task (inspection, assembly, repair, delivery prep, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Task identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Short title.
    pub title: String,
    /// Task type name.
    pub task_type: Option<String>,
    /// Workflow status.
    pub status: Option<String>,
    /// Priority label.
    pub priority: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Assigned staff user.
    pub assigned_to: Option<Uuid>,
    /// Owning account.
    pub account_id: Option<Uuid>,
    /// Longer description.
    pub description: Option<String>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}
