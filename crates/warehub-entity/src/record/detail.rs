//! Detail rows used by the auxiliary HTML tables.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Inspection result for one item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InspectionFinding {
    /// Inspected item.
    pub item_id: Uuid,
    /// Item code, denormalised for display.
    pub item_code: String,
    /// Condition grade.
    pub condition: Option<String>,
    /// Inspector notes.
    pub notes: Option<String>,
    /// Number of photos taken.
    pub photo_count: i64,
}

/// A service performed as part of a task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskServiceLine {
    /// Service name.
    pub service_name: String,
    /// Quantity.
    pub quantity: f64,
    /// Rate per unit.
    pub rate: Option<f64>,
    /// Line total.
    pub total: Option<f64>,
}
