//! Alert queue domain entities.

pub mod model;
pub mod status;

pub use model::{Alert, AlertQueueFilter, DeliveredContent};
pub use status::AlertStatus;
