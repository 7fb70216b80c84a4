//! Trigger catalog reference data.

pub mod trigger;

pub use trigger::{Audience, TriggerCatalogEntry};
