//! Tenant communication configuration: per-trigger toggles and templates.

pub mod config;
pub mod template;

pub use config::{ChannelToggles, CommunicationAlert};
pub use template::{Channel, CommunicationTemplate};
