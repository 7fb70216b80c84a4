//! # warehub-service
//!
//! Business logic of the alert pipeline. Each queued alert is classified
//! by audience, routed to internal staff and client contacts, rendered
//! from the best available template, and delivered through an
//! [`EmailProvider`](warehub_core::traits::EmailProvider).

pub mod dispatch;
pub mod recipient;
pub mod template;

pub use dispatch::{AlertDispatcher, AlertOutcome, BatchSummary, DispatchRequest};
