//! Core traits defined in `warehub-core` and implemented by other crates.

pub mod email;

pub use email::{DeliveryReceipt, EmailProvider, OutboundEmail};
