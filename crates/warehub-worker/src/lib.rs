//! Scheduled alert dispatch for Warehub.
//!
//! Runs the alert dispatcher on a cron schedule so queued alerts are
//! delivered even when no producer calls the HTTP endpoint.

pub mod scheduler;

pub use scheduler::DispatchScheduler;
