//! # warehub-entity
//!
//! Domain entity models for the Warehub alert pipeline. Every struct in
//! this crate represents a database row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod account;
pub mod alert;
pub mod catalog;
pub mod communication;
pub mod notification;
pub mod record;
pub mod tenant;
pub mod user;
