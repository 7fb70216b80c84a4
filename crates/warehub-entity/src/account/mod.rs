//! Client account entities.

pub mod model;

pub use model::{Account, AccountContext};
