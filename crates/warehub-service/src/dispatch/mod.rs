//! Alert dispatch: batch processing, sender identity, and outcomes.

pub mod dispatcher;
pub mod sender;
pub mod summary;

pub use dispatcher::AlertDispatcher;
pub use sender::SenderIdentity;
pub use summary::{AlertOutcome, BatchSummary, DispatchRequest};
