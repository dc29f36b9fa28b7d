//! Stock level rules.
//!
//! Two pure pieces used by the inventory service: the status classifier
//! and the alerting rule that decides when a stock mutation should open
//! an alert.

pub mod alerting;
pub mod status;

pub use alerting::{evaluate, AlertDraft};
pub use status::{classify, StockStatus};
