//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod retention;
mod task;

pub use account::{Account, AccountId};
pub use retention::{DEFAULT_RETENTION_DAYS, RetentionPolicy};
pub use task::TaskSuggestion;
