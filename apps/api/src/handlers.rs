//! HTTP request handlers.

pub mod account_status;
pub mod health;
pub mod retention;
pub mod tasks;
