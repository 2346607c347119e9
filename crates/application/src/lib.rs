//! Application services and ports.

#![forbid(unsafe_code)]

mod directory_ports;
mod retention_service;
mod status_service;
mod task_ports;

pub use directory_ports::{IdentityDirectory, IdentityTokenVerifier};
pub use retention_service::{
    DIRECTORY_PAGE_LIMIT, RetentionService, SweepReport, SweptAccount,
};
pub use status_service::{AccountStatus, AccountStatusService};
pub use task_ports::TaskGenerator;
