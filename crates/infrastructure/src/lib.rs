//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_identity_directory;
mod in_memory_identity_directory;
mod perplexity_task_generator;

pub use http_identity_directory::HttpIdentityDirectory;
pub use in_memory_identity_directory::InMemoryIdentityDirectory;
pub use perplexity_task_generator::{
    DEFAULT_PERPLEXITY_BASE_URL, DEFAULT_PERPLEXITY_MODEL, PerplexityTaskGenerator,
};
