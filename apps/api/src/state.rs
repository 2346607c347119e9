use std::sync::Arc;

use motify_application::{
    AccountStatusService, IdentityTokenVerifier, RetentionService, TaskGenerator,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Runs retention sweeps on demand.
    pub retention_service: RetentionService,
    /// Answers self-service retention status queries.
    pub status_service: AccountStatusService,
    /// Resolves caller identities from bearer tokens.
    pub token_verifier: Arc<dyn IdentityTokenVerifier>,
    /// Task generation client; `None` when no API key is configured.
    pub task_generator: Option<Arc<dyn TaskGenerator>>,
    /// Shared secret for the manual sweep trigger.
    pub operator_token: String,
}
