//! Motify retention API composition root.

#![forbid(unsafe_code)]

mod config;
mod dto;
mod error;
mod handlers;
mod middleware;
mod router;
mod state;

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use motify_application::{
    AccountStatusService, IdentityDirectory, IdentityTokenVerifier, RetentionService,
    TaskGenerator,
};
use motify_core::AppError;
use motify_domain::RetentionPolicy;
use motify_infrastructure::{
    HttpIdentityDirectory, InMemoryIdentityDirectory, PerplexityTaskGenerator,
};
use tracing::info;

use crate::config::{ApiConfig, DirectoryProviderConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let policy = RetentionPolicy::new(config.retention_days)?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    // One directory client per process, shared by every service needing it.
    let (directory, token_verifier): (Arc<dyn IdentityDirectory>, Arc<dyn IdentityTokenVerifier>) =
        match &config.directory_provider {
            DirectoryProviderConfig::Memory => {
                let shared = Arc::new(InMemoryIdentityDirectory::new());
                (shared.clone(), shared)
            }
            DirectoryProviderConfig::Http {
                base_url,
                admin_token,
            } => {
                let shared = Arc::new(HttpIdentityDirectory::new(
                    http_client.clone(),
                    base_url.clone(),
                    admin_token.clone(),
                ));
                (shared.clone(), shared)
            }
        };

    let task_generator: Option<Arc<dyn TaskGenerator>> =
        config.perplexity.as_ref().map(|perplexity| {
            Arc::new(PerplexityTaskGenerator::new(
                http_client.clone(),
                perplexity.base_url.clone(),
                perplexity.api_key.clone(),
                perplexity.model.clone(),
            )) as Arc<dyn TaskGenerator>
        });

    let app_state = AppState {
        retention_service: RetentionService::new(directory.clone(), policy),
        status_service: AccountStatusService::new(directory, policy),
        token_verifier,
        task_generator,
        operator_token: config.operator_token.clone(),
    };

    let app = router::build_router(app_state, &config.frontend_url)?;

    let host = IpAddr::from_str(&config.api_host).map_err(|error| {
        AppError::Internal(format!("invalid API_HOST '{}': {error}", config.api_host))
    })?;
    let address = SocketAddr::from((host, config.api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, retention_days = config.retention_days, "motify-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
