use std::env;

use motify_core::AppError;
use motify_domain::DEFAULT_RETENTION_DAYS;
use motify_infrastructure::{DEFAULT_PERPLEXITY_BASE_URL, DEFAULT_PERPLEXITY_MODEL};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Which Identity Directory implementation the process talks to.
#[derive(Debug, Clone)]
pub enum DirectoryProviderConfig {
    /// In-memory directory for local development.
    Memory,
    /// Provider admin REST API.
    Http {
        /// Admin API base URL.
        base_url: String,
        /// Admin bearer token.
        admin_token: String,
    },
}

/// Upstream task-generation provider settings.
#[derive(Debug, Clone)]
pub struct PerplexityRuntimeConfig {
    /// Provider API key.
    pub api_key: String,
    /// Provider base URL.
    pub base_url: String,
    /// Model requested for generation.
    pub model: String,
}

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface the listener binds to.
    pub api_host: String,
    /// Port the listener binds to.
    pub api_port: u16,
    /// Allowed frontend origin for CORS.
    pub frontend_url: String,
    /// Shared secret authorizing the manual sweep trigger.
    pub operator_token: String,
    /// Grace window in days for unverified accounts.
    pub retention_days: i64,
    /// Directory implementation selection.
    pub directory_provider: DirectoryProviderConfig,
    /// Task generation settings; absent when no API key is configured.
    pub perplexity: Option<PerplexityRuntimeConfig>,
    /// Timeout applied to all outbound HTTP calls.
    pub http_timeout_seconds: u64,
}

impl ApiConfig {
    /// Loads and validates configuration from the environment.
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let operator_token = required_non_empty_env("OPERATOR_TOKEN")?;

        let retention_days = match env::var("RETENTION_DAYS") {
            Ok(value) => value.parse::<i64>().map_err(|error| {
                AppError::Validation(format!("invalid RETENTION_DAYS: {error}"))
            })?,
            Err(_) => DEFAULT_RETENTION_DAYS,
        };

        let directory_provider = load_directory_provider()?;

        let perplexity = env::var("PERPLEXITY_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|api_key| PerplexityRuntimeConfig {
                api_key,
                base_url: env::var("PERPLEXITY_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_PERPLEXITY_BASE_URL.to_owned()),
                model: env::var("PERPLEXITY_MODEL")
                    .unwrap_or_else(|_| DEFAULT_PERPLEXITY_MODEL.to_owned()),
            });

        let http_timeout_seconds = env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(15);

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            operator_token,
            retention_days,
            directory_provider,
            perplexity,
            http_timeout_seconds,
        })
    }
}

fn load_directory_provider() -> Result<DirectoryProviderConfig, AppError> {
    let provider = env::var("DIRECTORY_PROVIDER").unwrap_or_else(|_| "http".to_owned());

    match provider.as_str() {
        "http" => {
            let base_url = required_non_empty_env("DIRECTORY_BASE_URL")?;
            Url::parse(&base_url).map_err(|error| {
                AppError::Validation(format!("invalid DIRECTORY_BASE_URL: {error}"))
            })?;
            let admin_token = required_non_empty_env("DIRECTORY_ADMIN_TOKEN")?;
            Ok(DirectoryProviderConfig::Http {
                base_url,
                admin_token,
            })
        }
        "memory" => Ok(DirectoryProviderConfig::Memory),
        _ => Err(AppError::Validation(format!(
            "DIRECTORY_PROVIDER must be either 'http' or 'memory', got '{provider}'"
        ))),
    }
}

/// Initializes the tracing subscriber for this process.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
