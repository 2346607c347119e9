//! Motify scheduled retention sweeper.
//!
//! Runs one retention sweep per day at a fixed UTC hour. Pass `once` as the
//! first argument to run a single sweep and exit, for cron-style scheduling
//! or manual operation.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use motify_application::RetentionService;
use motify_core::{AppError, AppResult};
use motify_domain::{DEFAULT_RETENTION_DAYS, RetentionPolicy};
use motify_infrastructure::HttpIdentityDirectory;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct SweeperConfig {
    directory_base_url: String,
    directory_admin_token: String,
    retention_days: i64,
    sweep_hour_utc: u32,
    http_timeout_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SweeperConfig::load()?;
    let policy = RetentionPolicy::new(config.retention_days)?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let directory = Arc::new(HttpIdentityDirectory::new(
        http_client,
        config.directory_base_url.clone(),
        config.directory_admin_token.clone(),
    ));
    let retention_service = RetentionService::new(directory, policy);

    if env::args().nth(1).as_deref() == Some("once") {
        let report = retention_service.sweep().await?;
        info!(
            total_checked = report.total_checked,
            marked_for_deletion = report.marked_for_deletion,
            successfully_deleted = report.successfully_deleted,
            "single sweep complete"
        );
        return Ok(());
    }

    info!(
        retention_days = config.retention_days,
        sweep_hour_utc = config.sweep_hour_utc,
        "motify-sweeper started"
    );

    loop {
        let pause = duration_until_next_run(Utc::now(), config.sweep_hour_utc);
        info!(sleep_seconds = pause.as_secs(), "waiting for next sweep");
        tokio::time::sleep(pause).await;

        match retention_service.sweep().await {
            Ok(report) => {
                info!(
                    total_checked = report.total_checked,
                    marked_for_deletion = report.marked_for_deletion,
                    successfully_deleted = report.successfully_deleted,
                    "scheduled sweep complete"
                );
            }
            Err(error) => {
                warn!(error = %error, "scheduled sweep failed");
            }
        }
    }
}

/// Time to wait until the next `sweep_hour` UTC boundary strictly after
/// `now`. A run exactly at the boundary schedules the following day.
fn duration_until_next_run(now: DateTime<Utc>, sweep_hour: u32) -> Duration {
    let Some(today) = now.date_naive().and_hms_opt(sweep_hour, 0, 0) else {
        // Unreachable once the hour is validated, retry in an hour anyway.
        return Duration::from_secs(60 * 60);
    };

    let mut next = today.and_utc();
    if next <= now {
        next += chrono::Duration::days(1);
    }

    (next - now).to_std().unwrap_or_default()
}

impl SweeperConfig {
    fn load() -> AppResult<Self> {
        let directory_base_url = required_env("DIRECTORY_BASE_URL")?;
        let directory_admin_token = required_env("DIRECTORY_ADMIN_TOKEN")?;

        let retention_days = match env::var("RETENTION_DAYS") {
            Ok(value) => value.parse::<i64>().map_err(|error| {
                AppError::Validation(format!("invalid RETENTION_DAYS value '{value}': {error}"))
            })?,
            Err(_) => DEFAULT_RETENTION_DAYS,
        };

        let sweep_hour_utc = match env::var("SWEEP_HOUR_UTC") {
            Ok(value) => value.parse::<u32>().map_err(|error| {
                AppError::Validation(format!("invalid SWEEP_HOUR_UTC value '{value}': {error}"))
            })?,
            Err(_) => 2,
        };
        if sweep_hour_utc > 23 {
            return Err(AppError::Validation(
                "SWEEP_HOUR_UTC must be between 0 and 23".to_owned(),
            ));
        }

        let http_timeout_seconds = env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(15);

        Ok(Self {
            directory_base_url,
            directory_admin_token,
            retention_days,
            sweep_hour_utc,
            http_timeout_seconds,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::duration_until_next_run;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or_else(|_| panic!("invalid test timestamp {rfc3339}"))
    }

    #[test]
    fn runs_later_the_same_day_when_before_the_hour() {
        let pause = duration_until_next_run(at("2026-08-28T01:00:00Z"), 2);
        assert_eq!(pause.as_secs(), 60 * 60);
    }

    #[test]
    fn schedules_the_next_day_exactly_at_the_hour() {
        let pause = duration_until_next_run(at("2026-08-28T02:00:00Z"), 2);
        assert_eq!(pause.as_secs(), 24 * 60 * 60);
    }

    #[test]
    fn schedules_the_next_day_after_the_hour() {
        let pause = duration_until_next_run(at("2026-08-28T03:30:00Z"), 2);
        assert_eq!(pause.as_secs(), 22 * 60 * 60 + 30 * 60);
    }

    #[test]
    fn midnight_hour_is_supported() {
        let pause = duration_until_next_run(at("2026-08-28T23:59:00Z"), 0);
        assert_eq!(pause.as_secs(), 60);
    }
}
