use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{any, get, post};
use motify_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/account/status",
            get(handlers::account_status::account_status),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Ok(Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/tasks/generate", post(handlers::tasks::generate_tasks))
        // Bound with any(): the handler answers 405 to non-POST methods
        // before checking the operator token.
        .route(
            "/api/internal/retention/sweep",
            any(handlers::retention::manual_sweep_entry),
        )
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use motify_application::{
        AccountStatusService, IdentityDirectory, IdentityTokenVerifier, RetentionService,
    };
    use motify_core::{AppError, AppResult, CallerIdentity};
    use motify_domain::{Account, AccountId, RetentionPolicy};
    use tower::ServiceExt;

    use super::build_router;
    use crate::state::AppState;

    /// Directory double counting every read so tests can assert that
    /// rejected requests never touch account data.
    struct CountingDirectory {
        account: Account,
        get_calls: AtomicUsize,
    }

    impl CountingDirectory {
        fn new(account: Account) -> Self {
            Self {
                account,
                get_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IdentityDirectory for CountingDirectory {
        async fn list_accounts(&self, _page_size: usize) -> AppResult<Vec<Account>> {
            Ok(vec![self.account.clone()])
        }

        async fn get_account(&self, account_id: &AccountId) -> AppResult<Option<Account>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.account.clone()).filter(|account| account.id == *account_id))
        }

        async fn delete_account(&self, account_id: &AccountId) -> AppResult<()> {
            Err(AppError::Internal(format!(
                "unexpected deletion of '{account_id}' in read-only test"
            )))
        }
    }

    #[async_trait]
    impl IdentityTokenVerifier for CountingDirectory {
        async fn verify_id_token(&self, id_token: &str) -> AppResult<CallerIdentity> {
            if id_token == "valid-token" {
                return Ok(CallerIdentity::new(
                    self.account.id.as_str(),
                    self.account.email.clone(),
                ));
            }

            Err(AppError::Unauthorized(
                "id token is invalid or expired".to_owned(),
            ))
        }
    }

    fn app(directory: Arc<CountingDirectory>) -> Router {
        let policy = RetentionPolicy::default();
        let state = AppState {
            retention_service: RetentionService::new(directory.clone(), policy),
            status_service: AccountStatusService::new(directory.clone(), policy),
            token_verifier: directory,
            task_generator: None,
            operator_token: "operator-secret".to_owned(),
        };
        build_router(state, "http://localhost:3000")
            .unwrap_or_else(|error| panic!("router build failed: {error}"))
    }

    fn directory() -> Arc<CountingDirectory> {
        Arc::new(CountingDirectory::new(Account {
            id: AccountId::new("self").unwrap_or_else(|_| panic!("test account id")),
            email: Some("self@example.com".to_owned()),
            email_verified: false,
            created_at: Utc::now() - Duration::days(3),
        }))
    }

    fn status_request(auth_header: Option<&str>) -> Request<Body> {
        let builder = Request::builder().method("GET").uri("/api/account/status");
        let builder = match auth_header {
            Some(value) => builder.header(header::AUTHORIZATION, value),
            None => builder,
        };
        builder
            .body(Body::empty())
            .unwrap_or_else(|error| panic!("request build failed: {error}"))
    }

    #[tokio::test]
    async fn status_without_token_is_unauthorized_and_reads_nothing() {
        let directory = directory();
        let response = app(directory.clone())
            .oneshot(status_request(None))
            .await
            .unwrap_or_else(|error| panic!("request failed: {error}"));

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(directory.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_with_invalid_token_is_unauthorized_and_reads_nothing() {
        let directory = directory();
        let response = app(directory.clone())
            .oneshot(status_request(Some("Bearer wrong-token")))
            .await
            .unwrap_or_else(|error| panic!("request failed: {error}"));

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(directory.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_with_valid_token_reaches_the_account_record() {
        let directory = directory();
        let response = app(directory.clone())
            .oneshot(status_request(Some("Bearer valid-token")))
            .await
            .unwrap_or_else(|error| panic!("request failed: {error}"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(directory.get_calls.load(Ordering::SeqCst), 1);
    }
}
