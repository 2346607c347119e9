use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use motify_core::AppError;
use tracing::error;

use crate::dto::{ManualSweepFailureResponse, ManualSweepResponse};
use crate::error::ApiError;
use crate::middleware::bearer_token;
use crate::state::AppState;

/// Entry point for the manual retention sweep trigger.
///
/// Bound with `any()` so the method check runs first: non-POST requests get
/// 405 before any credential is inspected or directory data touched.
pub async fn manual_sweep_entry(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    if method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    }

    let authorized = bearer_token(&headers)
        .is_some_and(|token| token == state.operator_token);
    if !authorized {
        return ApiError(AppError::Unauthorized(
            "operator token required".to_owned(),
        ))
        .into_response();
    }

    match state.retention_service.sweep().await {
        Ok(report) => {
            let message = if report.marked_for_deletion == 0 {
                "no accounts found for deletion".to_owned()
            } else {
                format!(
                    "deleted {} of {} marked accounts",
                    report.successfully_deleted, report.marked_for_deletion
                )
            };
            let details = if report.marked_for_deletion == 0 {
                None
            } else {
                Some(report.details.into_iter().map(Into::into).collect())
            };

            let payload = Json(ManualSweepResponse {
                success: true,
                message,
                total_checked: report.total_checked,
                deleted: report.successfully_deleted,
                details,
                timestamp: report.completed_at.to_rfc3339(),
            });
            (StatusCode::OK, payload).into_response()
        }
        Err(err) => {
            error!(error = %err, "manual retention sweep failed");
            let payload = Json(ManualSweepFailureResponse {
                success: false,
                error: "retention sweep failed".to_owned(),
                details: err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, payload).into_response()
        }
    }
}
