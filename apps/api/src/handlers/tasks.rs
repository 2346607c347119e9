use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::dto::{GenerateTasksErrorResponse, GenerateTasksRequest, GenerateTasksResponse};
use crate::state::AppState;

/// Generates task suggestions for a free-form prompt via the configured
/// upstream provider.
pub async fn generate_tasks(
    State(state): State<AppState>,
    Json(request): Json<GenerateTasksRequest>,
) -> Response {
    if request.prompt.trim().is_empty() {
        let payload = Json(GenerateTasksErrorResponse {
            error: "prompt is required".to_owned(),
        });
        return (StatusCode::BAD_REQUEST, payload).into_response();
    }

    let Some(generator) = state.task_generator.as_ref() else {
        let payload = Json(GenerateTasksErrorResponse {
            error: "PERPLEXITY_API_KEY is not configured".to_owned(),
        });
        return (StatusCode::INTERNAL_SERVER_ERROR, payload).into_response();
    };

    match generator.generate_tasks(&request.prompt).await {
        Ok(suggestions) => {
            let payload = Json(GenerateTasksResponse {
                result: suggestions.into_iter().map(Into::into).collect(),
            });
            (StatusCode::OK, payload).into_response()
        }
        Err(err) => {
            error!(error = %err, "task generation failed");
            let payload = Json(GenerateTasksErrorResponse {
                error: err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, payload).into_response()
        }
    }
}
