use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use motify_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Requires a valid identity bearer token and attaches the resolved
/// [`motify_core::CallerIdentity`] to the request.
///
/// Runs before the handler touches any directory data: requests without a
/// verifiable token are rejected here.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let identity = state.token_verifier.verify_id_token(&token).await?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extracts a bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
