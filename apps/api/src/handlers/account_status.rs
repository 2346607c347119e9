use axum::extract::State;
use axum::{Extension, Json};
use motify_core::auth::CallerIdentity;
use motify_domain::AccountId;

use crate::dto::AccountStatusResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Returns the retention status of the authenticated caller's own account.
pub async fn account_status(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> ApiResult<Json<AccountStatusResponse>> {
    let account_id = AccountId::new(identity.subject())?;
    let status = state.status_service.status_for(&account_id).await?;

    Ok(Json(status.into()))
}
