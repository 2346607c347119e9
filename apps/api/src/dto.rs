//! API payload types exported to the frontend.

use motify_application::{AccountStatus, SweptAccount};
use motify_domain::TaskSuggestion;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    /// Fixed readiness marker.
    pub status: &'static str,
}

/// Retention status of the authenticated caller's own account.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/account-status-response.ts"
)]
pub struct AccountStatusResponse {
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Whole days since account creation.
    pub account_age: i64,
    /// Days until the sweeper would remove the account; `null` if verified.
    pub will_be_deleted_in: Option<i64>,
    /// Account creation time, RFC 3339.
    pub created_at: String,
}

impl From<AccountStatus> for AccountStatusResponse {
    fn from(value: AccountStatus) -> Self {
        Self {
            email_verified: value.email_verified,
            account_age: value.account_age,
            will_be_deleted_in: value.will_be_deleted_in,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// One account removed (or attempted) by a manual sweep.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/swept-account.ts"
)]
pub struct SweptAccountDto {
    /// Directory account id.
    pub id: String,
    /// Email at the time of the scan, if any.
    pub email: Option<String>,
    /// Account creation time, RFC 3339.
    pub created_at: String,
    /// Whole days old at the sweep's clock snapshot.
    pub days_old: i64,
}

impl From<SweptAccount> for SweptAccountDto {
    fn from(value: SweptAccount) -> Self {
        Self {
            id: value.id.into(),
            email: value.email,
            created_at: value.created_at.to_rfc3339(),
            days_old: value.days_old,
        }
    }
}

/// Successful manual sweep response.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/manual-sweep-response.ts"
)]
pub struct ManualSweepResponse {
    /// Always `true` for this shape.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Accounts examined during the listing scan.
    pub total_checked: usize,
    /// Deletion requests that completed without error.
    pub deleted: usize,
    /// Per-account detail; omitted when nothing was marked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<SweptAccountDto>>,
    /// Sweep completion time, RFC 3339.
    pub timestamp: String,
}

/// Failed manual sweep response.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/manual-sweep-failure.ts"
)]
pub struct ManualSweepFailureResponse {
    /// Always `false` for this shape.
    pub success: bool,
    /// Short error summary.
    pub error: String,
    /// Underlying failure detail.
    pub details: String,
}

/// Task generation request body.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/generate-tasks-request.ts"
)]
pub struct GenerateTasksRequest {
    /// Free-form goal description to turn into tasks.
    pub prompt: String,
}

/// One generated task suggestion.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-suggestion.ts"
)]
pub struct TaskSuggestionDto {
    /// Short task title.
    pub title: String,
    /// Longer task description.
    pub description: String,
    /// Estimated effort in weeks.
    pub week_estimate: u32,
    /// Estimated effort in days.
    pub day_estimate: u32,
    /// Conditions under which the task counts as done.
    pub acceptance_criteria: Vec<String>,
}

impl From<TaskSuggestion> for TaskSuggestionDto {
    fn from(value: TaskSuggestion) -> Self {
        Self {
            title: value.title,
            description: value.description,
            week_estimate: value.week_estimate,
            day_estimate: value.day_estimate,
            acceptance_criteria: value.acceptance_criteria,
        }
    }
}

/// Successful task generation response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/generate-tasks-response.ts"
)]
pub struct GenerateTasksResponse {
    /// Generated task suggestions.
    pub result: Vec<TaskSuggestionDto>,
}

/// Task generation error response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/generate-tasks-error.ts"
)]
pub struct GenerateTasksErrorResponse {
    /// Explicit error message.
    pub error: String,
}
