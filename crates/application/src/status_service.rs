//! Self-service projection of the retention policy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use motify_core::{AppError, AppResult};
use motify_domain::{AccountId, RetentionPolicy};

use crate::IdentityDirectory;

/// Read-only retention status of one account.
#[derive(Debug, Clone)]
pub struct AccountStatus {
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Whole days since the account was created.
    pub account_age: i64,
    /// Days left before the account becomes a deletion candidate;
    /// `None` for verified accounts.
    pub will_be_deleted_in: Option<i64>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

/// Application service answering "when would my account be swept?".
#[derive(Clone)]
pub struct AccountStatusService {
    directory: Arc<dyn IdentityDirectory>,
    policy: RetentionPolicy,
}

impl AccountStatusService {
    /// Creates a status service over a directory client.
    #[must_use]
    pub fn new(directory: Arc<dyn IdentityDirectory>, policy: RetentionPolicy) -> Self {
        Self { directory, policy }
    }

    /// Returns the retention status of one account. Never mutates.
    pub async fn status_for(&self, account_id: &AccountId) -> AppResult<AccountStatus> {
        let account = self
            .directory
            .get_account(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account '{account_id}' not found")))?;

        let now = Utc::now();
        Ok(AccountStatus {
            email_verified: account.email_verified,
            account_age: RetentionPolicy::account_age_days(account.created_at, now),
            will_be_deleted_in: self.policy.days_until_deletion(&account, now),
            created_at: account.created_at,
        })
    }
}
