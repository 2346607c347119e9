//! Account retention sweep.
//!
//! One sweep lists the directory, marks every unverified account that has
//! outlived the grace window, and requests deletion of all marked accounts
//! concurrently. The sweep is read-then-act, not transactional: an account
//! verified between the listing and the deletion fan-out is still deleted.
//! Overlapping sweeps are not mutually excluded; the loser of a delete race
//! records a per-account failure and moves on.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use motify_core::AppResult;
use motify_domain::{Account, AccountId, RetentionPolicy};
use tracing::{info, warn};
use uuid::Uuid;

use crate::IdentityDirectory;

/// Largest directory page one sweep consumes. Accounts beyond this bound
/// are not scanned.
pub const DIRECTORY_PAGE_LIMIT: usize = 1000;

/// Per-account detail for one marked account, in listing-scan order.
#[derive(Debug, Clone)]
pub struct SweptAccount {
    /// Directory account id.
    pub id: AccountId,
    /// Email address at the time of the scan, if any.
    pub email: Option<String>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
    /// Whole days between creation and the sweep's `now` snapshot.
    pub days_old: i64,
}

/// Outcome of one sweep invocation. Never persisted.
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Accounts examined during the listing scan.
    pub total_checked: usize,
    /// Accounts matching the retention-violation predicate.
    pub marked_for_deletion: usize,
    /// Deletion requests that completed without error.
    pub successfully_deleted: usize,
    /// Time the sweep finished.
    pub completed_at: DateTime<Utc>,
    /// One record per marked account, in the order encountered while
    /// scanning the listing.
    pub details: Vec<SweptAccount>,
}

/// Application service running retention sweeps against the directory.
#[derive(Clone)]
pub struct RetentionService {
    directory: Arc<dyn IdentityDirectory>,
    policy: RetentionPolicy,
}

impl RetentionService {
    /// Creates a retention service over a directory client.
    #[must_use]
    pub fn new(directory: Arc<dyn IdentityDirectory>, policy: RetentionPolicy) -> Self {
        Self { directory, policy }
    }

    /// Returns the policy this service sweeps with.
    #[must_use]
    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Runs one retention sweep and returns its report.
    ///
    /// The predicate is evaluated once per account against a single `now`
    /// snapshot captured at sweep start. A listing failure aborts the whole
    /// sweep before anything is deleted; individual deletion failures are
    /// logged with the account id and only reduce the success tally.
    pub async fn sweep(&self) -> AppResult<SweepReport> {
        let run_id = Uuid::new_v4();
        let now = Utc::now();

        let accounts = self.directory.list_accounts(DIRECTORY_PAGE_LIMIT).await?;
        let total_checked = accounts.len();

        let marked: Vec<Account> = accounts
            .into_iter()
            .filter(|account| self.policy.is_violation(account, now))
            .collect();
        let marked_for_deletion = marked.len();

        info!(
            run_id = %run_id,
            total_checked,
            marked_for_deletion,
            retention_days = self.policy.retention_days(),
            "retention sweep scan complete"
        );

        let mut successfully_deleted = 0_usize;
        if !marked.is_empty() {
            let deletions = marked.iter().map(|account| {
                let directory = Arc::clone(&self.directory);
                let account_id = account.id.clone();
                async move {
                    let outcome = directory.delete_account(&account_id).await;
                    (account_id, outcome)
                }
            });

            // Every deletion is awaited; one failure neither cancels nor
            // blocks its siblings.
            for (account_id, outcome) in join_all(deletions).await {
                match outcome {
                    Ok(()) => successfully_deleted += 1,
                    Err(error) => {
                        warn!(
                            run_id = %run_id,
                            account_id = %account_id,
                            error = %error,
                            "account deletion failed"
                        );
                    }
                }
            }
        }

        let details = marked
            .into_iter()
            .map(|account| SweptAccount {
                days_old: RetentionPolicy::account_age_days(account.created_at, now),
                id: account.id,
                email: account.email,
                created_at: account.created_at,
            })
            .collect();

        let report = SweepReport {
            total_checked,
            marked_for_deletion,
            successfully_deleted,
            completed_at: Utc::now(),
            details,
        };

        info!(
            run_id = %run_id,
            total_checked = report.total_checked,
            marked_for_deletion = report.marked_for_deletion,
            successfully_deleted = report.successfully_deleted,
            "retention sweep finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests;
