use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use motify_core::{AppError, AppResult};
use motify_domain::{Account, AccountId, RetentionPolicy};

use super::{IdentityDirectory, RetentionService};

/// Directory double recording deletions and optionally failing some ids.
#[derive(Default)]
struct TestDirectory {
    accounts: Mutex<Vec<Account>>,
    failing_ids: Vec<String>,
    deleted: Mutex<Vec<String>>,
    fail_listing: bool,
}

impl TestDirectory {
    fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Self::default()
        }
    }
}

#[async_trait]
impl IdentityDirectory for TestDirectory {
    async fn list_accounts(&self, page_size: usize) -> AppResult<Vec<Account>> {
        if self.fail_listing {
            return Err(AppError::Internal("directory unreachable".to_owned()));
        }

        let accounts = self
            .accounts
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock directory: {error}")))?;
        Ok(accounts.iter().take(page_size).cloned().collect())
    }

    async fn get_account(&self, account_id: &AccountId) -> AppResult<Option<Account>> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock directory: {error}")))?;
        Ok(accounts
            .iter()
            .find(|account| account.id == *account_id)
            .cloned())
    }

    async fn delete_account(&self, account_id: &AccountId) -> AppResult<()> {
        if self.failing_ids.iter().any(|id| id == account_id.as_str()) {
            return Err(AppError::Internal(format!(
                "directory rejected deletion of '{account_id}'"
            )));
        }

        let mut accounts = self
            .accounts
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock directory: {error}")))?;
        let before = accounts.len();
        accounts.retain(|account| account.id != *account_id);
        if accounts.len() == before {
            return Err(AppError::NotFound(format!(
                "account '{account_id}' not found"
            )));
        }

        self.deleted
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock directory: {error}")))?
            .push(account_id.as_str().to_owned());
        Ok(())
    }
}

fn account(id: &str, days_old: i64, email_verified: bool) -> Account {
    Account {
        id: AccountId::new(id).unwrap_or_else(|_| panic!("test account id")),
        email: Some(format!("{id}@example.com")),
        email_verified,
        created_at: Utc::now() - Duration::days(days_old),
    }
}

fn service(directory: Arc<TestDirectory>) -> RetentionService {
    RetentionService::new(directory, RetentionPolicy::default())
}

#[tokio::test]
async fn sweep_deletes_unverified_account_past_window() {
    let directory = Arc::new(TestDirectory::with_accounts(vec![account(
        "stale", 8, false,
    )]));
    let report = service(directory.clone())
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("sweep failed: {error}"));

    assert_eq!(report.total_checked, 1);
    assert_eq!(report.marked_for_deletion, 1);
    assert_eq!(report.successfully_deleted, 1);
    assert_eq!(report.details.len(), 1);
    assert_eq!(report.details[0].id.as_str(), "stale");
    assert_eq!(report.details[0].days_old, 8);

    let deleted = directory.deleted.lock().map(|d| d.clone()).unwrap_or_default();
    assert_eq!(deleted, vec!["stale".to_owned()]);
}

#[tokio::test]
async fn sweep_spares_verified_and_recent_accounts() {
    let directory = Arc::new(TestDirectory::with_accounts(vec![
        account("verified-ancient", 400, true),
        account("unverified-young", 3, false),
    ]));
    let report = service(directory.clone())
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("sweep failed: {error}"));

    assert_eq!(report.total_checked, 2);
    assert_eq!(report.marked_for_deletion, 0);
    assert_eq!(report.successfully_deleted, 0);
    assert!(report.details.is_empty());
    assert!(
        directory
            .deleted
            .lock()
            .map(|d| d.is_empty())
            .unwrap_or(false)
    );
}

#[tokio::test]
async fn one_failed_deletion_does_not_block_siblings() {
    let directory = Arc::new(TestDirectory {
        accounts: Mutex::new(vec![
            account("a", 10, false),
            account("b", 11, false),
            account("c", 12, false),
        ]),
        failing_ids: vec!["b".to_owned()],
        ..TestDirectory::default()
    });
    let report = service(directory.clone())
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("sweep failed: {error}"));

    assert_eq!(report.marked_for_deletion, 3);
    assert_eq!(report.successfully_deleted, 2);
    // The failed account is still part of the marked detail list.
    assert_eq!(report.details.len(), 3);

    let mut deleted = directory.deleted.lock().map(|d| d.clone()).unwrap_or_default();
    deleted.sort();
    assert_eq!(deleted, vec!["a".to_owned(), "c".to_owned()]);
}

#[tokio::test]
async fn rerunning_after_success_marks_nothing() {
    let directory = Arc::new(TestDirectory::with_accounts(vec![
        account("stale", 9, false),
        account("fresh", 1, false),
    ]));
    let sweeper = service(directory.clone());

    let first = sweeper
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("first sweep failed: {error}"));
    assert_eq!(first.successfully_deleted, 1);

    let second = sweeper
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("second sweep failed: {error}"));
    assert_eq!(second.total_checked, 1);
    assert_eq!(second.marked_for_deletion, 0);
    assert_eq!(second.successfully_deleted, 0);
}

#[tokio::test]
async fn listing_failure_aborts_before_any_deletion() {
    let directory = Arc::new(TestDirectory {
        accounts: Mutex::new(vec![account("stale", 30, false)]),
        fail_listing: true,
        ..TestDirectory::default()
    });
    let result = service(directory.clone()).sweep().await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert!(
        directory
            .deleted
            .lock()
            .map(|d| d.is_empty())
            .unwrap_or(false)
    );
}

#[tokio::test]
async fn details_follow_listing_order() {
    let directory = Arc::new(TestDirectory::with_accounts(vec![
        account("third", 8, false),
        account("first", 20, false),
        account("second", 15, false),
    ]));
    let report = service(directory)
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("sweep failed: {error}"));

    let order: Vec<&str> = report
        .details
        .iter()
        .map(|detail| detail.id.as_str())
        .collect();
    assert_eq!(order, vec!["third", "first", "second"]);
}

#[tokio::test]
async fn report_counts_respect_invariant_chain() {
    let directory = Arc::new(TestDirectory {
        accounts: Mutex::new(vec![
            account("kept-verified", 100, true),
            account("kept-young", 2, false),
            account("swept-1", 8, false),
            account("swept-2", 9, false),
            account("fails", 10, false),
        ]),
        failing_ids: vec!["fails".to_owned()],
        ..TestDirectory::default()
    });
    let report = service(directory)
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("sweep failed: {error}"));

    assert!(report.successfully_deleted <= report.marked_for_deletion);
    assert!(report.marked_for_deletion <= report.total_checked);
    assert_eq!(report.total_checked, 5);
    assert_eq!(report.marked_for_deletion, 3);
    assert_eq!(report.successfully_deleted, 2);
}

#[tokio::test]
async fn listing_is_bounded_to_one_page() {
    let accounts = (0..super::DIRECTORY_PAGE_LIMIT + 5)
        .map(|index| account(&format!("acct-{index}"), 1, true))
        .collect();
    let directory = Arc::new(TestDirectory::with_accounts(accounts));
    let report = service(directory)
        .sweep()
        .await
        .unwrap_or_else(|error| panic!("sweep failed: {error}"));

    assert_eq!(report.total_checked, super::DIRECTORY_PAGE_LIMIT);
}
