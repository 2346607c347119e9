use async_trait::async_trait;
use motify_core::{AppResult, CallerIdentity};
use motify_domain::{Account, AccountId};

/// Port to the external Identity Directory holding all user accounts.
///
/// The directory is the single source of truth: this service never persists
/// account state of its own. Implementations are injected as constructed
/// clients with one instance per process, never reached through globals.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Lists accounts from the directory.
    ///
    /// Only a single page is consumed. Directories holding more than
    /// `page_size` accounts are scanned partially; callers treat the result
    /// as the complete working set for one invocation. Known limitation.
    async fn list_accounts(&self, page_size: usize) -> AppResult<Vec<Account>>;

    /// Returns one account by id, or `None` if it does not exist.
    async fn get_account(&self, account_id: &AccountId) -> AppResult<Option<Account>>;

    /// Deletes one account. Irreversible.
    ///
    /// Deleting an id that no longer exists is an error; overlapping sweeps
    /// therefore surface the second attempt as a per-account failure.
    async fn delete_account(&self, account_id: &AccountId) -> AppResult<()>;
}

/// Port for resolving a caller identity from a presented id token.
#[async_trait]
pub trait IdentityTokenVerifier: Send + Sync {
    /// Verifies an id token and returns the caller it belongs to.
    ///
    /// Fails with [`motify_core::AppError::Unauthorized`] for invalid or
    /// expired tokens.
    async fn verify_id_token(&self, id_token: &str) -> AppResult<CallerIdentity>;
}
