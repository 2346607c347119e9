use async_trait::async_trait;
use chrono::{DateTime, Utc};
use motify_application::{IdentityDirectory, IdentityTokenVerifier};
use motify_core::{AppError, AppResult, CallerIdentity};
use motify_domain::{Account, AccountId};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory Identity Directory implementation.
///
/// Used by tests and the `DIRECTORY_PROVIDER=memory` local mode. Accounts
/// keep insertion order so listing scans are deterministic. Token
/// verification treats the presented token as the account id directly,
/// which keeps local flows usable without a real identity provider.
#[derive(Debug, Default)]
pub struct InMemoryIdentityDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryIdentityDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
        }
    }

    /// Inserts a fully specified account record.
    pub async fn insert_account(&self, account: Account) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.iter().any(|existing| existing.id == account.id) {
            return Err(AppError::Conflict(format!(
                "account '{}' already exists",
                account.id
            )));
        }

        accounts.push(account);
        Ok(())
    }

    /// Creates an account with a generated id and returns that id.
    pub async fn create_account(
        &self,
        email: Option<String>,
        email_verified: bool,
        created_at: DateTime<Utc>,
    ) -> AppResult<AccountId> {
        let id = AccountId::new(Uuid::new_v4().simple().to_string())?;
        self.insert_account(Account {
            id: id.clone(),
            email,
            email_verified,
            created_at,
        })
        .await?;
        Ok(id)
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn list_accounts(&self, page_size: usize) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().take(page_size).cloned().collect())
    }

    async fn get_account(&self, account_id: &AccountId) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.id == *account_id)
            .cloned())
    }

    async fn delete_account(&self, account_id: &AccountId) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|account| account.id != *account_id);

        if accounts.len() == before {
            return Err(AppError::NotFound(format!(
                "account '{account_id}' not found"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl IdentityTokenVerifier for InMemoryIdentityDirectory {
    async fn verify_id_token(&self, id_token: &str) -> AppResult<CallerIdentity> {
        let account_id = AccountId::new(id_token)
            .map_err(|_| AppError::Unauthorized("id token is invalid".to_owned()))?;

        let account = self
            .get_account(&account_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("id token is invalid or expired".to_owned()))?;

        Ok(CallerIdentity::new(
            account.id.as_str(),
            account.email.clone(),
        ))
    }
}
