//! HTTP client for the identity provider's admin REST API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use motify_application::{IdentityDirectory, IdentityTokenVerifier};
use motify_core::{AppError, AppResult, CallerIdentity};
use motify_domain::{Account, AccountId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Account record as returned by the provider admin API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAccount {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    created_at: DateTime<Utc>,
}

impl WireAccount {
    fn into_account(self) -> AppResult<Account> {
        Ok(Account {
            id: AccountId::new(self.id)?,
            email: self.email,
            email_verified: self.email_verified,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListAccountsResponse {
    #[serde(default)]
    accounts: Vec<WireAccount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupTokenRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupTokenResponse {
    subject: String,
    #[serde(default)]
    email: Option<String>,
}

/// Admin API client implementing the directory and token-verifier ports.
///
/// One instance is constructed per process and injected into the services
/// that need it; there is no shared global client state.
pub struct HttpIdentityDirectory {
    http_client: reqwest::Client,
    base_url: String,
    admin_token: String,
}

impl HttpIdentityDirectory {
    /// Creates a directory client for the given admin API base URL.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        admin_token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http_client,
            base_url,
            admin_token: admin_token.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.admin_token.as_str())
    }

    async fn error_from_response(context: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        AppError::Internal(format!(
            "{context} returned status {}: {body}",
            status.as_u16()
        ))
    }
}

#[async_trait]
impl IdentityDirectory for HttpIdentityDirectory {
    async fn list_accounts(&self, page_size: usize) -> AppResult<Vec<Account>> {
        let response = self
            .authorized(self.http_client.get(self.endpoint("/v1/accounts")))
            .query(&[("pageSize", page_size)])
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call directory listing: {error}"))
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("directory listing", response).await);
        }

        let body = response
            .json::<ListAccountsResponse>()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to parse directory listing: {error}"))
            })?;

        body.accounts
            .into_iter()
            .map(WireAccount::into_account)
            .collect()
    }

    async fn get_account(&self, account_id: &AccountId) -> AppResult<Option<Account>> {
        let response = self
            .authorized(
                self.http_client
                    .get(self.endpoint(&format!("/v1/accounts/{account_id}"))),
            )
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call directory lookup: {error}"))
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response("directory lookup", response).await);
        }

        let wire = response.json::<WireAccount>().await.map_err(|error| {
            AppError::Internal(format!("failed to parse directory lookup: {error}"))
        })?;
        wire.into_account().map(Some)
    }

    async fn delete_account(&self, account_id: &AccountId) -> AppResult<()> {
        let response = self
            .authorized(
                self.http_client
                    .delete(self.endpoint(&format!("/v1/accounts/{account_id}"))),
            )
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call directory deletion: {error}"))
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "account '{account_id}' not found"
            )));
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response("directory deletion", response).await);
        }

        debug!(account_id = %account_id, "directory account deleted");
        Ok(())
    }
}

#[async_trait]
impl IdentityTokenVerifier for HttpIdentityDirectory {
    async fn verify_id_token(&self, id_token: &str) -> AppResult<CallerIdentity> {
        let response = self
            .authorized(self.http_client.post(self.endpoint("/v1/accounts:lookup")))
            .json(&LookupTokenRequest { id_token })
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call token verification: {error}"))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::BAD_REQUEST
        {
            return Err(AppError::Unauthorized(
                "id token is invalid or expired".to_owned(),
            ));
        }

        if !status.is_success() {
            return Err(Self::error_from_response("token verification", response).await);
        }

        let claims = response.json::<LookupTokenResponse>().await.map_err(|error| {
            AppError::Internal(format!("failed to parse token verification: {error}"))
        })?;

        Ok(CallerIdentity::new(claims.subject, claims.email))
    }
}
