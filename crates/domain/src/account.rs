//! Account records as exposed by the external Identity Directory.

use chrono::{DateTime, Utc};
use motify_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Unique identifier for a directory account.
///
/// Identifiers are provider-issued opaque strings, stable for the lifetime
/// of the account. They are not UUIDs and must be treated as case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a validated account identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "account id must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One account record read from the Identity Directory.
///
/// The directory owns these records; this service only reads them and
/// requests deletions through the directory's API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Stable opaque identifier.
    pub id: AccountId,
    /// Email address, if the account has one.
    pub email: Option<String>,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Account creation time. Immutable.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::AccountId;

    #[test]
    fn account_id_accepts_opaque_strings() {
        let id = AccountId::new("uQ3rX9pLm2bZ7yKw");
        assert!(id.is_ok());
    }

    #[test]
    fn account_id_rejects_empty_values() {
        assert!(AccountId::new("").is_err());
        assert!(AccountId::new("   ").is_err());
    }

    #[test]
    fn account_id_preserves_case() {
        let id = AccountId::new("AbC").map(String::from);
        assert_eq!(id.ok().as_deref(), Some("AbC"));
    }
}
