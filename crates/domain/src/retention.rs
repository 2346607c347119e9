//! Retention policy for unverified accounts.
//!
//! An account whose email was never verified is tolerated for a fixed grace
//! window after creation. Once the window has elapsed the account becomes a
//! deletion candidate. All computations take the clock as a parameter so a
//! single `now` snapshot can be reused across one sweep.

use chrono::{DateTime, Duration, Utc};
use motify_core::{AppError, AppResult};

use crate::Account;

/// Grace window, in whole days, granted to unverified accounts.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Decides whether an account has outlived the unverified grace window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    retention_days: i64,
}

impl RetentionPolicy {
    /// Creates a policy with a custom grace window.
    pub fn new(retention_days: i64) -> AppResult<Self> {
        if retention_days < 1 {
            return Err(AppError::Validation(
                "retention period must be at least one day".to_owned(),
            ));
        }

        Ok(Self { retention_days })
    }

    /// Returns the grace window length in days.
    #[must_use]
    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    /// Returns the creation-time cutoff for the given clock snapshot.
    ///
    /// Accounts created at or before the cutoff have exhausted the window.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.retention_days)
    }

    /// Returns whether the account violates the retention policy.
    ///
    /// True iff the email is unverified and the account is at least
    /// `retention_days` old at `now`. Verified accounts never violate the
    /// policy, regardless of age.
    #[must_use]
    pub fn is_violation(&self, account: &Account, now: DateTime<Utc>) -> bool {
        !account.email_verified && account.created_at <= self.cutoff(now)
    }

    /// Returns the account age in whole elapsed days, never negative.
    #[must_use]
    pub fn account_age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (now - created_at).num_days().max(0)
    }

    /// Returns the days left before an account becomes a deletion candidate.
    ///
    /// `None` for verified accounts; otherwise `max(0, window - age)`. Zero
    /// means the next sweep will remove the account.
    #[must_use]
    pub fn days_until_deletion(&self, account: &Account, now: DateTime<Utc>) -> Option<i64> {
        if account.email_verified {
            return None;
        }

        let age = Self::account_age_days(account.created_at, now);
        Some((self.retention_days - age).max(0))
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}
