// Copyright 2026 Recycle Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Account recycle policy.
//!
//! Accounts move between two states:
//!
//! - **normal**: no `recycled` mark
//! - **marked**: `recycled: yes` plus an `earliest-delete-date`
//!
//! A marked account is hidden from GET. DELETE is refused until the
//! earliest delete date is reached ("ripe"); after that the DELETE goes
//! through to the backend. The unmark directive returns the account to
//! normal at any time before it is destroyed.

use recycle_core::{
    AccountField, Directives, Metadata, PolicyError, RewriteSet, META_EARLIEST_DELETE_DATE,
    RECYCLED_VALUE,
};
use tracing::{debug, error, info};

use crate::action::{Action, Verdict};

/// Decides account GET, DELETE and POST requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPolicy {
    grace_seconds: i64,
}

impl AccountPolicy {
    /// Creates a policy with the given grace period in seconds.
    pub fn new(grace_seconds: u64) -> Self {
        Self {
            grace_seconds: i64::try_from(grace_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Grace period in seconds.
    pub fn grace_seconds(&self) -> i64 {
        self.grace_seconds
    }

    /// Read of account metadata or the container listing.
    ///
    /// A marked account (mark set and a non-empty delete date) reads as not
    /// found; the rejection carries the stored delete date.
    pub fn on_read(&self, metadata: Option<&Metadata>) -> Verdict<AccountField> {
        let Some(metadata) = metadata else {
            return Ok(Action::Forward);
        };

        let delete_date = metadata.get(META_EARLIEST_DELETE_DATE).unwrap_or("");
        if metadata.recycled() == RECYCLED_VALUE && !delete_date.is_empty() {
            debug!("Account is marked for deletion, hiding it");
            return Err(PolicyError::AccountMarked {
                earliest_delete_date: delete_date.to_string(),
            });
        }

        Ok(Action::Forward)
    }

    /// Destroy request.
    ///
    /// Allowed only once the account is marked and `now` has reached the
    /// earliest delete date (`now >= date`). A missing date reads as `0`, so
    /// a marked account without one counts as ripe. The stored date is
    /// parsed before the mark is checked: an unparseable date is corrupt
    /// state whether or not the account is marked.
    pub fn on_delete(&self, metadata: Option<&Metadata>, now: i64) -> Verdict<AccountField> {
        // Unknown account: let the backend answer
        let Some(metadata) = metadata else {
            return Ok(Action::Forward);
        };

        let raw = metadata.get(META_EARLIEST_DELETE_DATE).unwrap_or("0");
        let earliest_delete_date = raw.trim().parse::<i64>().map_err(|_| {
            error!("Cannot parse earliest delete date '{}'", raw);
            PolicyError::CorruptAccountState {
                value: raw.to_string(),
            }
        })?;

        if metadata.recycled() != RECYCLED_VALUE {
            return Err(PolicyError::AccountNotMarked);
        }

        if now < earliest_delete_date {
            return Err(PolicyError::AccountNotRipe {
                earliest_delete_date,
            });
        }

        info!(
            "Account delete permitted (earliest delete date {} reached at {})",
            earliest_delete_date, now
        );
        Ok(Action::Forward)
    }

    /// Metadata update (POST).
    ///
    /// The earliest delete date is policy-owned: any attempt to set or remove
    /// it is refused. The mark directive computes the date from `now`; the
    /// unmark directive clears both fields. The mark wins if both are sent.
    pub fn on_write(
        &self,
        directives: &Directives<AccountField>,
        now: i64,
    ) -> Verdict<AccountField> {
        if directives.touches(AccountField::EarliestDeleteDate) {
            return Err(PolicyError::ProtectedAccountField);
        }

        if directives.value(AccountField::Recycled) == Some(RECYCLED_VALUE) {
            let earliest_delete_date = now.saturating_add(self.grace_seconds);
            info!(
                "Marking account for deletion, earliest delete date {}",
                earliest_delete_date
            );
            return Ok(Action::Rewrite(
                RewriteSet::new()
                    .set(AccountField::Recycled, RECYCLED_VALUE)
                    .set(
                        AccountField::EarliestDeleteDate,
                        earliest_delete_date.to_string(),
                    ),
            ));
        }

        if directives.removes(AccountField::Recycled) {
            info!("Unmarking account");
            return Ok(Action::Rewrite(
                RewriteSet::new()
                    .remove(AccountField::Recycled)
                    .remove(AccountField::EarliestDeleteDate),
            ));
        }

        Ok(Action::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recycle_core::Rewrite;

    fn marked(date: &str) -> Metadata {
        [("recycled", "yes"), ("earliest-delete-date", date)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_read_unmarked_forwards() {
        let policy = AccountPolicy::new(30);
        assert_eq!(policy.on_read(None), Ok(Action::Forward));
        assert_eq!(policy.on_read(Some(&Metadata::new())), Ok(Action::Forward));
    }

    #[test]
    fn test_read_marked_is_hidden() {
        let policy = AccountPolicy::new(30);
        assert_eq!(
            policy.on_read(Some(&marked("1030"))),
            Err(PolicyError::AccountMarked {
                earliest_delete_date: "1030".to_string()
            })
        );
    }

    #[test]
    fn test_read_mark_without_date_is_visible() {
        let policy = AccountPolicy::new(30);
        let meta: Metadata = [("recycled", "yes")].into_iter().collect();
        assert_eq!(policy.on_read(Some(&meta)), Ok(Action::Forward));
        assert_eq!(policy.on_read(Some(&marked(""))), Ok(Action::Forward));
    }

    #[test]
    fn test_delete_unmarked_rejected() {
        let policy = AccountPolicy::new(30);
        assert_eq!(
            policy.on_delete(Some(&Metadata::new()), 5000),
            Err(PolicyError::AccountNotMarked)
        );
        let meta: Metadata = [("recycled", "no"), ("earliest-delete-date", "1")]
            .into_iter()
            .collect();
        assert_eq!(
            policy.on_delete(Some(&meta), 5000),
            Err(PolicyError::AccountNotMarked)
        );
    }

    #[test]
    fn test_delete_unknown_account_forwards() {
        let policy = AccountPolicy::new(30);
        assert_eq!(policy.on_delete(None, 0), Ok(Action::Forward));
    }

    #[test]
    fn test_delete_ripeness_boundary() {
        let policy = AccountPolicy::new(30);
        let meta = marked("1030");
        assert_eq!(
            policy.on_delete(Some(&meta), 1029),
            Err(PolicyError::AccountNotRipe {
                earliest_delete_date: 1030
            })
        );
        assert_eq!(policy.on_delete(Some(&meta), 1030), Ok(Action::Forward));
        assert_eq!(policy.on_delete(Some(&meta), 99999), Ok(Action::Forward));
    }

    #[test]
    fn test_delete_corrupt_date() {
        let policy = AccountPolicy::new(30);
        assert_eq!(
            policy.on_delete(Some(&marked("tomorrow")), 0),
            Err(PolicyError::CorruptAccountState {
                value: "tomorrow".to_string()
            })
        );
        assert_eq!(
            policy.on_delete(Some(&marked("")), 0),
            Err(PolicyError::CorruptAccountState {
                value: String::new()
            })
        );
    }

    #[test]
    fn test_delete_unmarked_with_corrupt_date() {
        let policy = AccountPolicy::new(30);
        let meta: Metadata = [("earliest-delete-date", "garbage")].into_iter().collect();
        assert_eq!(
            policy.on_delete(Some(&meta), 0),
            Err(PolicyError::CorruptAccountState {
                value: "garbage".to_string()
            })
        );
    }

    #[test]
    fn test_delete_marked_without_date_is_ripe() {
        let policy = AccountPolicy::new(30);
        let meta: Metadata = [("recycled", "yes")].into_iter().collect();
        assert_eq!(policy.on_delete(Some(&meta), 0), Ok(Action::Forward));
    }

    #[test]
    fn test_write_mark_computes_date() {
        let policy = AccountPolicy::new(30);
        let directives = Directives::new().with_set(AccountField::Recycled, "yes");

        let action = policy.on_write(&directives, 1000).unwrap();
        let rewrites = action.rewrites().unwrap();
        assert_eq!(
            rewrites.get(AccountField::Recycled),
            Some(&Rewrite::Set("yes".to_string()))
        );
        assert_eq!(
            rewrites.get(AccountField::EarliestDeleteDate),
            Some(&Rewrite::Set("1030".to_string()))
        );
    }

    #[test]
    fn test_write_mark_is_not_cumulative() {
        let policy = AccountPolicy::new(30);
        let directives = Directives::new().with_set(AccountField::Recycled, "yes");
        let again = policy.on_write(&directives, 2000).unwrap();
        assert_eq!(
            again.rewrites().unwrap().get(AccountField::EarliestDeleteDate),
            Some(&Rewrite::Set("2030".to_string()))
        );
    }

    #[test]
    fn test_write_protected_field_rejected() {
        let policy = AccountPolicy::new(30);
        for directives in [
            Directives::new().with_set(AccountField::EarliestDeleteDate, "1"),
            Directives::new().with_removal(AccountField::EarliestDeleteDate),
            Directives::new()
                .with_set(AccountField::Recycled, "yes")
                .with_set(AccountField::EarliestDeleteDate, "1"),
        ] {
            assert_eq!(
                policy.on_write(&directives, 0),
                Err(PolicyError::ProtectedAccountField)
            );
        }
    }

    #[test]
    fn test_write_unmark_clears_both() {
        let policy = AccountPolicy::new(30);
        let directives = Directives::new().with_removal(AccountField::Recycled);
        let action = policy.on_write(&directives, 0).unwrap();
        let rewrites = action.rewrites().unwrap();
        assert_eq!(rewrites.get(AccountField::Recycled), Some(&Rewrite::Remove));
        assert_eq!(
            rewrites.get(AccountField::EarliestDeleteDate),
            Some(&Rewrite::Remove)
        );
    }

    #[test]
    fn test_write_mark_wins_over_unmark() {
        let policy = AccountPolicy::new(30);
        let directives = Directives::new()
            .with_set(AccountField::Recycled, "yes")
            .with_removal(AccountField::Recycled);
        let action = policy.on_write(&directives, 0).unwrap();
        assert_eq!(
            action.rewrites().unwrap().get(AccountField::Recycled),
            Some(&Rewrite::Set("yes".to_string()))
        );
    }

    #[test]
    fn test_write_other_values_forward() {
        let policy = AccountPolicy::new(30);
        let directives = Directives::new().with_set(AccountField::Recycled, "no");
        assert_eq!(policy.on_write(&directives, 0), Ok(Action::Forward));
        assert_eq!(policy.on_write(&Directives::new(), 0), Ok(Action::Forward));
    }
}
