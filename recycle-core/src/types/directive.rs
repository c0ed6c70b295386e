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

//! Client directive headers and the header rewrites a policy produces.
//!
//! Each entity kind has a closed set of recognized fields. A field travels
//! in one of two forms:
//! - **set form**: `X-Account-Meta-Recycled: yes`
//! - **removal form**: `X-Remove-Account-Meta-Recycled: x`
//!
//! Headers that name no recognized field are never touched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The only value accepted for the mark-for-deletion directive.
pub const RECYCLED_VALUE: &str = "yes";

/// Value sent in removal-form headers.
pub const REMOVAL_MARKER: &str = "x";

/// A recognized directive field of one entity kind.
pub trait MetadataField: Copy + Ord + fmt::Debug + 'static {
    /// Every field of this kind.
    const ALL: &'static [Self];

    /// Lowercase header name of the set form.
    fn header_name(self) -> &'static str;

    /// Lowercase header name of the removal form.
    fn remove_header_name(self) -> &'static str;

    /// Looks up a field by set-form header name (case-insensitive).
    fn from_header_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.header_name().eq_ignore_ascii_case(name))
    }

    /// Looks up a field by removal-form header name (case-insensitive).
    fn from_remove_header_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.remove_header_name().eq_ignore_ascii_case(name))
    }
}

/// Recycle fields of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountField {
    /// `X-Account-Meta-Recycled`
    Recycled,
    /// `X-Account-Meta-Earliest-Delete-Date`
    EarliestDeleteDate,
}

impl MetadataField for AccountField {
    const ALL: &'static [Self] = &[AccountField::Recycled, AccountField::EarliestDeleteDate];

    fn header_name(self) -> &'static str {
        match self {
            AccountField::Recycled => "x-account-meta-recycled",
            AccountField::EarliestDeleteDate => "x-account-meta-earliest-delete-date",
        }
    }

    fn remove_header_name(self) -> &'static str {
        match self {
            AccountField::Recycled => "x-remove-account-meta-recycled",
            AccountField::EarliestDeleteDate => "x-remove-account-meta-earliest-delete-date",
        }
    }
}

/// Recycle fields of an object, including the storage-native expiry
/// directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectField {
    /// `X-Object-Meta-Recycled`
    Recycled,
    /// `X-Object-Meta-Delete-Date`
    DeleteDate,
    /// `X-Delete-At` (absolute expiry, Unix seconds)
    DeleteAt,
    /// `X-Delete-After` (relative expiry, seconds from now)
    DeleteAfter,
}

impl MetadataField for ObjectField {
    const ALL: &'static [Self] = &[
        ObjectField::Recycled,
        ObjectField::DeleteDate,
        ObjectField::DeleteAt,
        ObjectField::DeleteAfter,
    ];

    fn header_name(self) -> &'static str {
        match self {
            ObjectField::Recycled => "x-object-meta-recycled",
            ObjectField::DeleteDate => "x-object-meta-delete-date",
            ObjectField::DeleteAt => "x-delete-at",
            ObjectField::DeleteAfter => "x-delete-after",
        }
    }

    fn remove_header_name(self) -> &'static str {
        match self {
            ObjectField::Recycled => "x-remove-object-meta-recycled",
            ObjectField::DeleteDate => "x-remove-object-meta-delete-date",
            ObjectField::DeleteAt => "x-remove-delete-at",
            ObjectField::DeleteAfter => "x-remove-delete-after",
        }
    }
}

/// Recognized directives found on an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directives<F: MetadataField> {
    sets: BTreeMap<F, String>,
    removals: BTreeSet<F>,
}

impl<F: MetadataField> Default for Directives<F> {
    fn default() -> Self {
        Self {
            sets: BTreeMap::new(),
            removals: BTreeSet::new(),
        }
    }
}

impl<F: MetadataField> Directives<F> {
    /// Creates an empty directive set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts recognized directives from header pairs.
    ///
    /// If a set-form header repeats, the first occurrence wins.
    pub fn from_headers<I, N, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut directives = Self::new();
        for (name, value) in headers {
            let name = name.as_ref();
            if let Some(field) = F::from_header_name(name) {
                directives
                    .sets
                    .entry(field)
                    .or_insert_with(|| value.as_ref().to_string());
            } else if let Some(field) = F::from_remove_header_name(name) {
                directives.removals.insert(field);
            }
        }
        directives
    }

    /// Adds a set-form directive.
    pub fn with_set(mut self, field: F, value: impl Into<String>) -> Self {
        self.sets.insert(field, value.into());
        self
    }

    /// Adds a removal-form directive.
    pub fn with_removal(mut self, field: F) -> Self {
        self.removals.insert(field);
        self
    }

    /// Value of the set-form header for `field`.
    pub fn value(&self, field: F) -> Option<&str> {
        self.sets.get(&field).map(String::as_str)
    }

    /// True if the request carries the set form of `field`.
    pub fn sets(&self, field: F) -> bool {
        self.sets.contains_key(&field)
    }

    /// True if the request carries the removal form of `field`.
    pub fn removes(&self, field: F) -> bool {
        self.removals.contains(&field)
    }

    /// True if the request carries either form of `field`.
    pub fn touches(&self, field: F) -> bool {
        self.sets(field) || self.removes(field)
    }

    /// True if no recognized directive is present.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.removals.is_empty()
    }
}

/// New value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Send the set form with this value.
    Set(String),
    /// Send the removal form.
    Remove,
}

/// Header rewrites a policy wants applied before forwarding.
///
/// Immutable once built; the dispatcher turns it into header insertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSet<F: MetadataField> {
    entries: BTreeMap<F, Rewrite>,
}

impl<F: MetadataField> Default for RewriteSet<F> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<F: MetadataField> RewriteSet<F> {
    /// Creates an empty rewrite set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` to `value`.
    pub fn set(mut self, field: F, value: impl Into<String>) -> Self {
        self.entries.insert(field, Rewrite::Set(value.into()));
        self
    }

    /// Marks `field` for removal.
    pub fn remove(mut self, field: F) -> Self {
        self.entries.insert(field, Rewrite::Remove);
        self
    }

    /// Returns the rewrite for `field`.
    pub fn get(&self, field: F) -> Option<&Rewrite> {
        self.entries.get(&field)
    }

    /// Iterates in field order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &Rewrite)> {
        self.entries.iter().map(|(f, r)| (*f, r))
    }

    /// Number of rewritten fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is rewritten.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowers the set into `(header name, value)` pairs.
    ///
    /// Removals become the removal-form header carrying [`REMOVAL_MARKER`].
    pub fn to_header_pairs(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .map(|(field, rewrite)| match rewrite {
                Rewrite::Set(value) => (field.header_name(), value.clone()),
                Rewrite::Remove => (field.remove_header_name(), REMOVAL_MARKER.to_string()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_is_case_insensitive() {
        assert_eq!(
            AccountField::from_header_name("X-Account-Meta-Recycled"),
            Some(AccountField::Recycled)
        );
        assert_eq!(
            ObjectField::from_remove_header_name("X-Remove-Delete-At"),
            Some(ObjectField::DeleteAt)
        );
        assert_eq!(AccountField::from_header_name("x-object-meta-recycled"), None);
    }

    #[test]
    fn test_directives_from_headers() {
        let headers = [
            ("X-Object-Meta-Recycled", "yes"),
            ("X-Remove-Delete-After", "1"),
            ("X-Object-Meta-Color", "blue"),
            ("Content-Length", "0"),
        ];
        let directives = Directives::<ObjectField>::from_headers(headers);
        assert_eq!(directives.value(ObjectField::Recycled), Some("yes"));
        assert!(directives.removes(ObjectField::DeleteAfter));
        assert!(!directives.sets(ObjectField::DeleteAfter));
        assert!(directives.touches(ObjectField::DeleteAfter));
        assert!(!directives.touches(ObjectField::DeleteAt));
    }

    #[test]
    fn test_directives_ignore_unrecognized() {
        let headers = [("X-Account-Meta-Quota", "10"), ("X-Object-Meta-Recycled", "yes")];
        let directives = Directives::<AccountField>::from_headers(headers);
        assert!(directives.is_empty());
    }

    #[test]
    fn test_rewrite_set_header_pairs() {
        let rewrites = RewriteSet::new()
            .set(AccountField::Recycled, RECYCLED_VALUE)
            .remove(AccountField::EarliestDeleteDate);
        assert_eq!(
            rewrites.to_header_pairs(),
            vec![
                ("x-account-meta-recycled", "yes".to_string()),
                ("x-remove-account-meta-earliest-delete-date", "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_rewrite_set_last_write_wins() {
        let rewrites = RewriteSet::new()
            .set(ObjectField::DeleteAfter, "10")
            .remove(ObjectField::DeleteAfter);
        assert_eq!(rewrites.len(), 1);
        assert_eq!(rewrites.get(ObjectField::DeleteAfter), Some(&Rewrite::Remove));
    }
}
