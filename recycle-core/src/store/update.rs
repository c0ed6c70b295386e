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

//! Metadata and expiry changes carried by write requests.

use crate::error::StoreError;
use crate::types::{EntityKind, Metadata};

/// Metadata changes requested by `X-<Kind>-Meta-*` and
/// `X-Remove-<Kind>-Meta-*` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    sets: Vec<(String, String)>,
    removals: Vec<String>,
}

impl MetadataUpdate {
    /// Collects the metadata changes for `kind` from header pairs.
    pub fn from_headers<'a, I>(kind: EntityKind, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::from_prefixed_headers(kind.meta_prefix(), kind.remove_meta_prefix(), headers)
    }

    /// Collects metadata changes carried under arbitrary set and removal
    /// prefixes (for example `x-container-meta-`).
    pub fn from_prefixed_headers<'a, I>(prefix: &str, remove_prefix: &str, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut update = Self::default();
        for (name, value) in headers {
            let name = name.to_ascii_lowercase();
            if let Some(key) = name.strip_prefix(prefix) {
                if !key.is_empty() {
                    update.sets.push((key.to_string(), value.to_string()));
                }
            } else if let Some(key) = name.strip_prefix(remove_prefix) {
                if !key.is_empty() {
                    update.removals.push(key.to_string());
                }
            }
        }
        update
    }

    /// Applies the changes to `metadata`. Removals run after sets.
    pub fn apply(&self, metadata: &mut Metadata) {
        for (key, value) in &self.sets {
            metadata.insert(key.clone(), value.clone());
        }
        for key in &self.removals {
            metadata.remove(key);
        }
    }

    /// True if nothing changes.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.removals.is_empty()
    }
}

/// Change to an object's scheduled expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryUpdate {
    /// Leave the current expiry as it is.
    #[default]
    Keep,
    /// Expire at this Unix timestamp.
    At(i64),
    /// Cancel any scheduled expiry.
    Clear,
}

impl ExpiryUpdate {
    /// Reads `X-Delete-At`, `X-Delete-After` and their removal forms.
    ///
    /// `X-Delete-After` is resolved against `now`. A removal header cancels
    /// the expiry even when a set form is also present.
    pub fn from_headers<'a, I>(headers: I, now: i64) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut update = ExpiryUpdate::Keep;
        let mut clear = false;

        for (name, value) in headers {
            match name.to_ascii_lowercase().as_str() {
                "x-delete-at" => {
                    update = ExpiryUpdate::At(parse_seconds(name, value)?);
                }
                "x-delete-after" => {
                    let after = parse_seconds(name, value)?;
                    if after < 0 {
                        return Err(StoreError::InvalidHeader {
                            header: name.to_string(),
                            reason: "must not be negative".to_string(),
                        });
                    }
                    let at = now.checked_add(after).ok_or_else(|| StoreError::InvalidHeader {
                        header: name.to_string(),
                        reason: format!("'{}' is out of range", value),
                    })?;
                    update = ExpiryUpdate::At(at);
                }
                "x-remove-delete-at" | "x-remove-delete-after" => clear = true,
                _ => {}
            }
        }

        if clear {
            return Ok(ExpiryUpdate::Clear);
        }
        Ok(update)
    }

    /// Applies the change to an existing expiry.
    pub fn apply(self, current: Option<i64>) -> Option<i64> {
        match self {
            ExpiryUpdate::Keep => current,
            ExpiryUpdate::At(at) => Some(at),
            ExpiryUpdate::Clear => None,
        }
    }
}

fn parse_seconds(header: &str, value: &str) -> Result<i64, StoreError> {
    value.trim().parse::<i64>().map_err(|_| StoreError::InvalidHeader {
        header: header.to_string(),
        reason: format!("'{}' is not an integer", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_update_sets_and_removes() {
        let headers = [
            ("X-Account-Meta-Recycled", "yes"),
            ("X-Remove-Account-Meta-Color", "x"),
            ("X-Object-Meta-Ignored", "1"),
        ];
        let update = MetadataUpdate::from_headers(EntityKind::Account, headers);

        let mut meta: Metadata = [("color", "blue")].into_iter().collect();
        update.apply(&mut meta);
        assert_eq!(meta.recycled(), "yes");
        assert_eq!(meta.get("color"), None);
        assert_eq!(meta.get("ignored"), None);
    }

    #[test]
    fn test_metadata_update_container_prefix() {
        let headers = [("X-Container-Meta-Owner", "ops"), ("X-Remove-Container-Meta-Old", "x")];
        let update = MetadataUpdate::from_prefixed_headers(
            "x-container-meta-",
            "x-remove-container-meta-",
            headers,
        );

        let mut meta: Metadata = [("old", "1")].into_iter().collect();
        update.apply(&mut meta);
        assert_eq!(meta.get("owner"), Some("ops"));
        assert_eq!(meta.get("old"), None);
    }

    #[test]
    fn test_metadata_update_empty() {
        let update = MetadataUpdate::from_headers(EntityKind::Object, [("Content-Type", "a/b")]);
        assert!(update.is_empty());
    }

    #[test]
    fn test_expiry_delete_after_resolves_against_now() {
        let update = ExpiryUpdate::from_headers([("X-Delete-After", "600")], 2000).unwrap();
        assert_eq!(update, ExpiryUpdate::At(2600));
        assert_eq!(update.apply(None), Some(2600));
    }

    #[test]
    fn test_expiry_delete_at() {
        let update = ExpiryUpdate::from_headers([("x-delete-at", "5000")], 2000).unwrap();
        assert_eq!(update, ExpiryUpdate::At(5000));
    }

    #[test]
    fn test_expiry_removal_wins() {
        let headers = [("X-Delete-After", "10"), ("X-Remove-Delete-At", "x")];
        let update = ExpiryUpdate::from_headers(headers, 0).unwrap();
        assert_eq!(update, ExpiryUpdate::Clear);
        assert_eq!(update.apply(Some(99)), None);
    }

    #[test]
    fn test_expiry_keep_by_default() {
        let update = ExpiryUpdate::from_headers([("Content-Length", "3")], 0).unwrap();
        assert_eq!(update.apply(Some(7)), Some(7));
    }

    #[test]
    fn test_expiry_rejects_garbage() {
        assert!(ExpiryUpdate::from_headers([("X-Delete-At", "soon")], 0).is_err());
        assert!(ExpiryUpdate::from_headers([("X-Delete-After", "-5")], 0).is_err());
    }

    #[test]
    fn test_expiry_delete_after_overflow_is_rejected() {
        let after = i64::MAX.to_string();
        let result = ExpiryUpdate::from_headers([("X-Delete-After", after.as_str())], 2000);
        assert!(matches!(result, Err(StoreError::InvalidHeader { .. })));
    }
}
