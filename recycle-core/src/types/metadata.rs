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

//! User metadata snapshot of an account or object.

use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key holding the mark-for-deletion flag.
pub const META_RECYCLED: &str = "recycled";

/// Account metadata key holding the earliest permitted DELETE time.
pub const META_EARLIEST_DELETE_DATE: &str = "earliest-delete-date";

/// Object metadata key holding the scheduled expiry time.
pub const META_DELETE_DATE: &str = "delete-date";

/// User metadata of one entity.
///
/// Keys are stored lowercase without the `x-account-meta-` /
/// `x-object-meta-` prefix, e.g. `recycled` or `earliest-delete-date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    entries: HashMap<String, String>,
}

impl Metadata {
    /// Creates an empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the metadata of `kind` from a list of header pairs.
    ///
    /// Header names are matched case-insensitively; headers without the
    /// entity's meta prefix are ignored.
    pub fn from_headers<'a, I>(kind: EntityKind, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let prefix = kind.meta_prefix();
        let entries = headers
            .into_iter()
            .filter_map(|(name, value)| {
                let name = name.to_ascii_lowercase();
                name.strip_prefix(prefix)
                    .filter(|key| !key.is_empty())
                    .map(|key| (key.to_string(), value.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Stores `value` under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into().to_ascii_lowercase(), value.into());
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(&key.to_ascii_lowercase())
    }

    /// Returns true if no keys are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of the `recycled` key, or `""` when unset.
    pub fn recycled(&self) -> &str {
        self.get(META_RECYCLED).unwrap_or("")
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}
