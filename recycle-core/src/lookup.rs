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

//! Metadata lookup interface.

use crate::error::LookupError;
use crate::types::{EntityKind, Metadata, ResourcePath};
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches the current metadata of an account or object.
///
/// The returned snapshot is only read; policies never write through it.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Returns the metadata of the entity `kind` addressed by `path`.
    ///
    /// For [`EntityKind::Account`] only the account part of `path` is used.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(metadata))` if the entity exists
    /// - `Ok(None)` if it does not
    async fn fetch_metadata(
        &self,
        kind: EntityKind,
        path: &ResourcePath,
    ) -> Result<Option<Metadata>, LookupError>;
}

#[async_trait]
impl<T: MetadataLookup + ?Sized> MetadataLookup for Arc<T> {
    async fn fetch_metadata(
        &self,
        kind: EntityKind,
        path: &ResourcePath,
    ) -> Result<Option<Metadata>, LookupError> {
        (**self).fetch_metadata(kind, path).await
    }
}
