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

//! In-memory account/container/object store.
//!
//! Holds just enough state to stand in for a real object store: metadata on
//! every level, object bodies and scheduled object expiry. Expired objects
//! are invisible to reads and are dropped by [`MemoryStore::purge_expired`].

use crate::clock::Clock;
use crate::error::{LookupError, StoreError};
use crate::lookup::MetadataLookup;
use crate::store::{ExpiryUpdate, MetadataUpdate};
use crate::types::{EntityKind, Metadata, ResourcePath};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object body.
    pub data: Vec<u8>,
    /// MIME type.
    pub content_type: String,
    /// User metadata.
    pub metadata: Metadata,
    /// Scheduled expiry (Unix seconds), if any.
    pub delete_at: Option<i64>,
    /// Last write time (Unix seconds).
    pub last_modified: i64,
}

impl StoredObject {
    fn is_expired(&self, now: i64) -> bool {
        matches!(self.delete_at, Some(at) if at <= now)
    }
}

/// Account metadata plus container names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Account metadata.
    pub metadata: Metadata,
    /// Container names in lexical order.
    pub containers: Vec<String>,
}

/// Container metadata plus live object names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    /// Container metadata.
    pub metadata: Metadata,
    /// Names of objects that have not expired, in lexical order.
    pub objects: Vec<String>,
}

#[derive(Debug, Default)]
struct ContainerEntry {
    metadata: Metadata,
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Debug, Default)]
struct AccountEntry {
    metadata: Metadata,
    containers: BTreeMap<String, ContainerEntry>,
}

/// In-memory store keyed by account name.
pub struct MemoryStore {
    accounts: RwLock<BTreeMap<String, AccountEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Creates an empty store reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates the account if needed and applies `update`.
    ///
    /// Returns true if the account was created.
    pub async fn put_account(&self, account: &str, update: &MetadataUpdate) -> bool {
        let mut accounts = self.accounts.write().await;
        let created = !accounts.contains_key(account);
        let entry = accounts.entry(account.to_string()).or_default();
        update.apply(&mut entry.metadata);
        created
    }

    /// Applies `update` to the account metadata, creating the account on
    /// first use.
    pub async fn post_account(&self, account: &str, update: &MetadataUpdate) {
        self.put_account(account, update).await;
    }

    /// Returns account metadata and its container listing.
    pub async fn account(&self, account: &str) -> Result<AccountInfo, StoreError> {
        let accounts = self.accounts.read().await;
        let entry = accounts.get(account).ok_or_else(|| StoreError::AccountNotFound {
            account: account.to_string(),
        })?;
        Ok(AccountInfo {
            metadata: entry.metadata.clone(),
            containers: entry.containers.keys().cloned().collect(),
        })
    }

    /// Deletes an account with everything in it.
    pub async fn delete_account(&self, account: &str) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        accounts.remove(account).map(|_| ()).ok_or_else(|| StoreError::AccountNotFound {
            account: account.to_string(),
        })
    }

    // ========================================================================
    // Containers
    // ========================================================================

    /// Creates the container (and its account) if needed and applies
    /// `update`. Returns true if the container was created.
    pub async fn put_container(
        &self,
        account: &str,
        container: &str,
        update: &MetadataUpdate,
    ) -> bool {
        let mut accounts = self.accounts.write().await;
        let account_entry = accounts.entry(account.to_string()).or_default();
        let created = !account_entry.containers.contains_key(container);
        let entry = account_entry.containers.entry(container.to_string()).or_default();
        update.apply(&mut entry.metadata);
        created
    }

    /// Applies `update` to an existing container.
    pub async fn post_container(
        &self,
        account: &str,
        container: &str,
        update: &MetadataUpdate,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let entry = container_mut(&mut accounts, account, container)?;
        update.apply(&mut entry.metadata);
        Ok(())
    }

    /// Returns container metadata and its live object listing.
    pub async fn container(
        &self,
        account: &str,
        container: &str,
    ) -> Result<ContainerInfo, StoreError> {
        let now = self.now();
        let accounts = self.accounts.read().await;
        let entry = accounts
            .get(account)
            .and_then(|a| a.containers.get(container))
            .ok_or_else(|| StoreError::ContainerNotFound {
                container: container.to_string(),
            })?;
        Ok(ContainerInfo {
            metadata: entry.metadata.clone(),
            objects: entry
                .objects
                .iter()
                .filter(|(_, o)| !o.is_expired(now))
                .map(|(name, _)| name.clone())
                .collect(),
        })
    }

    /// Deletes an empty container.
    pub async fn delete_container(&self, account: &str, container: &str) -> Result<(), StoreError> {
        let now = self.now();
        let mut accounts = self.accounts.write().await;
        let account_entry = accounts.get_mut(account).ok_or_else(|| {
            StoreError::ContainerNotFound {
                container: container.to_string(),
            }
        })?;
        let entry = account_entry.containers.get(container).ok_or_else(|| {
            StoreError::ContainerNotFound {
                container: container.to_string(),
            }
        })?;
        if entry.objects.values().any(|o| !o.is_expired(now)) {
            return Err(StoreError::ContainerNotEmpty {
                container: container.to_string(),
            });
        }
        account_entry.containers.remove(container);
        Ok(())
    }

    // ========================================================================
    // Objects
    // ========================================================================

    /// Stores an object, replacing any previous one under the same name.
    #[allow(clippy::too_many_arguments)]
    pub async fn put_object(
        &self,
        account: &str,
        container: &str,
        object: &str,
        data: Vec<u8>,
        content_type: &str,
        update: &MetadataUpdate,
        expiry: ExpiryUpdate,
    ) -> Result<(), StoreError> {
        let now = self.now();
        let mut accounts = self.accounts.write().await;
        let entry = container_mut(&mut accounts, account, container)?;

        let mut metadata = Metadata::new();
        update.apply(&mut metadata);

        entry.objects.insert(
            object.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                metadata,
                delete_at: expiry.apply(None),
                last_modified: now,
            },
        );
        Ok(())
    }

    /// Updates metadata and expiry of a live object.
    pub async fn post_object(
        &self,
        account: &str,
        container: &str,
        object: &str,
        update: &MetadataUpdate,
        expiry: ExpiryUpdate,
    ) -> Result<(), StoreError> {
        let now = self.now();
        let mut accounts = self.accounts.write().await;
        let entry = container_mut(&mut accounts, account, container)?;
        let stored = entry
            .objects
            .get_mut(object)
            .filter(|o| !o.is_expired(now))
            .ok_or_else(|| StoreError::ObjectNotFound {
                object: object.to_string(),
            })?;

        update.apply(&mut stored.metadata);
        stored.delete_at = expiry.apply(stored.delete_at);
        stored.last_modified = now;
        Ok(())
    }

    /// Returns a live object.
    pub async fn object(
        &self,
        account: &str,
        container: &str,
        object: &str,
    ) -> Result<StoredObject, StoreError> {
        let now = self.now();
        let accounts = self.accounts.read().await;
        accounts
            .get(account)
            .and_then(|a| a.containers.get(container))
            .and_then(|c| c.objects.get(object))
            .filter(|o| !o.is_expired(now))
            .cloned()
            .ok_or_else(|| StoreError::ObjectNotFound {
                object: object.to_string(),
            })
    }

    /// Deletes a live object.
    pub async fn delete_object(
        &self,
        account: &str,
        container: &str,
        object: &str,
    ) -> Result<(), StoreError> {
        let now = self.now();
        let mut accounts = self.accounts.write().await;
        let entry = container_mut(&mut accounts, account, container)?;
        match entry.objects.get(object) {
            Some(stored) if !stored.is_expired(now) => {
                entry.objects.remove(object);
                Ok(())
            }
            _ => Err(StoreError::ObjectNotFound {
                object: object.to_string(),
            }),
        }
    }

    /// Drops every object whose expiry has passed.
    ///
    /// Returns the number of objects removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.now();
        let mut accounts = self.accounts.write().await;
        let mut purged = 0;

        for (account, account_entry) in accounts.iter_mut() {
            for (container, entry) in account_entry.containers.iter_mut() {
                let before = entry.objects.len();
                entry.objects.retain(|_, o| !o.is_expired(now));
                let removed = before - entry.objects.len();
                if removed > 0 {
                    debug!("Purged {} expired objects from {}/{}", removed, account, container);
                }
                purged += removed;
            }
        }

        purged
    }
}

fn container_mut<'a>(
    accounts: &'a mut BTreeMap<String, AccountEntry>,
    account: &str,
    container: &str,
) -> Result<&'a mut ContainerEntry, StoreError> {
    accounts
        .get_mut(account)
        .and_then(|a| a.containers.get_mut(container))
        .ok_or_else(|| StoreError::ContainerNotFound {
            container: container.to_string(),
        })
}

#[async_trait]
impl MetadataLookup for MemoryStore {
    async fn fetch_metadata(
        &self,
        kind: EntityKind,
        path: &ResourcePath,
    ) -> Result<Option<Metadata>, LookupError> {
        match kind {
            EntityKind::Account => match self.account(path.account_name()).await {
                Ok(info) => Ok(Some(info.metadata)),
                Err(_) => Ok(None),
            },
            EntityKind::Object => {
                let (Some(container), Some(object)) = (path.container_name(), path.object_name())
                else {
                    return Err(LookupError::InvalidResponse(format!(
                        "{} is not an object path",
                        path
                    )));
                };
                match self.object(path.account_name(), container, object).await {
                    Ok(stored) => Ok(Some(stored.metadata)),
                    Err(_) => Ok(None),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn store_at(now: i64) -> (MemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        (MemoryStore::new(clock.clone()), clock)
    }

    fn meta(kind: EntityKind, headers: &[(&str, &str)]) -> MetadataUpdate {
        MetadataUpdate::from_headers(kind, headers.iter().copied())
    }

    #[tokio::test]
    async fn test_account_lifecycle() {
        let (store, _) = store_at(0);
        assert!(store.account("acc").await.is_err());

        let created = store
            .put_account("acc", &meta(EntityKind::Account, &[("X-Account-Meta-Color", "red")]))
            .await;
        assert!(created);
        store.put_container("acc", "photos", &MetadataUpdate::default()).await;

        let info = store.account("acc").await.unwrap();
        assert_eq!(info.metadata.get("color"), Some("red"));
        assert_eq!(info.containers, vec!["photos".to_string()]);

        store.delete_account("acc").await.unwrap();
        assert!(matches!(
            store.account("acc").await,
            Err(StoreError::AccountNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_container_must_be_empty_to_delete() {
        let (store, _) = store_at(0);
        store.put_container("acc", "c", &MetadataUpdate::default()).await;
        store
            .put_object(
                "acc",
                "c",
                "o",
                b"data".to_vec(),
                "text/plain",
                &MetadataUpdate::default(),
                ExpiryUpdate::Keep,
            )
            .await
            .unwrap();

        assert_eq!(
            store.delete_container("acc", "c").await,
            Err(StoreError::ContainerNotEmpty { container: "c".to_string() })
        );

        store.delete_object("acc", "c", "o").await.unwrap();
        store.delete_container("acc", "c").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_object_requires_container() {
        let (store, _) = store_at(0);
        let result = store
            .put_object(
                "acc",
                "missing",
                "o",
                vec![],
                "text/plain",
                &MetadataUpdate::default(),
                ExpiryUpdate::Keep,
            )
            .await;
        assert!(matches!(result, Err(StoreError::ContainerNotFound { .. })));
    }

    #[tokio::test]
    async fn test_object_expiry_hides_and_purges() {
        let (store, clock) = store_at(2000);
        store.put_container("acc", "c", &MetadataUpdate::default()).await;
        store
            .put_object(
                "acc",
                "c",
                "o",
                b"x".to_vec(),
                "text/plain",
                &MetadataUpdate::default(),
                ExpiryUpdate::Keep,
            )
            .await
            .unwrap();
        store
            .post_object("acc", "c", "o", &MetadataUpdate::default(), ExpiryUpdate::At(2600))
            .await
            .unwrap();

        clock.set(2599);
        assert!(store.object("acc", "c", "o").await.is_ok());
        assert_eq!(store.purge_expired().await, 0);

        clock.set(2600);
        assert!(store.object("acc", "c", "o").await.is_err());
        assert!(store.container("acc", "c").await.unwrap().objects.is_empty());
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_post_object_clears_expiry() {
        let (store, clock) = store_at(0);
        store.put_container("acc", "c", &MetadataUpdate::default()).await;
        store
            .put_object(
                "acc",
                "c",
                "o",
                vec![],
                "text/plain",
                &MetadataUpdate::default(),
                ExpiryUpdate::At(10),
            )
            .await
            .unwrap();
        store
            .post_object("acc", "c", "o", &MetadataUpdate::default(), ExpiryUpdate::Clear)
            .await
            .unwrap();

        clock.set(100);
        assert_eq!(store.object("acc", "c", "o").await.unwrap().delete_at, None);
    }

    #[tokio::test]
    async fn test_lookup_account_and_object() {
        let (store, _) = store_at(0);
        store
            .post_account("acc", &meta(EntityKind::Account, &[("X-Account-Meta-Recycled", "yes")]))
            .await;
        store.put_container("acc", "c", &MetadataUpdate::default()).await;
        store
            .put_object(
                "acc",
                "c",
                "o",
                vec![],
                "text/plain",
                &meta(EntityKind::Object, &[("X-Object-Meta-Recycled", "yes")]),
                ExpiryUpdate::Keep,
            )
            .await
            .unwrap();

        let account = store
            .fetch_metadata(EntityKind::Account, &ResourcePath::object("v1", "acc", "c", "o"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.recycled(), "yes");

        let object = store
            .fetch_metadata(EntityKind::Object, &ResourcePath::object("v1", "acc", "c", "o"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(object.recycled(), "yes");

        let missing = store
            .fetch_metadata(EntityKind::Object, &ResourcePath::object("v1", "acc", "c", "nope"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_lookup_object_kind_needs_object_path() {
        let (store, _) = store_at(0);
        let result = store
            .fetch_metadata(EntityKind::Object, &ResourcePath::account("v1", "acc"))
            .await;
        assert!(result.is_err());
    }
}
