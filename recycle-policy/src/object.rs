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

//! Object recycle policy.
//!
//! Objects are never deleted directly. Marking an object hides it from GET
//! at once and schedules storage-native expiry (`X-Delete-After`) for the
//! grace period, so the object disappears without any further request.
//! Unmarking before expiry cancels the schedule.
//!
//! Unlike accounts there is no ripeness check here: the expirer enforces
//! the grace period.

use recycle_core::{
    Directives, Metadata, ObjectField, PolicyError, RewriteSet, META_DELETE_DATE, RECYCLED_VALUE,
};
use tracing::{debug, info};

use crate::action::{Action, Verdict};

/// Fields a client may never set on an object.
const PROTECTED_FIELDS: [ObjectField; 3] = [
    ObjectField::DeleteAt,
    ObjectField::DeleteAfter,
    ObjectField::DeleteDate,
];

/// Decides object GET, DELETE, POST and PUT requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectPolicy {
    grace_seconds: i64,
}

impl ObjectPolicy {
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

    /// Object read. Any marked object reads as not found.
    ///
    /// A missing delete date is echoed as an empty value.
    pub fn on_read(&self, metadata: Option<&Metadata>) -> Verdict<ObjectField> {
        match metadata {
            Some(metadata) if metadata.recycled() == RECYCLED_VALUE => {
                debug!("Object is marked for deletion, hiding it");
                Err(PolicyError::ObjectMarked {
                    delete_date: metadata.get(META_DELETE_DATE).unwrap_or("").to_string(),
                })
            }
            _ => Ok(Action::Forward),
        }
    }

    /// Destroy request. Always refused, whatever the object's state.
    pub fn on_delete(&self) -> Verdict<ObjectField> {
        Err(PolicyError::ObjectDeleteForbidden)
    }

    /// Object create or metadata update (PUT/POST).
    ///
    /// Expiry fields and the delete date are policy-owned. The mark
    /// directive only accepts the recycle value; it sets the delete date and
    /// schedules expiry after the grace period. The unmark directive clears
    /// all of it.
    pub fn on_write(&self, directives: &Directives<ObjectField>, now: i64) -> Verdict<ObjectField> {
        if PROTECTED_FIELDS.iter().any(|field| directives.sets(*field)) {
            return Err(PolicyError::ProtectedObjectField);
        }

        if let Some(value) = directives.value(ObjectField::Recycled) {
            if value != RECYCLED_VALUE {
                return Err(PolicyError::InvalidRecycledValue {
                    value: value.to_string(),
                });
            }

            let delete_date = now.saturating_add(self.grace_seconds);
            info!(
                "Marking object for deletion, expiring after {} seconds (at {})",
                self.grace_seconds, delete_date
            );
            return Ok(Action::Rewrite(
                RewriteSet::new()
                    .set(ObjectField::Recycled, RECYCLED_VALUE)
                    .set(ObjectField::DeleteDate, delete_date.to_string())
                    .set(ObjectField::DeleteAfter, self.grace_seconds.to_string()),
            ));
        }

        if directives.removes(ObjectField::Recycled) {
            info!("Unmarking object, cancelling scheduled expiry");
            return Ok(Action::Rewrite(
                RewriteSet::new()
                    .remove(ObjectField::Recycled)
                    .remove(ObjectField::DeleteDate)
                    .remove(ObjectField::DeleteAt)
                    .remove(ObjectField::DeleteAfter),
            ));
        }

        Ok(Action::Forward)
    }
}
