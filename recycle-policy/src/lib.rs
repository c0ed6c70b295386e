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

//! Recycle policies
//!
//! This crate turns "delete" into a reversible mark-for-deletion workflow:
//! - Account policy: mark, wait out the grace period, then DELETE
//! - Object policy: mark, and the storage expirer removes the object later
//!
//! Both policies are pure: they decide from the request directives, the
//! entity's metadata snapshot and the current time, and never perform I/O.

pub mod account;
pub mod action;
pub mod config;
pub mod object;

pub use account::AccountPolicy;
pub use action::{Action, Verdict};
pub use config::{
    GracePeriodError, GracePeriods, DEFAULT_ACCOUNT_RECYCLED_SECONDS,
    DEFAULT_OBJECT_RECYCLED_SECONDS, MAX_RECYCLED_SECONDS,
};
pub use object::ObjectPolicy;

/// Both policies, configured from one set of grace periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecyclePolicy {
    /// Account policy.
    pub account: AccountPolicy,
    /// Object policy.
    pub object: ObjectPolicy,
}

impl RecyclePolicy {
    /// Builds both policies from `periods`.
    pub fn new(periods: GracePeriods) -> Self {
        Self {
            account: AccountPolicy::new(periods.account_recycled_seconds),
            object: ObjectPolicy::new(periods.object_recycled_seconds),
        }
    }
}

impl Default for RecyclePolicy {
    fn default() -> Self {
        Self::new(GracePeriods::default())
    }
}
