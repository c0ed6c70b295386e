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

//! Policy outcomes.

use recycle_core::{MetadataField, PolicyError, RewriteSet};

/// What to do with a request the policy lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<F: MetadataField> {
    /// Forward the request unchanged.
    Forward,
    /// Forward the request after applying these header rewrites.
    Rewrite(RewriteSet<F>),
}

impl<F: MetadataField> Action<F> {
    /// Returns the rewrites, if any.
    pub fn rewrites(&self) -> Option<&RewriteSet<F>> {
        match self {
            Action::Forward => None,
            Action::Rewrite(rewrites) => Some(rewrites),
        }
    }

    /// True for an unchanged pass-through.
    pub fn is_forward(&self) -> bool {
        matches!(self, Action::Forward)
    }
}

/// Result of a policy decision: an action, or the rejection to send back.
pub type Verdict<F> = Result<Action<F>, PolicyError>;
