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

//! Error types for recycle policy decisions, metadata lookups and the
//! in-memory store.

use thiserror::Error;

/// Broad classification of a policy rejection.
///
/// Requests that match no policy path are not errors at all; they are
/// forwarded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request is well-formed but forbidden by the entity's current
    /// state, or it tries to set a policy-owned field.
    PolicyDenied,
    /// The client sent an invalid value for a recognized directive.
    BadDirective,
    /// Stored metadata for the entity cannot be interpreted.
    StateCorrupt,
}

/// Rejections produced by the account and object recycle policies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Account is marked for deletion and hidden from reads.
    #[error("Account is marked for deletion (earliest delete date: {earliest_delete_date})")]
    AccountMarked {
        /// Raw earliest-delete-date value as stored.
        earliest_delete_date: String,
    },

    /// Account DELETE without a prior mark.
    #[error("Account cannot be deleted directly, it must be marked for deletion first")]
    AccountNotMarked,

    /// Account DELETE before the grace period has elapsed.
    #[error("Account cannot be deleted before {earliest_delete_date}")]
    AccountNotRipe {
        /// Earliest instant (Unix seconds) a DELETE may succeed.
        earliest_delete_date: i64,
    },

    /// Stored earliest-delete-date is not an integer timestamp.
    #[error("Corrupt recycled state: earliest delete date '{value}' is not a timestamp")]
    CorruptAccountState {
        /// Offending stored value.
        value: String,
    },

    /// Client tried to set or remove the earliest-delete-date field.
    #[error("Earliest delete date cannot be set manually")]
    ProtectedAccountField,

    /// Object is marked for deletion and hidden from reads.
    #[error("Object is marked for deletion (delete date: {delete_date})")]
    ObjectMarked {
        /// Raw delete-date value as stored, empty if missing.
        delete_date: String,
    },

    /// Object DELETE is never allowed.
    #[error("Object DELETE is not allowed, objects must be marked for deletion")]
    ObjectDeleteForbidden,

    /// Client tried to set an expiry field or the delete date directly.
    #[error("Object expiry fields cannot be set directly")]
    ProtectedObjectField,

    /// Mark directive carried a value other than the recycle value.
    #[error("Invalid value '{value}' for the recycled directive")]
    InvalidRecycledValue {
        /// Value the client sent.
        value: String,
    },
}

impl PolicyError {
    /// Returns the taxonomy bucket of this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PolicyError::AccountMarked { .. }
            | PolicyError::AccountNotMarked
            | PolicyError::AccountNotRipe { .. }
            | PolicyError::ProtectedAccountField
            | PolicyError::ObjectMarked { .. }
            | PolicyError::ObjectDeleteForbidden
            | PolicyError::ProtectedObjectField => ErrorKind::PolicyDenied,
            PolicyError::InvalidRecycledValue { .. } => ErrorKind::BadDirective,
            PolicyError::CorruptAccountState { .. } => ErrorKind::StateCorrupt,
        }
    }

    /// Short stable identifier, used for log fields and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            PolicyError::AccountMarked { .. } => "account_marked",
            PolicyError::AccountNotMarked => "account_not_marked",
            PolicyError::AccountNotRipe { .. } => "account_not_ripe",
            PolicyError::CorruptAccountState { .. } => "corrupt_account_state",
            PolicyError::ProtectedAccountField => "protected_account_field",
            PolicyError::ObjectMarked { .. } => "object_marked",
            PolicyError::ObjectDeleteForbidden => "object_delete_forbidden",
            PolicyError::ProtectedObjectField => "protected_object_field",
            PolicyError::InvalidRecycledValue { .. } => "invalid_recycled_value",
        }
    }
}

/// Errors raised by a [`MetadataLookup`](crate::lookup::MetadataLookup).
#[derive(Error, Debug, Clone)]
pub enum LookupError {
    /// The metadata source could not be reached.
    #[error("Metadata source unavailable: {0}")]
    Unavailable(String),

    /// The metadata source answered with something unexpected.
    #[error("Unexpected metadata response: {0}")]
    InvalidResponse(String),
}

/// Errors returned by the in-memory store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Account does not exist.
    #[error("Account not found: {account}")]
    AccountNotFound {
        /// Account name.
        account: String,
    },

    /// Container does not exist.
    #[error("Container not found: {container}")]
    ContainerNotFound {
        /// Container name.
        container: String,
    },

    /// Object does not exist or has expired.
    #[error("Object not found: {object}")]
    ObjectNotFound {
        /// Object name.
        object: String,
    },

    /// Container still holds objects.
    #[error("Container not empty: {container}")]
    ContainerNotEmpty {
        /// Container name.
        container: String,
    },

    /// A request header carried an unusable value.
    #[error("Invalid header {header}: {reason}")]
    InvalidHeader {
        /// Header name.
        header: String,
        /// Why it was rejected.
        reason: String,
    },
}
