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

//! Recycle Core - entity model shared by the recycle policies
//!
//! This crate provides:
//! - Resource path parsing (`/{version}/{account}[/{container}[/{object}]]`)
//! - Entity metadata snapshots and the recognized directive fields
//! - Header rewrite sets produced by the policies
//! - The `MetadataLookup` collaborator interface and an in-memory store
//! - Clocks and error types

pub mod clock;
pub mod error;
pub mod lookup;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, LookupError, PolicyError, StoreError};
pub use lookup::MetadataLookup;
pub use store::MemoryStore;
pub use types::*;
