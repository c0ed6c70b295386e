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

//! Core data types.

pub mod directive;
pub mod metadata;
pub mod path;

pub use directive::{
    AccountField, Directives, MetadataField, ObjectField, Rewrite, RewriteSet, RECYCLED_VALUE,
    REMOVAL_MARKER,
};
pub use metadata::{Metadata, META_DELETE_DATE, META_EARLIEST_DELETE_DATE, META_RECYCLED};
pub use path::{EntityKind, ResourcePath, Target};
