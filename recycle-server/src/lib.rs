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

//! Recycle Server - mark-for-deletion middleware in front of an object store
//!
//! This crate wires the recycle policies and HTTP layer into a runnable
//! server:
//! - Environment-driven configuration
//! - Upstream proxy with HTTP metadata lookup
//! - In-memory backend with a background expirer
//! - TLS and graceful shutdown

pub mod app;
pub mod config;
pub mod expirer;
pub mod upstream;

pub use app::App;
pub use config::Config;
