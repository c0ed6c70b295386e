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

//! Recycle API Layer - HTTP surface of the recycle middleware
//!
//! This crate provides:
//! - The request dispatcher routing requests to the recycle policies
//! - Synthesized Swift-style rejection responses
//! - Middleware for policy enforcement and metrics
//! - An in-memory storage backend

pub mod dispatch;
pub mod handlers;
pub mod middleware;
pub mod protocol;
pub mod server;

pub use dispatch::{Decision, Dispatcher, Route};
pub use protocol::ApiError;
pub use server::{create_memory_backend, create_router, AppState, DEFAULT_MAX_BODY_SIZE};
