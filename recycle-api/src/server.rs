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

//! Axum HTTP server setup and routing.
//!
//! The recycle middleware sits in front of a backend router. The backend is
//! either the in-memory store ([`create_memory_backend`]) or an upstream
//! proxy supplied by the caller.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use recycle_core::{Clock, MemoryStore, MetadataLookup};
use recycle_policy::RecyclePolicy;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::dispatch::Dispatcher;
use crate::handlers::{self, account, container, object};
use crate::middleware::{metrics_middleware, recycle_middleware};

/// Default maximum request body size (5GB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 5 * 1024 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Request dispatcher enforcing the recycle policies.
    pub dispatcher: Arc<Dispatcher>,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Prometheus metrics handle for rendering `/metrics` endpoint.
    pub prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
    /// Server start time.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        policy: RecyclePolicy,
        lookup: Arc<dyn MetadataLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(policy, lookup, clock)),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            prometheus_handle: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Sets the maximum request body size.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Sets the Prometheus handle for rendering metrics.
    pub fn with_prometheus_handle(
        mut self,
        handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        self.prometheus_handle = Some(handle);
        self
    }
}

/// Creates the in-memory storage backend.
pub fn create_memory_backend(store: Arc<MemoryStore>) -> Router {
    Router::new()
        .route(
            "/:version/:account",
            get(account::get_account)
                .head(account::head_account)
                .put(account::put_account)
                .post(account::post_account)
                .delete(account::delete_account),
        )
        .route(
            "/:version/:account/:container",
            get(container::get_container)
                .head(container::head_container)
                .put(container::put_container)
                .post(container::post_container)
                .delete(container::delete_container),
        )
        // Object names may contain slashes
        .route(
            "/:version/:account/:container/*object",
            get(object::get_object)
                .head(object::head_object)
                .put(object::put_object)
                .post(object::post_object)
                .delete(object::delete_object),
        )
        .with_state(store)
}

/// Creates the application router.
///
/// Every request to `backend` passes the recycle middleware first; the
/// metrics endpoint does not.
pub fn create_router(state: AppState, backend: Router) -> Router {
    let guarded = backend.layer(middleware::from_fn_with_state(
        state.clone(),
        recycle_middleware,
    ));

    Router::new()
        .route("/metrics", get(handlers::stats::prometheus_metrics))
        .with_state(state.clone())
        .merge(guarded)
        // Request span plus one line per response with status and latency
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        // Add metrics middleware to record request count and latency
        .layer(middleware::from_fn(metrics_middleware))
        .layer(DefaultBodyLimit::max(state.max_body_size))
}
