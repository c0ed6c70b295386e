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

//! Integration tests for the metrics endpoint.
//!
//! Uses in-process requests via tower::ServiceExt::oneshot.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use recycle_api::{create_memory_backend, create_router, AppState};
use recycle_core::{ManualClock, MemoryStore};
use recycle_policy::RecyclePolicy;
use tower::ServiceExt;

fn create_test_state() -> (AppState, Arc<MemoryStore>) {
    let clock = Arc::new(ManualClock::new(1000));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let state = AppState::new(RecyclePolicy::default(), store.clone(), clock);
    (state, store)
}

fn create_test_app(state: AppState, store: Arc<MemoryStore>) -> Router {
    create_router(state, create_memory_backend(store))
}

async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_prometheus_metrics_endpoint_disabled() {
    let (state, store) = create_test_state();
    let app = create_test_app(state, store);

    let response = app
        .oneshot(Request::builder().method("GET").uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // No handle in the state
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_prometheus_metrics_with_recorder() {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install recorder");

    let (state, store) = create_test_state();
    let app = create_test_app(state.with_prometheus_handle(handle), store);

    // A rejected object delete records a decision
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/a/c/o")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app
        .oneshot(Request::builder().method("GET").uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_string(response.into_body()).await;
    assert!(
        body.contains("recycle_decisions_total"),
        "Expected decision counter in body, got: {}",
        &body[..body.len().min(500)]
    );
    assert!(body.contains("http_requests_total"));
}
