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

//! Metrics middleware for recording HTTP request metrics.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

/// Middleware that records HTTP request count and latency metrics.
///
/// Records two metrics via the `metrics` crate:
/// - `http_requests_total` (counter): labeled by method, status and path.
/// - `http_request_duration_seconds` (histogram): labeled by method and path.
///
/// Account, container and object names are replaced with placeholders.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let raw_path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    let path = normalize_path(&raw_path);

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "status" => status,
        "path" => path.clone()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(duration);

    response
}

/// Normalizes request paths to avoid label cardinality explosion.
///
/// - `/` and `/metrics` are kept
/// - `/{version}/{account}[/{container}[/{object}]]` by depth
/// - anything else → `/{other}`
fn normalize_path(path: &str) -> String {
    if path == "/" || path == "/metrics" {
        return path.to_string();
    }

    let segments = path.trim_start_matches('/').splitn(4, '/').count();
    match segments {
        2 => "/{version}/{account}".to_string(),
        3 => "/{version}/{account}/{container}".to_string(),
        4 => "/{version}/{account}/{container}/{object}".to_string(),
        _ => "/{other}".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_root() {
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_normalize_path_metrics() {
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn test_normalize_path_account() {
        assert_eq!(normalize_path("/v1/AUTH_test"), "/{version}/{account}");
    }

    #[test]
    fn test_normalize_path_container() {
        assert_eq!(
            normalize_path("/v1/AUTH_test/photos"),
            "/{version}/{account}/{container}"
        );
    }

    #[test]
    fn test_normalize_path_object() {
        assert_eq!(
            normalize_path("/v1/AUTH_test/photos/2024/cat.jpg"),
            "/{version}/{account}/{container}/{object}"
        );
    }

    #[test]
    fn test_normalize_path_other() {
        assert_eq!(normalize_path("/healthz"), "/{other}");
    }
}
