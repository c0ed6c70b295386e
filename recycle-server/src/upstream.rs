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

//! Upstream storage proxy.
//!
//! In proxy mode every request that survives the recycle middleware is
//! relayed to the storage proxy with its (possibly rewritten) headers, and
//! entity metadata is read from the same upstream with `HEAD`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use recycle_core::{EntityKind, LookupError, Metadata, MetadataLookup, ResourcePath};
use tracing::{debug, error};

/// Headers that describe a single connection and are not relayed.
const HOP_BY_HOP: [header::HeaderName; 5] = [
    header::CONNECTION,
    header::HOST,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
];

/// HTTP client bound to the storage proxy.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    base_url: String,
    max_body_size: usize,
}

impl Upstream {
    /// Creates a client for `base_url` (scheme, host and port, no trailing slash).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        max_body_size: usize,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            max_body_size,
        })
    }

    /// Base URL of the storage proxy.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Relays a request to the upstream and its answer back to the client.
pub async fn proxy_handler(State(upstream): State<Arc<Upstream>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = upstream.url(path_and_query);

    let body = match to_bytes(body, upstream.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to read request body: {}", e);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large\n").into_response();
        }
    };

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    // Recomputed from the buffered body
    headers.remove(header::CONTENT_LENGTH);

    debug!("Proxying {} {}", parts.method, url);
    let result = upstream
        .client
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    let upstream_response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("Upstream request to {} failed: {}", url, e);
            return (StatusCode::BAD_GATEWAY, "Storage backend unavailable\n").into_response();
        }
    };

    let status = upstream_response.status();
    let mut headers = upstream_response.headers().clone();
    strip_hop_by_hop(&mut headers);

    match upstream_response.bytes().await {
        Ok(bytes) => (status, headers, Body::from(bytes)).into_response(),
        Err(e) => {
            error!("Failed to read upstream response from {}: {}", url, e);
            (StatusCode::BAD_GATEWAY, "Storage backend unavailable\n").into_response()
        }
    }
}

/// Creates the backend router forwarding everything to `upstream`.
pub fn create_upstream_backend(upstream: Arc<Upstream>) -> Router {
    Router::new().fallback(proxy_handler).with_state(upstream)
}

/// Reads entity metadata from the upstream with `HEAD`.
#[derive(Debug, Clone)]
pub struct HttpMetadataLookup {
    upstream: Arc<Upstream>,
}

impl HttpMetadataLookup {
    /// Creates a lookup against `upstream`.
    pub fn new(upstream: Arc<Upstream>) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl MetadataLookup for HttpMetadataLookup {
    async fn fetch_metadata(
        &self,
        kind: EntityKind,
        path: &ResourcePath,
    ) -> Result<Option<Metadata>, LookupError> {
        let target = match kind {
            EntityKind::Account => path.to_account(),
            EntityKind::Object => path.clone(),
        };
        let url = self.upstream.url(&target.to_encoded_path());

        let response = self
            .upstream
            .client
            .head(&url)
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(format!("HEAD {}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::InvalidResponse(format!(
                "HEAD {} returned {}",
                url, status
            )));
        }

        let headers = response.headers();
        let pairs = headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str(), value)));
        Ok(Some(Metadata::from_headers(kind, pairs)))
    }
}
