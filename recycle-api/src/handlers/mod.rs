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

//! HTTP request handlers.
//!
//! `account`, `container` and `object` form the in-memory storage backend;
//! `stats` serves the metrics endpoint.

pub mod account;
pub mod container;
pub mod object;
pub mod stats;

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use recycle_core::{MemoryStore, Metadata};

/// State shared by the in-memory backend handlers.
pub type BackendState = Arc<MemoryStore>;

/// Container metadata header prefix.
pub const CONTAINER_META_PREFIX: &str = "x-container-meta-";

/// Container metadata removal header prefix.
pub const REMOVE_CONTAINER_META_PREFIX: &str = "x-remove-container-meta-";

/// Renders stored metadata as `<prefix><key>` headers.
///
/// Keys that do not form a valid header name are skipped.
pub(crate) fn metadata_headers(prefix: &str, metadata: &Metadata) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (key, value) in metadata.iter() {
        let name = HeaderName::from_bytes(format!("{}{}", prefix, key).as_bytes());
        if let (Ok(name), Ok(value)) = (name, HeaderValue::from_str(value)) {
            headers.insert(name, value);
        }
    }
    headers
}

/// Inserts a numeric header.
pub(crate) fn insert_number(headers: &mut HeaderMap, name: &'static str, value: impl Into<i64>) {
    headers.insert(HeaderName::from_static(name), HeaderValue::from(value.into()));
}

/// Plain-text listing, one name per line.
pub(crate) fn listing(headers: &mut HeaderMap, names: &[String]) -> String {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    names.iter().map(|name| format!("{}\n", name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_headers() {
        let meta: Metadata = [("recycled", "yes"), ("bad key", "1")].into_iter().collect();
        let headers = metadata_headers("x-object-meta-", &meta);
        assert_eq!(headers.get("x-object-meta-recycled").unwrap(), "yes");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_listing() {
        let mut headers = HeaderMap::new();
        let body = listing(&mut headers, &["a".to_string(), "b".to_string()]);
        assert_eq!(body, "a\nb\n");
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
