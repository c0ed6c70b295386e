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

//! Object handlers of the in-memory backend.
//!
//! `X-Delete-At` / `X-Delete-After` schedule expiry; an expired object is
//! answered as not found even before the expirer purges it.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use recycle_core::{
    store::{ExpiryUpdate, MetadataUpdate, StoredObject},
    EntityKind,
};
use tracing::{debug, info};

use super::{insert_number, metadata_headers, BackendState};
use crate::protocol::{header_pairs, ApiError};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

type ObjectPath = Path<(String, String, String, String)>;

fn object_headers(object: &StoredObject) -> HeaderMap {
    let mut headers = metadata_headers(EntityKind::Object.meta_prefix(), &object.metadata);
    let content_type = HeaderValue::from_str(&object.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, content_type);
    insert_number(&mut headers, "x-timestamp", object.last_modified);
    if let Some(delete_at) = object.delete_at {
        insert_number(&mut headers, "x-delete-at", delete_at);
    }
    headers
}

/// Stores an object with its metadata and optional expiry.
pub async fn put_object(
    State(store): State<BackendState>,
    Path((_version, account, container, object)): ObjectPath,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let update = MetadataUpdate::from_headers(EntityKind::Object, header_pairs(&headers));
    let expiry = ExpiryUpdate::from_headers(header_pairs(&headers), store.now())?;

    debug!(
        "PutObject: {}/{}/{}, size={}, expiry={:?}",
        account,
        container,
        object,
        body.len(),
        expiry
    );
    store
        .put_object(
            &account,
            &container,
            &object,
            body.to_vec(),
            content_type,
            &update,
            expiry,
        )
        .await?;

    Ok(StatusCode::CREATED.into_response())
}

/// Returns an object body with its metadata.
pub async fn get_object(
    State(store): State<BackendState>,
    Path((_version, account, container, object)): ObjectPath,
) -> Result<Response, ApiError> {
    let stored = store.object(&account, &container, &object).await?;
    debug!("GetObject: {}/{}/{}", account, container, object);
    let headers = object_headers(&stored);
    Ok((StatusCode::OK, headers, stored.data).into_response())
}

/// Returns object metadata.
pub async fn head_object(
    State(store): State<BackendState>,
    Path((_version, account, container, object)): ObjectPath,
) -> Result<Response, ApiError> {
    let stored = store.object(&account, &container, &object).await?;
    let mut headers = object_headers(&stored);
    insert_number(&mut headers, "content-length", stored.data.len() as i64);
    Ok((StatusCode::OK, headers).into_response())
}

/// Updates object metadata and expiry.
pub async fn post_object(
    State(store): State<BackendState>,
    Path((_version, account, container, object)): ObjectPath,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let update = MetadataUpdate::from_headers(EntityKind::Object, header_pairs(&headers));
    let expiry = ExpiryUpdate::from_headers(header_pairs(&headers), store.now())?;

    store
        .post_object(&account, &container, &object, &update, expiry)
        .await?;
    debug!(
        "PostObject: {}/{}/{}, expiry={:?}",
        account, container, object, expiry
    );
    Ok(StatusCode::ACCEPTED.into_response())
}

/// Destroys an object.
pub async fn delete_object(
    State(store): State<BackendState>,
    Path((_version, account, container, object)): ObjectPath,
) -> Result<Response, ApiError> {
    store.delete_object(&account, &container, &object).await?;
    info!("Deleted object {}/{}/{}", account, container, object);
    Ok(StatusCode::NO_CONTENT.into_response())
}
