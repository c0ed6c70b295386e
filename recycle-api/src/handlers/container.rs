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

//! Container handlers of the in-memory backend.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use recycle_core::store::{ContainerInfo, MetadataUpdate};
use tracing::{debug, info};

use super::{
    insert_number, listing, metadata_headers, BackendState, CONTAINER_META_PREFIX,
    REMOVE_CONTAINER_META_PREFIX,
};
use crate::protocol::{header_pairs, ApiError};

fn container_update(headers: &HeaderMap) -> MetadataUpdate {
    MetadataUpdate::from_prefixed_headers(
        CONTAINER_META_PREFIX,
        REMOVE_CONTAINER_META_PREFIX,
        header_pairs(headers),
    )
}

fn container_headers(info: &ContainerInfo) -> HeaderMap {
    let mut headers = metadata_headers(CONTAINER_META_PREFIX, &info.metadata);
    insert_number(
        &mut headers,
        "x-container-object-count",
        info.objects.len() as i64,
    );
    headers
}

/// Lists the live objects of a container. An empty listing is `204`.
pub async fn get_container(
    State(store): State<BackendState>,
    Path((_version, account, container)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let info = store.container(&account, &container).await?;
    debug!(
        "GetContainer: account={}, container={}, objects={}",
        account,
        container,
        info.objects.len()
    );

    let mut headers = container_headers(&info);
    if info.objects.is_empty() {
        return Ok((StatusCode::NO_CONTENT, headers).into_response());
    }
    let body = listing(&mut headers, &info.objects);
    Ok((StatusCode::OK, headers, body).into_response())
}

/// Returns container metadata.
pub async fn head_container(
    State(store): State<BackendState>,
    Path((_version, account, container)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let info = store.container(&account, &container).await?;
    Ok((StatusCode::NO_CONTENT, container_headers(&info)).into_response())
}

/// Creates a container.
pub async fn put_container(
    State(store): State<BackendState>,
    Path((_version, account, container)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let update = container_update(&headers);
    if store.put_container(&account, &container, &update).await {
        info!("Created container {}/{}", account, container);
        StatusCode::CREATED.into_response()
    } else {
        StatusCode::ACCEPTED.into_response()
    }
}

/// Updates container metadata.
pub async fn post_container(
    State(store): State<BackendState>,
    Path((_version, account, container)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    store
        .post_container(&account, &container, &container_update(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Destroys an empty container.
pub async fn delete_container(
    State(store): State<BackendState>,
    Path((_version, account, container)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    store.delete_container(&account, &container).await?;
    info!("Deleted container {}/{}", account, container);
    Ok(StatusCode::NO_CONTENT.into_response())
}
