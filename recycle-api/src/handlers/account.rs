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

//! Account handlers of the in-memory backend.
//!
//! - GET /{version}/{account}: container listing
//! - HEAD /{version}/{account}: metadata only
//! - PUT /{version}/{account}: create
//! - POST /{version}/{account}: update metadata
//! - DELETE /{version}/{account}: destroy

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use recycle_core::{store::AccountInfo, store::MetadataUpdate, EntityKind};
use tracing::{debug, info};

use super::{insert_number, listing, metadata_headers, BackendState};
use crate::protocol::{header_pairs, ApiError};

fn account_headers(info: &AccountInfo) -> HeaderMap {
    let mut headers = metadata_headers(EntityKind::Account.meta_prefix(), &info.metadata);
    insert_number(
        &mut headers,
        "x-account-container-count",
        info.containers.len() as i64,
    );
    headers
}

/// Lists the containers of an account. An empty listing is `204`.
pub async fn get_account(
    State(store): State<BackendState>,
    Path((_version, account)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let info = store.account(&account).await?;
    debug!("GetAccount: account={}, containers={}", account, info.containers.len());

    let mut headers = account_headers(&info);
    if info.containers.is_empty() {
        return Ok((StatusCode::NO_CONTENT, headers).into_response());
    }
    let body = listing(&mut headers, &info.containers);
    Ok((StatusCode::OK, headers, body).into_response())
}

/// Returns account metadata.
pub async fn head_account(
    State(store): State<BackendState>,
    Path((_version, account)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let info = store.account(&account).await?;
    Ok((StatusCode::NO_CONTENT, account_headers(&info)).into_response())
}

/// Creates an account, or updates its metadata if it already exists.
pub async fn put_account(
    State(store): State<BackendState>,
    Path((_version, account)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let update = MetadataUpdate::from_headers(EntityKind::Account, header_pairs(&headers));
    if store.put_account(&account, &update).await {
        info!("Created account {}", account);
        StatusCode::CREATED.into_response()
    } else {
        StatusCode::ACCEPTED.into_response()
    }
}

/// Updates account metadata.
pub async fn post_account(
    State(store): State<BackendState>,
    Path((_version, account)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let update = MetadataUpdate::from_headers(EntityKind::Account, header_pairs(&headers));
    store.post_account(&account, &update).await;
    debug!("PostAccount: account={}", account);
    StatusCode::NO_CONTENT.into_response()
}

/// Destroys an account and everything in it.
pub async fn delete_account(
    State(store): State<BackendState>,
    Path((_version, account)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    store.delete_account(&account).await?;
    info!("Deleted account {}", account);
    Ok(StatusCode::NO_CONTENT.into_response())
}
