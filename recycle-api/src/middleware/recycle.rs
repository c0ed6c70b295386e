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

//! Recycle middleware.
//!
//! Runs the dispatcher in front of the backend. Rejections are answered
//! here; accepted requests continue with their headers rewritten.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::dispatch::Decision;
use crate::protocol::ApiError;
use crate::server::AppState;

/// Middleware enforcing the account and object recycle policies.
pub async fn recycle_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = state
        .dispatcher
        .decide(request.method(), request.uri().path(), request.headers())
        .await;

    match decision {
        Ok(Decision::Forward) => next.run(request).await,
        Ok(Decision::Rewrite(pairs)) => {
            if let Err(e) = apply_rewrites(request.headers_mut(), &pairs) {
                return e.into_response();
            }
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Replaces each named header with the rewritten value.
///
/// Any client-sent copies of the header are dropped first, so the backend
/// sees exactly one value.
pub fn apply_rewrites(
    headers: &mut HeaderMap,
    pairs: &[(&'static str, String)],
) -> Result<(), ApiError> {
    for (name, value) in pairs {
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Internal(format!("invalid value for {}: {}", name, e)))?;
        headers.insert(HeaderName::from_static(*name), value);
    }
    Ok(())
}
