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

//! Synthesized error responses.
//!
//! Every rejection is answered directly, without reaching the backend, as a
//! `text/plain` response. Rejections about a marked entity also carry the
//! mark and date headers so clients can tell when destruction becomes
//! possible and how to undo it.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use recycle_core::{
    AccountField, LookupError, MetadataField, ObjectField, PolicyError, StoreError, RECYCLED_VALUE,
};
use thiserror::Error;
use uuid::Uuid;

use super::TRANS_ID_HEADER;

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Rejection decided by a recycle policy.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Entity metadata could not be fetched.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// In-memory backend error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Policy(e) => match e {
                PolicyError::AccountMarked { .. } | PolicyError::ObjectMarked { .. } => {
                    StatusCode::NOT_FOUND
                }
                PolicyError::AccountNotMarked
                | PolicyError::AccountNotRipe { .. }
                | PolicyError::ProtectedAccountField
                | PolicyError::ObjectDeleteForbidden
                | PolicyError::ProtectedObjectField => StatusCode::METHOD_NOT_ALLOWED,
                PolicyError::InvalidRecycledValue { .. } => StatusCode::BAD_REQUEST,
                PolicyError::CorruptAccountState { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Lookup(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(e) => match e {
                StoreError::AccountNotFound { .. }
                | StoreError::ContainerNotFound { .. }
                | StoreError::ObjectNotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::ContainerNotEmpty { .. } => StatusCode::CONFLICT,
                StoreError::InvalidHeader { .. } => StatusCode::BAD_REQUEST,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the extra headers describing the entity's recycled state.
    pub fn state_headers(&self) -> Vec<(&'static str, String)> {
        match self {
            ApiError::Policy(PolicyError::AccountMarked {
                earliest_delete_date,
            }) => vec![
                (AccountField::Recycled.header_name(), RECYCLED_VALUE.to_string()),
                (
                    AccountField::EarliestDeleteDate.header_name(),
                    earliest_delete_date.clone(),
                ),
            ],
            ApiError::Policy(PolicyError::AccountNotRipe {
                earliest_delete_date,
            }) => vec![
                (AccountField::Recycled.header_name(), RECYCLED_VALUE.to_string()),
                (
                    AccountField::EarliestDeleteDate.header_name(),
                    earliest_delete_date.to_string(),
                ),
            ],
            ApiError::Policy(PolicyError::ObjectMarked { delete_date }) => vec![
                (ObjectField::Recycled.header_name(), RECYCLED_VALUE.to_string()),
                (ObjectField::DeleteDate.header_name(), delete_date.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// Returns the plain-text body explaining the error to the client.
    pub fn body(&self) -> String {
        match self {
            ApiError::Policy(e) => match e {
                PolicyError::AccountMarked { .. } => "Account is marked for deletion. \
                     Send X-Remove-Account-Meta-Recycled header via POST to undelete.\n"
                    .to_string(),
                PolicyError::AccountNotMarked => "Account cannot be deleted directly. \
                     Send 'X-Account-Meta-Recycled: yes' in POST request to mark for deletion.\n"
                    .to_string(),
                PolicyError::AccountNotRipe { .. } => "Account cannot be deleted yet, \
                     X-Account-Meta-Earliest-Delete-Date not reached yet.\n"
                    .to_string(),
                PolicyError::CorruptAccountState { .. } => {
                    "Internal error. Cannot read recycled state.\n".to_string()
                }
                PolicyError::ProtectedAccountField => {
                    "Header X-Account-Meta-Earliest-Delete-Date cannot be set manually.\n"
                        .to_string()
                }
                PolicyError::ObjectMarked { .. } => "Object is marked for deletion. \
                     Send X-Remove-Object-Meta-Recycled header via POST to undelete.\n"
                    .to_string(),
                PolicyError::ObjectDeleteForbidden => "DELETE requests are not allowed. \
                     Use POST with 'X-Object-Meta-Recycled: yes' instead.\n"
                    .to_string(),
                PolicyError::ProtectedObjectField => {
                    "Setting X-Delete-At/X-Delete-After/X-Object-Meta-Delete-Date directly \
                     is not allowed. Use POST with 'X-Object-Meta-Recycled: yes' instead.\n"
                        .to_string()
                }
                PolicyError::InvalidRecycledValue { .. } => {
                    "Invalid value for X-Object-Meta-Recycled. Only 'yes' is allowed.\n"
                        .to_string()
                }
            },
            ApiError::Lookup(_) => "Cannot read recycled state from storage.\n".to_string(),
            other => format!("{}\n", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let trans_id = Uuid::new_v4().to_string();
        let mut response = (self.status_code(), self.body()).into_response();

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        if let Ok(value) = HeaderValue::from_str(&trans_id) {
            headers.insert(HeaderName::from_static(TRANS_ID_HEADER), value);
        }
        for (name, value) in self.state_headers() {
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }

        response
    }
}

impl From<ApiError> for Response<Body> {
    fn from(error: ApiError) -> Self {
        error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(PolicyError::AccountMarked {
                earliest_delete_date: "1".to_string()
            })
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PolicyError::AccountNotMarked).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::from(PolicyError::CorruptAccountState {
                value: "x".to_string()
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(PolicyError::InvalidRecycledValue {
                value: "no".to_string()
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LookupError::Unavailable("down".to_string())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(StoreError::ContainerNotEmpty {
                container: "c".to_string()
            })
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_ripe_carries_state_headers() {
        let error = ApiError::from(PolicyError::AccountNotRipe {
            earliest_delete_date: 1030,
        });
        assert_eq!(
            error.state_headers(),
            vec![
                ("x-account-meta-recycled", "yes".to_string()),
                ("x-account-meta-earliest-delete-date", "1030".to_string()),
            ]
        );
    }

    #[test]
    fn test_not_marked_has_no_state_headers() {
        assert!(ApiError::from(PolicyError::AccountNotMarked).state_headers().is_empty());
        assert!(ApiError::from(PolicyError::ObjectDeleteForbidden)
            .state_headers()
            .is_empty());
    }

    #[test]
    fn test_into_response() {
        let response = ApiError::from(PolicyError::ObjectMarked {
            delete_date: "2600".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let headers = response.headers();
        assert_eq!(headers.get("x-object-meta-recycled").unwrap(), "yes");
        assert_eq!(headers.get("x-object-meta-delete-date").unwrap(), "2600");
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert!(headers.contains_key(TRANS_ID_HEADER));
    }

    #[test]
    fn test_body_names_undelete_directive() {
        let body = ApiError::from(PolicyError::AccountMarked {
            earliest_delete_date: "1".to_string(),
        })
        .body();
        assert!(body.contains("X-Remove-Account-Meta-Recycled"));
    }
}
