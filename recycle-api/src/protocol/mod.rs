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

//! Swift wire conventions: header names and error responses.

pub mod errors;

use std::borrow::Cow;

use axum::http::HeaderMap;

pub use errors::ApiError;

/// Transaction id header attached to synthesized responses.
pub const TRANS_ID_HEADER: &str = "x-trans-id";

/// Borrows the request headers as `(name, value)` pairs.
///
/// Names come out lowercase. Values that are not visible ASCII are skipped,
/// since the in-memory backend stores text metadata only.
pub fn header_pairs(headers: &HeaderMap) -> impl Iterator<Item = (&str, &str)> {
    headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str(), value)))
}

/// Borrows the request headers as `(name, value)` pairs for directive
/// matching.
///
/// Unlike [`header_pairs`], no header is skipped: values that are not valid
/// UTF-8 are decoded lossily, so a policy-owned field is seen whatever its
/// value and a garbled mark value never equals the recycle value.
pub fn directive_pairs(headers: &HeaderMap) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
    headers
        .iter()
        .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes())))
}
