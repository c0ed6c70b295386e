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

//! Resource paths of the form `/{version}/{account}[/{container}[/{object}]]`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes escaped when a path segment goes back on the wire. `/` is kept so
/// object names with embedded slashes stay readable.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// What a request path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// `/{version}/{account}`
    Account,
    /// `/{version}/{account}/{container}`
    Container,
    /// `/{version}/{account}/{container}/{object}`
    Object,
}

impl Target {
    /// Returns a lowercase label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Account => "account",
            Target::Container => "container",
            Target::Object => "object",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity kinds that carry recycle metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// An account.
    Account,
    /// An object inside a container.
    Object,
}

impl EntityKind {
    /// Header prefix under which this entity's user metadata travels.
    pub fn meta_prefix(&self) -> &'static str {
        match self {
            EntityKind::Account => "x-account-meta-",
            EntityKind::Object => "x-object-meta-",
        }
    }

    /// Header prefix that removes a metadata key of this entity.
    pub fn remove_meta_prefix(&self) -> &'static str {
        match self {
            EntityKind::Account => "x-remove-account-meta-",
            EntityKind::Object => "x-remove-object-meta-",
        }
    }
}

/// A parsed resource path.
///
/// Parsing accepts two to four segments; everything after the container
/// belongs to the object name, slashes included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    version: String,
    account: String,
    container: Option<String>,
    object: Option<String>,
}

impl ResourcePath {
    /// Builds an account path.
    pub fn account(version: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            account: account.into(),
            container: None,
            object: None,
        }
    }

    /// Builds a container path.
    pub fn container(
        version: impl Into<String>,
        account: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            account: account.into(),
            container: Some(container.into()),
            object: None,
        }
    }

    /// Builds an object path.
    pub fn object(
        version: impl Into<String>,
        account: impl Into<String>,
        container: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            account: account.into(),
            container: Some(container.into()),
            object: Some(object.into()),
        }
    }

    /// Parses a request path.
    ///
    /// Returns `None` for paths that do not start with `/`, have fewer than
    /// two segments, or have an empty version or account segment. Container
    /// and object segments may be empty (`/v1/a/` addresses container `""`).
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.splitn(5, '/').collect();

        // Leading slash yields an empty first segment
        if segments.len() < 3 || !segments[0].is_empty() {
            return None;
        }
        if segments[1].is_empty() || segments[2].is_empty() {
            return None;
        }

        Some(Self {
            version: segments[1].to_string(),
            account: segments[2].to_string(),
            container: segments.get(3).map(|s| s.to_string()),
            object: segments.get(4).map(|s| s.to_string()),
        })
    }

    /// Parses a path as it appears in a request URI.
    ///
    /// The path is percent-decoded first, the way the storage backend
    /// decodes it, so `/v1/a/c%2Fo` addresses object `o` in container `c`.
    /// Invalid UTF-8 sequences decode to U+FFFD.
    pub fn from_request_path(raw: &str) -> Option<Self> {
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        Self::parse(&decoded)
    }

    /// Returns the path percent-encoded for use in a request URI.
    pub fn to_encoded_path(&self) -> String {
        utf8_percent_encode(&self.to_string(), SEGMENT_ENCODE_SET).to_string()
    }

    /// Returns the API version segment.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the account name.
    pub fn account_name(&self) -> &str {
        &self.account
    }

    /// Returns the container name, if any.
    pub fn container_name(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Returns the object name, if any.
    pub fn object_name(&self) -> Option<&str> {
        self.object.as_deref()
    }

    /// Returns what this path points at.
    pub fn target(&self) -> Target {
        match (&self.container, &self.object) {
            (None, _) => Target::Account,
            (Some(_), None) => Target::Container,
            (Some(_), Some(_)) => Target::Object,
        }
    }

    /// Returns the path of the owning account.
    pub fn to_account(&self) -> Self {
        Self::account(self.version.clone(), self.account.clone())
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.version, self.account)?;
        if let Some(container) = &self.container {
            write!(f, "/{}", container)?;
        }
        if let Some(object) = &self.object {
            write!(f, "/{}", object)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account_path() {
        let path = ResourcePath::parse("/v1/AUTH_admin").unwrap();
        assert_eq!(path.version(), "v1");
        assert_eq!(path.account_name(), "AUTH_admin");
        assert_eq!(path.container_name(), None);
        assert_eq!(path.target(), Target::Account);
    }

    #[test]
    fn test_parse_container_path() {
        let path = ResourcePath::parse("/v1/AUTH_admin/photos").unwrap();
        assert_eq!(path.container_name(), Some("photos"));
        assert_eq!(path.target(), Target::Container);
    }

    #[test]
    fn test_parse_object_path_keeps_slashes() {
        let path = ResourcePath::parse("/v1/AUTH_admin/photos/2019/10/cat.jpg").unwrap();
        assert_eq!(path.container_name(), Some("photos"));
        assert_eq!(path.object_name(), Some("2019/10/cat.jpg"));
        assert_eq!(path.target(), Target::Object);
        assert_eq!(path.to_string(), "/v1/AUTH_admin/photos/2019/10/cat.jpg");
    }

    #[test]
    fn test_from_request_path_decodes_names() {
        let path = ResourcePath::from_request_path("/v1/AUTH_admin/photos/my%20cat.jpg").unwrap();
        assert_eq!(path.object_name(), Some("my cat.jpg"));
        assert_eq!(path.to_encoded_path(), "/v1/AUTH_admin/photos/my%20cat.jpg");
    }

    #[test]
    fn test_from_request_path_encoded_slash_splits_segments() {
        let path = ResourcePath::from_request_path("/v1/a/c%2Fo").unwrap();
        assert_eq!(path.container_name(), Some("c"));
        assert_eq!(path.object_name(), Some("o"));
        assert_eq!(path.target(), Target::Object);

        let path = ResourcePath::from_request_path("/v1%2Fa%2Fc").unwrap();
        assert_eq!(path.target(), Target::Container);
    }

    #[test]
    fn test_from_request_path_invalid_utf8_is_lossy() {
        let path = ResourcePath::from_request_path("/v1/a/c/%E9").unwrap();
        assert_eq!(path.object_name(), Some("\u{FFFD}"));
    }

    #[test]
    fn test_encoded_path_escapes_reserved() {
        let path = ResourcePath::object("v1", "a", "c", "what?#100%");
        assert_eq!(path.to_encoded_path(), "/v1/a/c/what%3F%23100%25");
    }

    #[test]
    fn test_parse_trailing_slash_is_container() {
        let path = ResourcePath::parse("/v1/AUTH_admin/").unwrap();
        assert_eq!(path.container_name(), Some(""));
        assert_eq!(path.target(), Target::Container);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ResourcePath::parse("").is_none());
        assert!(ResourcePath::parse("/").is_none());
        assert!(ResourcePath::parse("/v1").is_none());
        assert!(ResourcePath::parse("/v1/").is_none());
        assert!(ResourcePath::parse("//AUTH_admin").is_none());
        assert!(ResourcePath::parse("v1/AUTH_admin").is_none());
        assert!(ResourcePath::parse("/metrics").is_none());
    }

    #[test]
    fn test_to_account() {
        let path = ResourcePath::object("v1", "a", "c", "o");
        assert_eq!(path.to_account(), ResourcePath::account("v1", "a"));
    }
}
