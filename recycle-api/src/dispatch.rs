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

//! Request dispatcher.
//!
//! Classifies each request by target depth and method, fetches the entity
//! metadata the matching policy needs, and turns the policy verdict into a
//! [`Decision`]. Container requests and unroutable paths are never touched.

use std::sync::Arc;

use axum::http::{HeaderMap, Method};
use recycle_core::{
    AccountField, Clock, Directives, EntityKind, ErrorKind, MetadataField, MetadataLookup,
    ObjectField, ResourcePath, Target,
};
use recycle_policy::{Action, RecyclePolicy, Verdict};
use tracing::{debug, error, warn};

use crate::protocol::{directive_pairs, ApiError};

/// Policy rule a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Account GET.
    AccountRead,
    /// Account DELETE.
    AccountDelete,
    /// Account POST.
    AccountWrite,
    /// Object GET.
    ObjectRead,
    /// Object DELETE.
    ObjectDelete,
    /// Object POST or PUT.
    ObjectWrite,
    /// No policy applies.
    PassThrough,
}

impl Route {
    /// Routes a request. `path` is `None` when the path could not be parsed.
    pub fn classify(method: &Method, path: Option<&ResourcePath>) -> Self {
        let Some(path) = path else {
            return Route::PassThrough;
        };

        match path.target() {
            Target::Account => match *method {
                Method::GET => Route::AccountRead,
                Method::DELETE => Route::AccountDelete,
                Method::POST => Route::AccountWrite,
                _ => Route::PassThrough,
            },
            Target::Container => Route::PassThrough,
            Target::Object => match *method {
                Method::GET => Route::ObjectRead,
                Method::DELETE => Route::ObjectDelete,
                Method::POST | Method::PUT => Route::ObjectWrite,
                _ => Route::PassThrough,
            },
        }
    }

    /// Metric label for this route.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::AccountRead => "account_read",
            Route::AccountDelete => "account_delete",
            Route::AccountWrite => "account_write",
            Route::ObjectRead => "object_read",
            Route::ObjectDelete => "object_delete",
            Route::ObjectWrite => "object_write",
            Route::PassThrough => "pass_through",
        }
    }
}

/// What happens to a request that is not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward unchanged.
    Forward,
    /// Forward after setting these headers. Removal is expressed as the
    /// removal header carrying the removal marker.
    Rewrite(Vec<(&'static str, String)>),
}

impl Decision {
    fn outcome(&self) -> &'static str {
        match self {
            Decision::Forward => "forward",
            Decision::Rewrite(_) => "rewrite",
        }
    }
}

/// Routes requests to the account and object policies.
pub struct Dispatcher {
    policy: RecyclePolicy,
    lookup: Arc<dyn MetadataLookup>,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    /// Creates a dispatcher.
    pub fn new(
        policy: RecyclePolicy,
        lookup: Arc<dyn MetadataLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            policy,
            lookup,
            clock,
        }
    }

    /// Returns the policies in use.
    pub fn policy(&self) -> &RecyclePolicy {
        &self.policy
    }

    /// Decides a request. `path` is the raw URI path; it is percent-decoded
    /// before routing.
    ///
    /// # Errors
    ///
    /// Returns the rejection to send back to the client, or
    /// [`ApiError::Lookup`] if the entity metadata could not be read.
    pub async fn decide(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Decision, ApiError> {
        let resource = ResourcePath::from_request_path(path);
        let route = Route::classify(method, resource.as_ref());
        debug!("{} {} routed to {}", method, path, route.as_str());

        let result = match resource {
            Some(resource) => self.apply(route, &resource, headers).await,
            None => Ok(Decision::Forward),
        };

        let outcome = match &result {
            Ok(decision) => decision.outcome(),
            Err(ApiError::Lookup(e)) => {
                error!("Metadata lookup failed for {}: {}", path, e);
                "lookup_failed"
            }
            Err(ApiError::Policy(e)) => {
                if e.kind() == ErrorKind::StateCorrupt {
                    error!("Rejected {} {}: {}", method, path, e);
                } else {
                    warn!("Rejected {} {}: {}", method, path, e);
                }
                e.code()
            }
            Err(e) => {
                error!("Failed to decide {} {}: {}", method, path, e);
                "error"
            }
        };
        metrics::counter!(
            "recycle_decisions_total",
            "route" => route.as_str(),
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    async fn apply(
        &self,
        route: Route,
        resource: &ResourcePath,
        headers: &HeaderMap,
    ) -> Result<Decision, ApiError> {
        match route {
            Route::PassThrough => Ok(Decision::Forward),
            Route::AccountRead => {
                let metadata = self.lookup.fetch_metadata(EntityKind::Account, resource).await?;
                lower(self.policy.account.on_read(metadata.as_ref()))
            }
            Route::AccountDelete => {
                let metadata = self.lookup.fetch_metadata(EntityKind::Account, resource).await?;
                lower(self.policy.account.on_delete(metadata.as_ref(), self.clock.now()))
            }
            Route::AccountWrite => {
                let directives = Directives::<AccountField>::from_headers(directive_pairs(headers));
                lower(self.policy.account.on_write(&directives, self.clock.now()))
            }
            Route::ObjectRead => {
                let metadata = self.lookup.fetch_metadata(EntityKind::Object, resource).await?;
                lower(self.policy.object.on_read(metadata.as_ref()))
            }
            Route::ObjectDelete => lower(self.policy.object.on_delete()),
            Route::ObjectWrite => {
                let directives = Directives::<ObjectField>::from_headers(directive_pairs(headers));
                lower(self.policy.object.on_write(&directives, self.clock.now()))
            }
        }
    }
}

fn lower<F: MetadataField>(verdict: Verdict<F>) -> Result<Decision, ApiError> {
    match verdict? {
        Action::Forward => Ok(Decision::Forward),
        Action::Rewrite(rewrites) => Ok(Decision::Rewrite(rewrites.to_header_pairs())),
    }
}
