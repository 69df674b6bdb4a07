/*
 * Copyright 2023 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Validation of Listener (LDS) resources.
//!
//! A resource is type checked, decoded, and then handed to the client side
//! processor when it carries an `api_listener`, or to the server side
//! processor otherwise. Each resource is processed on its own, a rejected
//! resource never affects its siblings in the same batch.

mod client;
mod error;
mod http_filters;
mod server;
mod typed_struct;
mod update;

use std::{collections::BTreeMap, sync::Arc};

use prost::Message;
use serde::Serialize;

use crate::{
    filters::FilterRegistry,
    metrics,
    proto::envoy::config::listener::v3 as proto,
    route::{RouteProcessor, VirtualHostProcessor},
};

pub use self::{
    error::{BoxError, Error, ResourceError},
    http_filters::{
        process_http_filter_overrides, process_http_filters, validate_http_filter_config,
        FilterOverrides, ParseMode,
    },
    typed_struct::Encoding,
    update::{
        FilterChainManager, HttpFilter, InboundListenerConfig, ListenerUpdate, RouteSpecifier,
    },
};

pub const LISTENER_V2_TYPE_URL: &str = "type.googleapis.com/envoy.api.v2.Listener";
pub const LISTENER_V3_TYPE_URL: &str = "type.googleapis.com/envoy.config.listener.v3.Listener";
pub const HTTP_CONNECTION_MANAGER_V2_TYPE_URL: &str =
    "type.googleapis.com/envoy.config.filter.network.http_connection_manager.v2.HttpConnectionManager";
pub const HTTP_CONNECTION_MANAGER_V3_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager";
pub const FILTER_CONFIG_TYPE_URL: &str = "type.googleapis.com/envoy.config.route.v3.FilterConfig";

/// A hook run on every successfully built update before it is returned.
pub type UpdateValidator = dyn Fn(&ListenerUpdate) -> eyre::Result<()> + Send + Sync;

/// The major version of the xDS API a resource was sent with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V2,
    V3,
}

impl ApiVersion {
    /// Returns the API version of a listener resource type URL, or `None` if
    /// `type_url` is not exactly one of the listener type URLs.
    pub fn from_listener_type_url(type_url: &str) -> Option<Self> {
        match type_url {
            LISTENER_V2_TYPE_URL => Some(Self::V2),
            LISTENER_V3_TYPE_URL => Some(Self::V3),
            _ => None,
        }
    }
}

/// Which end of a connection a listener configures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// An API listener, used by a client for outbound requests.
    Client,
    /// A listener accepting inbound connections.
    Server,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The input of [`ListenerProcessor::unmarshal_listeners`].
#[derive(Default)]
pub struct UnmarshalOptions<'a> {
    /// The opaque version token of the batch.
    pub version: String,
    pub resources: Vec<prost_types::Any>,
    pub update_validator: Option<&'a UpdateValidator>,
}

/// The outcome of processing a batch of listener resources.
#[derive(Debug, Default)]
pub struct ListenerUpdates {
    pub version: String,
    /// One entry per resource name learned, whether it was accepted or not.
    pub updates: BTreeMap<String, Result<ListenerUpdate, Error>>,
    /// Errors of resources which could not be decoded far enough to learn
    /// their name.
    pub errors: Vec<Error>,
}

impl ListenerUpdates {
    /// Whether every resource of the batch was accepted.
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty() && self.updates.values().all(Result::is_ok)
    }
}

/// Validates listener resources against a filter registry and a route
/// processor, both shared read-only between callers.
#[derive(Clone)]
pub struct ListenerProcessor {
    registry: Arc<FilterRegistry>,
    routes: Arc<dyn RouteProcessor>,
}

impl ListenerProcessor {
    /// Creates a processor which resolves inline route configurations with
    /// [`VirtualHostProcessor`].
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        let routes = Arc::new(VirtualHostProcessor::new(registry.clone()));
        Self { registry, routes }
    }

    pub fn with_route_processor(mut self, routes: Arc<dyn RouteProcessor>) -> Self {
        self.routes = routes;
        self
    }

    /// Validates a single listener resource, returning its name along with
    /// the update.
    pub fn unmarshal_listener_resource(
        &self,
        resource: prost_types::Any,
        validator: Option<&UpdateValidator>,
    ) -> Result<(String, ListenerUpdate), ResourceError> {
        let (version, listener) = decode(&resource).map_err(|error| {
            record_rejection(metrics::UNKNOWN_SIDE, &error);
            ResourceError::unnamed(error)
        })?;

        tracing::debug!(?version, ?listener, "decoded listener resource");

        let name = listener.name.clone();
        let side = if listener.api_listener.is_some() {
            Side::Client
        } else {
            Side::Server
        };

        let result = match side {
            Side::Client => client::process(&self.registry, &*self.routes, listener, version),
            Side::Server => server::process(listener),
        }
        .and_then(|update| match validator {
            Some(validator) => validator(&update)
                .map(|_| update)
                .map_err(|error| Error::ValidationHookRejected {
                    source: error.into(),
                }),
            None => Ok(update),
        });

        match result {
            Ok(mut update) => {
                update.raw = Some(resource);
                metrics::listener_resources(metrics::ACCEPTED, side.as_str()).inc();
                Ok((name, update))
            }
            Err(error) => {
                record_rejection(side.as_str(), &error);
                Err(ResourceError::new(name, error))
            }
        }
    }

    /// Validates every resource of a batch independently.
    #[tracing::instrument(skip_all, fields(version = %options.version, resources = options.resources.len()))]
    pub fn unmarshal_listeners(&self, options: UnmarshalOptions<'_>) -> ListenerUpdates {
        let mut updates = ListenerUpdates {
            version: options.version,
            ..<_>::default()
        };

        for resource in options.resources {
            let (name, result) =
                match self.unmarshal_listener_resource(resource, options.update_validator) {
                    Ok((name, update)) => (name, Ok(update)),
                    Err(ResourceError {
                        name: Some(name),
                        error,
                    }) => {
                        tracing::warn!(listener = %name, %error, "rejected listener resource");
                        (name, Err(error))
                    }
                    Err(ResourceError { name: None, error }) => {
                        tracing::warn!(%error, "rejected unnamed listener resource");
                        updates.errors.push(error);
                        continue;
                    }
                };

            // The first rejection of a name sticks for the whole batch.
            if let Some(Err(_)) = updates.updates.get(&name) {
                tracing::warn!(listener = %name, "ignoring listener already rejected in this batch");
                continue;
            }

            updates.updates.insert(name, result);
        }

        updates
    }
}

/// Type checks and decodes a listener resource, without looking at its
/// contents.
fn decode(resource: &prost_types::Any) -> Result<(ApiVersion, proto::Listener), Error> {
    let version = ApiVersion::from_listener_type_url(&resource.type_url).ok_or_else(|| {
        Error::UnexpectedResourceType {
            type_url: resource.type_url.clone(),
        }
    })?;

    let listener = proto::Listener::decode(&*resource.value).map_err(|source| Error::Decode {
        what: "listener",
        source,
    })?;

    Ok((version, listener))
}

fn record_rejection(side: &str, error: &Error) {
    metrics::listener_resources(metrics::REJECTED, side).inc();
    metrics::listener_errors(error.kind()).inc();
}

impl std::fmt::Debug for ListenerProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerProcessor")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
