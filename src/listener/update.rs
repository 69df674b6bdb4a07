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

use std::time::Duration;

use serde::Serialize;

use crate::{filters::DynFilterFactory, route::RouteUpdate};

/// A validated listener resource.
///
/// Client side (API) listeners carry a [`RouteSpecifier`] and, from the v3
/// API onwards, the HTTP filter chain. Server side listeners only carry an
/// [`InboundListenerConfig`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ListenerUpdate {
    pub route: Option<RouteSpecifier>,
    pub max_stream_duration: Duration,
    pub http_filters: Vec<HttpFilter>,
    pub inbound_listener_config: Option<InboundListenerConfig>,
    /// The resource the update was built from.
    #[serde(skip)]
    pub raw: Option<prost_types::Any>,
}

impl ListenerUpdate {
    /// The name of the route configuration to fetch over RDS, if the
    /// listener refers to one.
    pub fn route_config_name(&self) -> Option<&str> {
        match &self.route {
            Some(RouteSpecifier::Rds(name)) => Some(name),
            _ => None,
        }
    }

    /// The route configuration embedded in the listener, if any.
    pub fn inline_route_config(&self) -> Option<&RouteUpdate> {
        match &self.route {
            Some(RouteSpecifier::Inline(route)) => Some(route),
            _ => None,
        }
    }
}

/// Where a client side listener gets its routes from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSpecifier {
    /// The name of a route configuration delivered over RDS.
    Rds(String),
    /// A route configuration embedded in the listener.
    Inline(RouteUpdate),
}

/// A server side listener.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InboundListenerConfig {
    pub address: String,
    pub port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_chains: Option<FilterChainManager>,
}

/// Placeholder for filter chain matching on server side listeners, which is
/// not implemented. It is never populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct FilterChainManager {}

/// A validated entry of an HTTP filter chain.
#[derive(Clone, Debug)]
pub struct HttpFilter {
    /// The name of the entry, unique in its chain.
    pub name: String,
    /// The factory which parsed `config`.
    pub filter: DynFilterFactory,
    pub config: serde_json::Value,
}

impl PartialEq for HttpFilter {
    fn eq(&self, rhs: &Self) -> bool {
        self.name == rhs.name
            && self.filter.type_urls() == rhs.filter.type_urls()
            && self.config == rhs.config
    }
}

impl Serialize for HttpFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("HttpFilter", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("filter", self.filter.name())?;
        state.serialize_field("config", &self.config)?;
        state.end()
    }
}
