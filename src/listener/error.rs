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

use crate::filters::CreationError;
use crate::listener::Side;

/// A type erased error raised by a collaborator, such as a route processor or
/// an update validator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a listener resource was rejected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected resource type: {type_url:?}")]
    UnexpectedResourceType { type_url: String },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },
    #[error("unexpected api_listener type: {type_url:?}")]
    UnexpectedType { type_url: String },
    #[error("{field} {reason}")]
    ForbiddenField { field: &'static str, reason: String },
    #[error("no route specifier in http connection manager")]
    MissingRouteSpecifier,
    #[error("unsupported route specifier `{kind}`")]
    UnsupportedRouteSpecifier { kind: &'static str },
    #[error("rds config source of listener {listener:?} is not ADS")]
    NotAds { listener: String },
    #[error("empty route_config_name in listener {listener:?}")]
    EmptyName { listener: String },
    #[error("failed to parse inline route configuration: {source}")]
    InlineRoute {
        #[source]
        source: BoxError,
    },
    /// A field holds a value outside of its protobuf constraints, such as a
    /// negative `max_stream_duration`, which Envoy restricts to `gte: {}`.
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("no filter implementation found for {type_url:?}")]
    UnsupportedExtension { type_url: String },
    #[error("error parsing config for filter {type_url:?}: {source}")]
    ConfigParse {
        type_url: String,
        #[source]
        source: CreationError,
    },
    #[error("filter missing name field")]
    MissingName,
    #[error("duplicate filter name {name:?}")]
    DuplicateName { name: String },
    #[error("http filter {name:?} not supported {side}-side")]
    UnsupportedSide { name: String, side: Side },
    #[error("http filters list is empty")]
    EmptyChain,
    #[error("http filter {name:?} is a terminal filter but it is not last in the filter chain")]
    MisplacedTerminal { name: String },
    #[error("http filter {name:?} is not a terminal filter")]
    MissingTerminal { name: String },
    #[error("unsupported field '{field}' {reason}")]
    UnsupportedField { field: &'static str, reason: String },
    #[error("no address field in listener {listener:?}")]
    MissingAddress { listener: String },
    #[error("no socket_address field in listener {listener:?}")]
    MissingSocketAddress { listener: String },
    #[error("listener update rejected by validator: {source}")]
    ValidationHookRejected {
        #[source]
        source: BoxError,
    },
    #[error("filter override {name:?}: {source}")]
    Override {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// A stable identifier of the error's variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedResourceType { .. } => "unexpected_resource_type",
            Self::Decode { .. } => "decode",
            Self::UnexpectedType { .. } => "unexpected_type",
            Self::ForbiddenField { .. } => "forbidden_field",
            Self::MissingRouteSpecifier => "missing_route_specifier",
            Self::UnsupportedRouteSpecifier { .. } => "unsupported_route_specifier",
            Self::NotAds { .. } => "not_ads",
            Self::EmptyName { .. } => "empty_name",
            Self::InlineRoute { .. } => "inline_route",
            Self::InvalidField { .. } => "invalid_field",
            Self::UnsupportedExtension { .. } => "unsupported_extension",
            Self::ConfigParse { .. } => "config_parse",
            Self::MissingName => "missing_name",
            Self::DuplicateName { .. } => "duplicate_name",
            Self::UnsupportedSide { .. } => "unsupported_side",
            Self::EmptyChain => "empty_chain",
            Self::MisplacedTerminal { .. } => "misplaced_terminal",
            Self::MissingTerminal { .. } => "missing_terminal",
            Self::UnsupportedField { .. } => "unsupported_field",
            Self::MissingAddress { .. } => "missing_address",
            Self::MissingSocketAddress { .. } => "missing_socket_address",
            Self::ValidationHookRejected { .. } => "validation_hook_rejected",
            Self::Override { .. } => "override",
        }
    }
}

/// A rejected resource, along with its name when it could be decoded far
/// enough to learn it.
#[derive(Debug, thiserror::Error)]
#[error(
    "{}{error}",
    self.name.as_ref().map(|name| format!("listener {name:?}: ")).unwrap_or_default()
)]
pub struct ResourceError {
    pub name: Option<String>,
    pub error: Error,
}

impl ResourceError {
    pub(crate) fn new(name: impl Into<String>, error: Error) -> Self {
        Self {
            name: Some(name.into()),
            error,
        }
    }

    pub(crate) fn unnamed(error: Error) -> Self {
        Self { name: None, error }
    }
}
