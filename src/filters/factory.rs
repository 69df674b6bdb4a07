/*
 * Copyright 2021 Google LLC
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

use std::sync::Arc;

use crate::filters::{ConfigType, CreationError};

/// A shared pointer to a dynamic [`FilterFactory`] instance.
pub type DynFilterFactory = Arc<dyn FilterFactory>;

/// Provides the type URLs and configuration parsing for a given HTTP filter.
///
/// An implementation of [`FilterFactory`] is looked up by the type URL of
/// the configuration a control plane sends for an HTTP filter.
///
/// - The `parse_config` method validates the configuration of a filter entry
///   in the HTTP connection manager's filter chain.
/// - The `parse_config_override` method validates the configuration used to
///   override a filter from a route configuration, which may have a different
///   shape than the top level configuration.
/// - `is_terminal` tells whether the filter dispatches the request itself, a
///   terminal filter must be the last one in a chain.
pub trait FilterFactory: Sync + Send {
    /// A human readable name for the filter, used in errors and logs.
    fn name(&self) -> &'static str;

    /// The configuration type URLs this factory is registered under.
    fn type_urls(&self) -> &'static [&'static str];

    /// Parses the configuration of a filter chain entry.
    fn parse_config(&self, config: ConfigType) -> Result<serde_json::Value, CreationError>;

    /// Parses a per-route override configuration. Filters reject overrides
    /// unless they opt in.
    fn parse_config_override(
        &self,
        _config: ConfigType,
    ) -> Result<serde_json::Value, CreationError> {
        Err(CreationError::OverrideUnsupported(self.name()))
    }

    /// Whether the filter terminates the filter chain.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Whether the filter can run as a client side interceptor.
    fn supports_client_side(&self) -> bool;

    /// Whether the filter can run as a server side interceptor.
    fn supports_server_side(&self) -> bool;
}

impl std::fmt::Debug for dyn FilterFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterFactory")
            .field("name", &self.name())
            .field("type_urls", &self.type_urls())
            .field("terminal", &self.is_terminal())
            .finish()
    }
}
