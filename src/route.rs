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

//! Route configurations embedded in listeners.

use std::sync::Arc;

use eyre::WrapErr;
use serde::Serialize;

use crate::{
    filters::FilterRegistry,
    listener::{process_http_filter_overrides, ApiVersion, FilterOverrides},
    proto::envoy::config::route::v3::RouteConfiguration,
};

/// Validates route configurations that a listener carries inline.
pub trait RouteProcessor: Send + Sync {
    fn process_inline(
        &self,
        config: RouteConfiguration,
        version: ApiVersion,
    ) -> crate::Result<RouteUpdate>;
}

/// A validated route configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RouteUpdate {
    pub name: String,
    pub virtual_hosts: Vec<VirtualHost>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VirtualHost {
    pub name: String,
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "FilterOverrides::is_empty")]
    pub http_filter_config_override: FilterOverrides,
}

/// A [`RouteProcessor`] which validates virtual hosts and their filter
/// overrides. Route matching itself is left to the consumer of the update.
#[derive(Clone, Debug)]
pub struct VirtualHostProcessor {
    registry: Arc<FilterRegistry>,
}

impl VirtualHostProcessor {
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self { registry }
    }
}

impl RouteProcessor for VirtualHostProcessor {
    fn process_inline(
        &self,
        config: RouteConfiguration,
        version: ApiVersion,
    ) -> crate::Result<RouteUpdate> {
        let virtual_hosts = config
            .virtual_hosts
            .into_iter()
            .map(|host| {
                if host.domains.is_empty() {
                    eyre::bail!("virtual host {:?} has no domains", host.name);
                }

                let http_filter_config_override = match version {
                    ApiVersion::V2 => FilterOverrides::new(),
                    ApiVersion::V3 => {
                        process_http_filter_overrides(&self.registry, host.typed_per_filter_config)
                            .wrap_err_with(|| format!("virtual host {:?}", host.name))?
                    }
                };

                Ok(VirtualHost {
                    name: host.name,
                    domains: host.domains,
                    http_filter_config_override,
                })
            })
            .collect::<crate::Result<_>>()?;

        Ok(RouteUpdate {
            name: config.name,
            virtual_hosts,
        })
    }
}
