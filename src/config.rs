/*
 * Copyright 2020 Google LLC All Rights Reserved.
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

//! A batch of listener resources to process, as read from a file.

use std::io;

use base64_serde::base64_serde_type;
use serde::{Deserialize, Serialize};

use crate::filters::{FilterRegistry, FilterSet};

base64_serde_type!(Base64Standard, base64::engine::general_purpose::STANDARD);

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Version {
    #[default]
    #[serde(rename = "v1alpha1")]
    V1Alpha1,
}

/// Config is a batch of listener resources along with the filters they are
/// validated against.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub version: Version,
    /// The opaque version token of the batch.
    #[serde(default)]
    pub version_info: String,
    /// Type URLs of built-in filters left out of the registry.
    #[serde(default)]
    pub disabled_filters: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A type tagged protobuf message.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Resource {
    pub type_url: String,
    #[serde(with = "Base64Standard")]
    pub value: Vec<u8>,
}

impl From<Resource> for prost_types::Any {
    fn from(resource: Resource) -> Self {
        Self {
            type_url: resource.type_url,
            value: resource.value,
        }
    }
}

impl From<prost_types::Any> for Resource {
    fn from(any: prost_types::Any) -> Self {
        Self {
            type_url: any.type_url,
            value: any.value,
        }
    }
}

impl Config {
    /// from_reader returns a config from a given Reader
    pub fn from_reader<R: io::Read>(input: R) -> Result<Config, serde_yaml::Error> {
        serde_yaml::from_reader(input)
    }

    /// Builds the filter registry, the default filters minus those disabled.
    pub fn filter_registry(&self) -> FilterRegistry {
        let mut filters = FilterSet::default();

        for type_url in &self.disabled_filters {
            if filters.remove(type_url).is_none() {
                tracing::warn!(%type_url, "disabled filter is not registered");
            }
        }

        FilterRegistry::new(filters)
    }

    /// The resources of the batch, as protobuf `Any` messages.
    pub fn resources(&self) -> Vec<prost_types::Any> {
        self.resources.iter().cloned().map(From::from).collect()
    }
}
