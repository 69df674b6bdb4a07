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

use serde::{Deserialize, Serialize};

use crate::filters::prelude::*;
use crate::proto::envoy::extensions::filters::http::router::v3 as proto;

pub const TYPE_URL: &str = "type.googleapis.com/envoy.extensions.filters.http.router.v3.Router";

/// The router filter, it forwards the request upstream and is therefore the
/// terminal filter of every HTTP filter chain.
pub struct Router;

impl StaticFilter for Router {
    const NAME: &'static str = "envoy.filters.http.router";
    const TYPE_URLS: &'static [&'static str] = &[TYPE_URL];
    const TERMINAL: bool = true;
    const CLIENT_SIDE: bool = true;
    const SERVER_SIDE: bool = true;
    type Configuration = Config;
    type BinaryConfiguration = proto::Router;
}

/// `router` filter's configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_stats: Option<bool>,
    pub start_child_span: bool,
    pub suppress_envoy_headers: bool,
}

impl From<proto::Router> for Config {
    fn from(p: proto::Router) -> Self {
        Self {
            dynamic_stats: p.dynamic_stats,
            start_child_span: p.start_child_span,
            suppress_envoy_headers: p.suppress_envoy_headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    fn factory() -> DynFilterFactory {
        Router::factory()
    }

    #[test]
    fn capabilities() {
        let router = factory();
        assert!(router.is_terminal());
        assert!(router.supports_client_side());
        assert!(router.supports_server_side());
        assert_eq!(&[TYPE_URL], router.type_urls());
    }

    #[test]
    fn parse_empty_config() {
        let config = ConfigType::Dynamic(prost_types::Any {
            type_url: TYPE_URL.into(),
            value: Vec::new(),
        });

        assert_eq!(
            serde_json::json!({
                "start_child_span": false,
                "suppress_envoy_headers": false,
            }),
            factory().parse_config(config).unwrap()
        );
    }

    #[test]
    fn parse_config() {
        let config = ConfigType::Dynamic(prost_types::Any {
            type_url: TYPE_URL.into(),
            value: proto::Router {
                dynamic_stats: Some(false),
                start_child_span: true,
                suppress_envoy_headers: false,
            }
            .encode_to_vec(),
        });

        assert_eq!(
            serde_json::json!({
                "dynamic_stats": false,
                "start_child_span": true,
                "suppress_envoy_headers": false,
            }),
            factory().parse_config(config).unwrap()
        );
    }

    #[test]
    fn parse_typed_struct() {
        let config = ConfigType::TypedStruct {
            type_url: TYPE_URL.into(),
            value: crate::prost::struct_from_json(serde_json::json!({
                "suppress_envoy_headers": true,
            }))
            .unwrap(),
        };

        assert_eq!(
            serde_json::json!({
                "start_child_span": false,
                "suppress_envoy_headers": true,
            }),
            factory().parse_config(config).unwrap()
        );
    }

    #[test]
    fn override_is_rejected() {
        let config = ConfigType::Dynamic(prost_types::Any {
            type_url: TYPE_URL.into(),
            value: Vec::new(),
        });

        assert_eq!(
            CreationError::OverrideUnsupported(Router::NAME),
            factory().parse_config_override(config).unwrap_err()
        );
    }
}
