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

use prost::Message;

use crate::{
    filters::FilterRegistry,
    listener::{
        http_filters::process_http_filters, ApiVersion, Error, ListenerUpdate,
        RouteSpecifier, Side, HTTP_CONNECTION_MANAGER_V2_TYPE_URL,
        HTTP_CONNECTION_MANAGER_V3_TYPE_URL,
    },
    proto::envoy::{
        config::{core::v3::config_source::ConfigSourceSpecifier, listener::v3::Listener},
        extensions::filters::network::http_connection_manager::v3::{
            http_connection_manager::RouteSpecifier as ProtoRouteSpecifier, HttpConnectionManager,
        },
    },
    route::RouteProcessor,
};

/// Validates an API listener, whose `api_listener` must be an
/// `HttpConnectionManager`.
pub(crate) fn process(
    registry: &FilterRegistry,
    routes: &dyn RouteProcessor,
    listener: Listener,
    version: ApiVersion,
) -> Result<ListenerUpdate, Error> {
    let api_listener = listener
        .api_listener
        .and_then(|api| api.api_listener)
        .unwrap_or_default();

    if api_listener.type_url != HTTP_CONNECTION_MANAGER_V3_TYPE_URL
        && api_listener.type_url != HTTP_CONNECTION_MANAGER_V2_TYPE_URL
    {
        return Err(Error::UnexpectedType {
            type_url: api_listener.type_url,
        });
    }

    let manager =
        HttpConnectionManager::decode(&*api_listener.value).map_err(|source| Error::Decode {
            what: "http connection manager",
            source,
        })?;

    if manager.xff_num_trusted_hops != 0 {
        return Err(Error::ForbiddenField {
            field: "xff_num_trusted_hops",
            reason: format!("must be unset or zero, got {}", manager.xff_num_trusted_hops),
        });
    }

    if !manager.original_ip_detection_extensions.is_empty() {
        return Err(Error::ForbiddenField {
            field: "original_ip_detection_extensions",
            reason: format!(
                "must be empty, got {} entries",
                manager.original_ip_detection_extensions.len()
            ),
        });
    }

    let route = match manager.route_specifier {
        Some(ProtoRouteSpecifier::Rds(rds)) => {
            let is_ads = matches!(
                rds.config_source
                    .and_then(|source| source.config_source_specifier),
                Some(ConfigSourceSpecifier::Ads(_))
            );

            if !is_ads {
                return Err(Error::NotAds {
                    listener: listener.name,
                });
            }

            if rds.route_config_name.is_empty() {
                return Err(Error::EmptyName {
                    listener: listener.name,
                });
            }

            RouteSpecifier::Rds(rds.route_config_name)
        }
        Some(ProtoRouteSpecifier::RouteConfig(config)) => routes
            .process_inline(config, version)
            .map(RouteSpecifier::Inline)
            .map_err(|error| Error::InlineRoute {
                source: error.into(),
            })?,
        Some(ProtoRouteSpecifier::ScopedRoutes(_)) => {
            return Err(Error::UnsupportedRouteSpecifier {
                kind: "scoped_routes",
            })
        }
        None => return Err(Error::MissingRouteSpecifier),
    };

    let mut update = ListenerUpdate {
        route: Some(route),
        ..<_>::default()
    };

    if version == ApiVersion::V2 {
        return Ok(update);
    }

    if let Some(duration) = manager
        .common_http_protocol_options
        .and_then(|options| options.max_stream_duration)
    {
        update.max_stream_duration =
            Duration::try_from(duration).map_err(|error| Error::InvalidField {
                field: "common_http_protocol_options.max_stream_duration",
                reason: error.to_string(),
            })?;
    }

    update.http_filters = process_http_filters(registry, manager.http_filters, Side::Client)?;

    Ok(update)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        filters::FilterSet,
        proto::envoy::config::{
            core::v3::{HttpProtocolOptions, TypedExtensionConfig},
            route::v3::RouteConfiguration,
        },
        route::VirtualHostProcessor,
        test::{api_listener, connection_manager, rds, router_filter},
    };

    fn run(manager: HttpConnectionManager, version: ApiVersion) -> Result<ListenerUpdate, Error> {
        let registry = std::sync::Arc::new(FilterRegistry::new(FilterSet::default()));
        let routes = VirtualHostProcessor::new(registry.clone());
        process(&registry, &routes, api_listener("lis", &manager), version)
    }

    #[test]
    fn rds_listener() {
        let update = run(connection_manager(rds("routes")), ApiVersion::V3).unwrap();

        assert_eq!(Some("routes"), update.route_config_name());
        assert_eq!(Duration::ZERO, update.max_stream_duration);
        assert_eq!(1, update.http_filters.len());
        assert!(update.inbound_listener_config.is_none());
    }

    #[test]
    fn v2_stops_after_route_specifier() {
        let mut manager = connection_manager(rds("routes"));
        manager.http_filters.clear();
        manager.common_http_protocol_options = Some(HttpProtocolOptions {
            max_stream_duration: Some(prost_types::Duration {
                seconds: 5,
                nanos: 0,
            }),
            ..<_>::default()
        });

        let update = run(manager, ApiVersion::V2).unwrap();
        assert_eq!(Some("routes"), update.route_config_name());
        assert_eq!(Duration::ZERO, update.max_stream_duration);
        assert!(update.http_filters.is_empty());
    }

    #[test]
    fn max_stream_duration() {
        let mut manager = connection_manager(rds("routes"));
        manager.common_http_protocol_options = Some(HttpProtocolOptions {
            max_stream_duration: Some(prost_types::Duration {
                seconds: 2,
                nanos: 500,
            }),
            ..<_>::default()
        });

        let update = run(manager.clone(), ApiVersion::V3).unwrap();
        assert_eq!(Duration::new(2, 500), update.max_stream_duration);

        manager.common_http_protocol_options = Some(HttpProtocolOptions {
            max_stream_duration: Some(prost_types::Duration {
                seconds: -1,
                nanos: 0,
            }),
            ..<_>::default()
        });
        assert!(matches!(
            run(manager, ApiVersion::V3),
            Err(Error::InvalidField { .. })
        ));
    }

    #[test]
    fn unexpected_api_listener_type() {
        let mut listener = api_listener("lis", &connection_manager(rds("routes")));
        listener
            .api_listener
            .as_mut()
            .unwrap()
            .api_listener
            .as_mut()
            .unwrap()
            .type_url = "type.googleapis.com/envoy.config.cluster.v3.Cluster".into();

        let registry = FilterRegistry::default();
        let routes = VirtualHostProcessor::new(<_>::default());
        assert!(matches!(
            process(&registry, &routes, listener, ApiVersion::V3),
            Err(Error::UnexpectedType { .. })
        ));
    }

    #[test]
    fn forbidden_fields() {
        let mut manager = connection_manager(rds("routes"));
        manager.xff_num_trusted_hops = 2;
        assert!(matches!(
            run(manager, ApiVersion::V3),
            Err(Error::ForbiddenField { field: "xff_num_trusted_hops", .. })
        ));

        let mut manager = connection_manager(rds("routes"));
        manager.original_ip_detection_extensions = vec![TypedExtensionConfig::default()];
        assert!(matches!(
            run(manager, ApiVersion::V3),
            Err(Error::ForbiddenField {
                field: "original_ip_detection_extensions",
                ..
            })
        ));
    }

    #[test]
    fn route_specifiers() {
        let mut manager = connection_manager(rds(""));
        assert!(matches!(
            run(manager.clone(), ApiVersion::V3),
            Err(Error::EmptyName { listener }) if listener == "lis"
        ));

        manager.route_specifier = Some(ProtoRouteSpecifier::Rds(<_>::default()));
        assert!(matches!(
            run(manager.clone(), ApiVersion::V3),
            Err(Error::NotAds { .. })
        ));

        manager.route_specifier = Some(ProtoRouteSpecifier::ScopedRoutes(<_>::default()));
        assert!(matches!(
            run(manager.clone(), ApiVersion::V3),
            Err(Error::UnsupportedRouteSpecifier {
                kind: "scoped_routes"
            })
        ));

        manager.route_specifier = None;
        assert!(matches!(
            run(manager.clone(), ApiVersion::V3),
            Err(Error::MissingRouteSpecifier)
        ));

        manager.route_specifier = Some(ProtoRouteSpecifier::RouteConfig(RouteConfiguration {
            name: "inline".into(),
            virtual_hosts: Vec::new(),
        }));
        let update = run(manager, ApiVersion::V3).unwrap();
        assert!(update.route_config_name().is_none());
        assert_eq!("inline", update.inline_route_config().unwrap().name);
    }

    #[test]
    fn filter_chain_errors_propagate() {
        let mut manager = connection_manager(rds("routes"));
        manager.http_filters = vec![router_filter("router"), router_filter("other")];

        assert!(matches!(
            run(manager, ApiVersion::V3),
            Err(Error::MisplacedTerminal { name }) if name == "router"
        ));
    }

    /// Rejects every inline route configuration, recording the API version
    /// it was called with.
    #[derive(Default)]
    struct FailingRoutes {
        versions: std::sync::Mutex<Vec<ApiVersion>>,
    }

    impl RouteProcessor for FailingRoutes {
        fn process_inline(
            &self,
            config: RouteConfiguration,
            version: ApiVersion,
        ) -> crate::Result<crate::route::RouteUpdate> {
            self.versions.lock().unwrap().push(version);
            eyre::bail!("route configuration {:?} is broken", config.name)
        }
    }

    #[test]
    fn inline_route_errors_are_wrapped() {
        let manager = connection_manager(ProtoRouteSpecifier::RouteConfig(RouteConfiguration {
            name: "inline".into(),
            virtual_hosts: Vec::new(),
        }));
        let registry = FilterRegistry::default();
        let routes = FailingRoutes::default();

        for version in [ApiVersion::V3, ApiVersion::V2] {
            let error = process(
                &registry,
                &routes,
                api_listener("lis", &manager),
                version,
            )
            .unwrap_err();

            assert!(matches!(error, Error::InlineRoute { .. }));
            assert_eq!(
                "failed to parse inline route configuration: route configuration \"inline\" is broken",
                error.to_string()
            );
        }

        assert_eq!(
            vec![ApiVersion::V3, ApiVersion::V2],
            *routes.versions.lock().unwrap()
        );
    }

    #[test]
    fn api_listener_type_must_match_exactly() {
        let manager = connection_manager(rds("routes"));
        let registry = FilterRegistry::default();
        let routes = VirtualHostProcessor::new(<_>::default());

        for type_url in [
            "envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager",
            "example.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager",
        ] {
            let mut listener = api_listener("lis", &manager);
            listener.api_listener = Some(crate::proto::envoy::config::listener::v3::ApiListener {
                api_listener: Some(crate::test::encode_any(type_url, &manager)),
            });

            assert!(matches!(
                process(&registry, &routes, listener, ApiVersion::V3),
                Err(Error::UnexpectedType { type_url: actual }) if actual == type_url
            ));
        }
    }
}
