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

use std::collections::{BTreeMap, HashMap, HashSet};

use prost::Message;

use crate::{
    filters::{DynFilterFactory, FilterRegistry},
    listener::{typed_struct, Error, HttpFilter, Side, FILTER_CONFIG_TYPE_URL},
    proto::envoy::{
        config::route::v3::FilterConfig,
        extensions::filters::network::http_connection_manager::v3::{
            http_filter::ConfigType as ProtoConfigType, HttpFilter as ProtoHttpFilter,
        },
    },
};

/// Per-route filter configuration overrides, keyed by filter name.
pub type FilterOverrides = BTreeMap<String, serde_json::Value>;

/// Which entry point of a [`FilterFactory`][crate::filters::FilterFactory]
/// parses a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    /// An entry of the HTTP connection manager's filter chain.
    TopLevel,
    /// A per-route override of a filter's configuration.
    Override,
}

/// Resolves the filter for `config` and parses it.
///
/// Returns `Ok(None)` when no filter is registered for the configuration's
/// type and the filter is `optional`.
pub fn validate_http_filter_config(
    registry: &FilterRegistry,
    config: prost_types::Any,
    mode: ParseMode,
    optional: bool,
) -> Result<Option<(DynFilterFactory, serde_json::Value)>, Error> {
    let config = typed_struct::unwrap(config)?;
    let type_url = config.type_url().to_owned();

    let Some(filter) = registry.get(&type_url) else {
        return if optional {
            Ok(None)
        } else {
            Err(Error::UnsupportedExtension { type_url })
        };
    };

    let parsed = match mode {
        ParseMode::TopLevel => filter.parse_config(config),
        ParseMode::Override => filter.parse_config_override(config),
    };

    parsed
        .map(|value| Some((filter.clone(), value)))
        .map_err(|source| Error::ConfigParse { type_url, source })
}

/// Validates an HTTP filter chain for `side`.
///
/// Entries keep their declared order. Optional entries whose filter is not
/// registered or doesn't support `side` are left out. The resulting chain
/// must be non-empty and end with its only terminal filter.
pub fn process_http_filters(
    registry: &FilterRegistry,
    filters: Vec<ProtoHttpFilter>,
    side: Side,
) -> Result<Vec<HttpFilter>, Error> {
    let mut seen = HashSet::with_capacity(filters.len());
    let mut chain = Vec::with_capacity(filters.len());

    for filter in filters {
        if filter.name.is_empty() {
            return Err(Error::MissingName);
        }

        if !seen.insert(filter.name.clone()) {
            return Err(Error::DuplicateName { name: filter.name });
        }

        let config = match filter.config_type {
            Some(ProtoConfigType::TypedConfig(any)) => any,
            Some(ProtoConfigType::ConfigDiscovery(_)) | None => prost_types::Any::default(),
        };

        let Some((factory, config)) =
            validate_http_filter_config(registry, config, ParseMode::TopLevel, filter.is_optional)?
        else {
            tracing::trace!(name = %filter.name, "dropping unregistered optional http filter");
            continue;
        };

        let supported = match side {
            Side::Client => factory.supports_client_side(),
            Side::Server => factory.supports_server_side(),
        };

        if !supported {
            if filter.is_optional {
                tracing::trace!(name = %filter.name, %side, "dropping optional http filter unsupported on this side");
                continue;
            }

            return Err(Error::UnsupportedSide {
                name: filter.name,
                side,
            });
        }

        chain.push(HttpFilter {
            name: filter.name,
            filter: factory,
            config,
        });
    }

    let Some((last, rest)) = chain.split_last() else {
        return Err(Error::EmptyChain);
    };

    if let Some(misplaced) = rest.iter().find(|filter| filter.filter.is_terminal()) {
        return Err(Error::MisplacedTerminal {
            name: misplaced.name.clone(),
        });
    }

    if !last.filter.is_terminal() {
        return Err(Error::MissingTerminal {
            name: last.name.clone(),
        });
    }

    Ok(chain)
}

/// Validates the `typed_per_filter_config` of a route configuration.
///
/// Values may be wrapped in a `FilterConfig`, which carries the `optional`
/// flag. Optional overrides of unregistered filters are left out.
pub fn process_http_filter_overrides(
    registry: &FilterRegistry,
    overrides: HashMap<String, prost_types::Any>,
) -> Result<FilterOverrides, Error> {
    let mut entries: Vec<_> = overrides.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut output = FilterOverrides::new();

    for (name, any) in entries {
        let wrap = |source: Error| Error::Override {
            name: name.clone(),
            source: Box::new(source),
        };

        let (config, optional) = if any.type_url == FILTER_CONFIG_TYPE_URL {
            let wrapper = FilterConfig::decode(&*any.value).map_err(|source| {
                wrap(Error::Decode {
                    what: "FilterConfig",
                    source,
                })
            })?;
            (wrapper.config.unwrap_or_default(), wrapper.is_optional)
        } else {
            (any, false)
        };

        match validate_http_filter_config(registry, config, ParseMode::Override, optional) {
            Ok(Some((_, value))) => {
                output.insert(name, value);
            }
            Ok(None) => {
                tracing::trace!(%name, "dropping unregistered optional filter override");
            }
            Err(error) => return Err(wrap(error)),
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        filters::{router, FilterSet, Router, StaticFilter},
        test::{encode_any, http_filter, optional_http_filter, router_filter, TestFilter},
    };

    fn registry() -> FilterRegistry {
        FilterRegistry::new(FilterSet::default_with([
            TestFilter::factory("test.Filter", false),
            TestFilter::factory("test.Terminal", true),
            TestFilter::client_only("test.ClientOnly"),
            TestFilter::with_overrides("test.Override"),
        ]))
    }

    fn names(chain: &[HttpFilter]) -> Vec<&str> {
        chain.iter().map(|filter| filter.name.as_str()).collect()
    }

    #[test]
    fn unsupported_extension() {
        let any = prost_types::Any {
            type_url: "unknown.Filter".into(),
            value: Vec::new(),
        };

        assert!(matches!(
            validate_http_filter_config(&registry(), any.clone(), ParseMode::TopLevel, false),
            Err(Error::UnsupportedExtension { type_url }) if type_url == "unknown.Filter"
        ));
        assert!(
            validate_http_filter_config(&registry(), any, ParseMode::TopLevel, true)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn config_parse_error() {
        let any = prost_types::Any {
            type_url: router::TYPE_URL.into(),
            value: vec![0xff, 0xff, 0xff],
        };

        assert!(matches!(
            validate_http_filter_config(&registry(), any, ParseMode::TopLevel, true),
            Err(Error::ConfigParse { type_url, .. }) if type_url == router::TYPE_URL
        ));
    }

    #[test]
    fn override_mode_uses_override_parser() {
        let any = prost_types::Any {
            type_url: router::TYPE_URL.into(),
            value: Vec::new(),
        };

        assert!(matches!(
            validate_http_filter_config(&registry(), any, ParseMode::Override, false),
            Err(Error::ConfigParse { .. })
        ));

        let (factory, value) = validate_http_filter_config(
            &registry(),
            prost_types::Any {
                type_url: "test.Override".into(),
                value: Vec::new(),
            },
            ParseMode::Override,
            false,
        )
        .unwrap()
        .unwrap();
        assert_eq!(&["test.Override"], factory.type_urls());
        assert_eq!(serde_json::json!({ "override": true }), value);
    }

    #[test]
    fn valid_chain_keeps_order() {
        let chain = process_http_filters(
            &registry(),
            vec![
                http_filter("b", "test.Filter"),
                http_filter("a", "test.ClientOnly"),
                router_filter("router"),
            ],
            Side::Client,
        )
        .unwrap();

        assert_eq!(vec!["b", "a", "router"], names(&chain));
        assert_eq!(Router::NAME, chain[2].filter.name());
    }

    #[test]
    fn missing_name() {
        assert!(matches!(
            process_http_filters(&registry(), vec![router_filter("")], Side::Client),
            Err(Error::MissingName)
        ));
    }

    #[test]
    fn duplicate_name() {
        assert!(matches!(
            process_http_filters(
                &registry(),
                vec![
                    http_filter("same", "test.Filter"),
                    optional_http_filter("same", "not.Registered"),
                    router_filter("router"),
                ],
                Side::Client,
            ),
            Err(Error::DuplicateName { name }) if name == "same"
        ));
    }

    #[test]
    fn optional_unregistered_filter_is_dropped() {
        let chain = process_http_filters(
            &registry(),
            vec![
                http_filter("first", "test.Filter"),
                router_filter("router"),
                optional_http_filter("missing", "not.Registered"),
            ],
            Side::Client,
        )
        .unwrap();

        assert_eq!(vec!["first", "router"], names(&chain));
    }

    #[test]
    fn unsupported_side() {
        assert!(matches!(
            process_http_filters(
                &registry(),
                vec![http_filter("client", "test.ClientOnly"), router_filter("router")],
                Side::Server,
            ),
            Err(Error::UnsupportedSide { name, side: Side::Server }) if name == "client"
        ));

        let mut optional = http_filter("client", "test.ClientOnly");
        optional.is_optional = true;
        let chain =
            process_http_filters(&registry(), vec![optional, router_filter("router")], Side::Server)
                .unwrap();
        assert_eq!(vec!["router"], names(&chain));
    }

    #[test]
    fn empty_chain() {
        assert!(matches!(
            process_http_filters(&registry(), Vec::new(), Side::Client),
            Err(Error::EmptyChain)
        ));
        assert!(matches!(
            process_http_filters(
                &registry(),
                vec![optional_http_filter("missing", "not.Registered")],
                Side::Client
            ),
            Err(Error::EmptyChain)
        ));
    }

    #[test]
    fn misplaced_terminal() {
        assert!(matches!(
            process_http_filters(
                &registry(),
                vec![
                    http_filter("first", "test.Filter"),
                    http_filter("middle", "test.Terminal"),
                    http_filter("last", "test.Filter"),
                ],
                Side::Client,
            ),
            Err(Error::MisplacedTerminal { name }) if name == "middle"
        ));
    }

    #[test]
    fn missing_terminal() {
        assert!(matches!(
            process_http_filters(
                &registry(),
                vec![http_filter("only", "test.Filter")],
                Side::Client
            ),
            Err(Error::MissingTerminal { name }) if name == "only"
        ));
    }

    #[test]
    fn config_discovery_is_unregistered() {
        let mut discovered = http_filter("discovered", "test.Filter");
        discovered.config_type = Some(ProtoConfigType::ConfigDiscovery(<_>::default()));

        assert!(matches!(
            process_http_filters(
                &registry(),
                vec![discovered.clone(), router_filter("router")],
                Side::Client
            ),
            Err(Error::UnsupportedExtension { type_url }) if type_url.is_empty()
        ));

        discovered.is_optional = true;
        let chain = process_http_filters(
            &registry(),
            vec![discovered, router_filter("router")],
            Side::Client,
        )
        .unwrap();
        assert_eq!(vec!["router"], names(&chain));
    }

    #[test]
    fn typed_struct_entry_resolves_inner_type() {
        use crate::{
            listener::Encoding, proto::xds::r#type::v3::TypedStruct, test::struct_from_json,
        };

        let typed_struct = TypedStruct {
            type_url: router::TYPE_URL.into(),
            value: Some(struct_from_json(serde_json::json!({
                "suppress_envoy_headers": true,
            }))),
        };
        let mut wrapped = router_filter("router");
        wrapped.config_type = Some(ProtoConfigType::TypedConfig(encode_any(
            Encoding::Xds.type_url(),
            &typed_struct,
        )));

        let chain = process_http_filters(
            &registry(),
            vec![http_filter("a", "test.Filter"), wrapped.clone()],
            Side::Client,
        )
        .unwrap();

        assert_eq!(vec!["a", "router"], names(&chain));
        assert_eq!(Router::NAME, chain[1].filter.name());
        assert_eq!(
            serde_json::json!({
                "start_child_span": false,
                "suppress_envoy_headers": true,
            }),
            chain[1].config
        );

        // Only the exact wrapper type URL is unwrapped.
        wrapped.config_type = Some(ProtoConfigType::TypedConfig(encode_any(
            "example.com/xds.type.v3.TypedStruct",
            &typed_struct,
        )));
        assert!(matches!(
            process_http_filters(&registry(), vec![wrapped], Side::Client),
            Err(Error::UnsupportedExtension { type_url })
                if type_url == "example.com/xds.type.v3.TypedStruct"
        ));
    }

    #[test]
    fn overrides() {
        let overrides = process_http_filter_overrides(
            &registry(),
            HashMap::from([
                (
                    "plain".to_owned(),
                    prost_types::Any {
                        type_url: "test.Override".into(),
                        value: Vec::new(),
                    },
                ),
                (
                    "wrapped".to_owned(),
                    encode_any(
                        FILTER_CONFIG_TYPE_URL,
                        &FilterConfig {
                            config: Some(prost_types::Any {
                                type_url: "test.Override".into(),
                                value: Vec::new(),
                            }),
                            is_optional: false,
                            disabled: false,
                        },
                    ),
                ),
                (
                    "optional".to_owned(),
                    encode_any(
                        FILTER_CONFIG_TYPE_URL,
                        &FilterConfig {
                            config: Some(prost_types::Any {
                                type_url: "not.Registered".into(),
                                value: Vec::new(),
                            }),
                            is_optional: true,
                            disabled: false,
                        },
                    ),
                ),
            ]),
        )
        .unwrap();

        assert_eq!(
            FilterOverrides::from([
                ("plain".to_owned(), serde_json::json!({ "override": true })),
                ("wrapped".to_owned(), serde_json::json!({ "override": true })),
            ]),
            overrides
        );
    }

    #[test]
    fn override_errors_name_the_entry() {
        let error = process_http_filter_overrides(
            &registry(),
            HashMap::from([(
                "fault".to_owned(),
                prost_types::Any {
                    type_url: "not.Registered".into(),
                    value: Vec::new(),
                },
            )]),
        )
        .unwrap_err();

        match error {
            Error::Override { name, source } => {
                assert_eq!("fault", name);
                assert!(matches!(*source, Error::UnsupportedExtension { .. }));
            }
            error => panic!("unexpected error: {error}"),
        }

        let error = process_http_filter_overrides(
            &registry(),
            HashMap::from([(
                "broken".to_owned(),
                prost_types::Any {
                    type_url: FILTER_CONFIG_TYPE_URL.into(),
                    value: vec![0xff, 0xff],
                },
            )]),
        )
        .unwrap_err();
        assert!(matches!(
            error,
            Error::Override { source, .. } if matches!(*source, Error::Decode { what: "FilterConfig", .. })
        ));
    }
}
