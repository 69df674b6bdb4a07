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

//! The subset of the Envoy, xDS and UDPA protobuf messages consumed by
//! listener processing.
//!
//! Only the fields that listener validation reads are declared, with the
//! field numbers of the upstream definitions, so any well formed upstream
//! message decodes into these types (unknown fields are skipped).

#![allow(clippy::derive_partial_eq_without_eq)]

pub mod envoy {
    pub mod config {
        pub mod core {
            pub mod v3 {
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct SocketAddress {
                    #[prost(enumeration = "socket_address::Protocol", tag = "1")]
                    pub protocol: i32,
                    #[prost(string, tag = "2")]
                    pub address: ::prost::alloc::string::String,
                    #[prost(string, tag = "5")]
                    pub resolver_name: ::prost::alloc::string::String,
                    #[prost(bool, tag = "6")]
                    pub ipv4_compat: bool,
                    #[prost(oneof = "socket_address::PortSpecifier", tags = "3, 4")]
                    pub port_specifier: ::core::option::Option<socket_address::PortSpecifier>,
                }

                pub mod socket_address {
                    #[derive(
                        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
                    )]
                    #[repr(i32)]
                    pub enum Protocol {
                        Tcp = 0,
                        Udp = 1,
                    }

                    #[derive(Clone, PartialEq, ::prost::Oneof)]
                    pub enum PortSpecifier {
                        #[prost(uint32, tag = "3")]
                        PortValue(u32),
                        #[prost(string, tag = "4")]
                        NamedPort(::prost::alloc::string::String),
                    }
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct Pipe {
                    #[prost(string, tag = "1")]
                    pub path: ::prost::alloc::string::String,
                    #[prost(uint32, tag = "2")]
                    pub mode: u32,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct EnvoyInternalAddress {
                    #[prost(string, tag = "1")]
                    pub server_listener_name: ::prost::alloc::string::String,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct Address {
                    #[prost(oneof = "address::Address", tags = "1, 2, 3")]
                    pub address: ::core::option::Option<address::Address>,
                }

                pub mod address {
                    #[derive(Clone, PartialEq, ::prost::Oneof)]
                    pub enum Address {
                        #[prost(message, tag = "1")]
                        SocketAddress(super::SocketAddress),
                        #[prost(message, tag = "2")]
                        Pipe(super::Pipe),
                        #[prost(message, tag = "3")]
                        EnvoyInternalAddress(super::EnvoyInternalAddress),
                    }
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct TypedExtensionConfig {
                    #[prost(string, tag = "1")]
                    pub name: ::prost::alloc::string::String,
                    #[prost(message, optional, tag = "2")]
                    pub typed_config: ::core::option::Option<::prost_types::Any>,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct AggregatedConfigSource {}

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct SelfConfigSource {
                    #[prost(int32, tag = "1")]
                    pub transport_api_version: i32,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct ApiConfigSource {
                    #[prost(int32, tag = "1")]
                    pub api_type: i32,
                    #[prost(string, repeated, tag = "2")]
                    pub cluster_names: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct ConfigSource {
                    #[prost(message, optional, tag = "4")]
                    pub initial_fetch_timeout: ::core::option::Option<::prost_types::Duration>,
                    #[prost(int32, tag = "6")]
                    pub resource_api_version: i32,
                    #[prost(oneof = "config_source::ConfigSourceSpecifier", tags = "1, 2, 3, 5")]
                    pub config_source_specifier:
                        ::core::option::Option<config_source::ConfigSourceSpecifier>,
                }

                pub mod config_source {
                    #[derive(Clone, PartialEq, ::prost::Oneof)]
                    pub enum ConfigSourceSpecifier {
                        #[prost(string, tag = "1")]
                        Path(::prost::alloc::string::String),
                        #[prost(message, tag = "2")]
                        ApiConfigSource(super::ApiConfigSource),
                        #[prost(message, tag = "3")]
                        Ads(super::AggregatedConfigSource),
                        #[prost(message, tag = "5")]
                        Self_(super::SelfConfigSource),
                    }
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct ExtensionConfigSource {
                    #[prost(message, optional, tag = "1")]
                    pub config_source: ::core::option::Option<ConfigSource>,
                    #[prost(message, optional, tag = "2")]
                    pub default_config: ::core::option::Option<::prost_types::Any>,
                    #[prost(bool, tag = "3")]
                    pub apply_default_config_without_warming: bool,
                    #[prost(string, repeated, tag = "4")]
                    pub type_urls: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct HttpProtocolOptions {
                    #[prost(message, optional, tag = "1")]
                    pub idle_timeout: ::core::option::Option<::prost_types::Duration>,
                    #[prost(message, optional, tag = "4")]
                    pub max_stream_duration: ::core::option::Option<::prost_types::Duration>,
                }
            }
        }

        pub mod listener {
            pub mod v3 {
                use crate::proto::envoy::config::core::v3 as core_v3;

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct ApiListener {
                    #[prost(message, optional, tag = "1")]
                    pub api_listener: ::core::option::Option<::prost_types::Any>,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct ListenerFilter {
                    #[prost(string, tag = "1")]
                    pub name: ::prost::alloc::string::String,
                    #[prost(oneof = "listener_filter::ConfigType", tags = "3")]
                    pub config_type: ::core::option::Option<listener_filter::ConfigType>,
                }

                pub mod listener_filter {
                    #[derive(Clone, PartialEq, ::prost::Oneof)]
                    pub enum ConfigType {
                        #[prost(message, tag = "3")]
                        TypedConfig(::prost_types::Any),
                    }
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct FilterChain {
                    #[prost(string, tag = "7")]
                    pub name: ::prost::alloc::string::String,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct Listener {
                    #[prost(string, tag = "1")]
                    pub name: ::prost::alloc::string::String,
                    #[prost(message, optional, tag = "2")]
                    pub address: ::core::option::Option<core_v3::Address>,
                    #[prost(message, repeated, tag = "3")]
                    pub filter_chains: ::prost::alloc::vec::Vec<FilterChain>,
                    #[prost(message, optional, tag = "4")]
                    pub use_original_dst: ::core::option::Option<bool>,
                    #[prost(message, repeated, tag = "9")]
                    pub listener_filters: ::prost::alloc::vec::Vec<ListenerFilter>,
                    #[prost(message, optional, tag = "19")]
                    pub api_listener: ::core::option::Option<ApiListener>,
                }
            }
        }

        pub mod route {
            pub mod v3 {
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct VirtualHost {
                    #[prost(string, tag = "1")]
                    pub name: ::prost::alloc::string::String,
                    #[prost(string, repeated, tag = "2")]
                    pub domains: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
                    #[prost(map = "string, message", tag = "15")]
                    pub typed_per_filter_config: ::std::collections::HashMap<
                        ::prost::alloc::string::String,
                        ::prost_types::Any,
                    >,
                }

                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct RouteConfiguration {
                    #[prost(string, tag = "1")]
                    pub name: ::prost::alloc::string::String,
                    #[prost(message, repeated, tag = "2")]
                    pub virtual_hosts: ::prost::alloc::vec::Vec<VirtualHost>,
                }

                /// Wraps a per-route filter override with an optional flag.
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct FilterConfig {
                    #[prost(message, optional, tag = "1")]
                    pub config: ::core::option::Option<::prost_types::Any>,
                    #[prost(bool, tag = "2")]
                    pub is_optional: bool,
                    #[prost(bool, tag = "3")]
                    pub disabled: bool,
                }
            }
        }
    }

    pub mod extensions {
        pub mod filters {
            pub mod http {
                pub mod router {
                    pub mod v3 {
                        #[derive(Clone, PartialEq, ::prost::Message)]
                        pub struct Router {
                            #[prost(message, optional, tag = "1")]
                            pub dynamic_stats: ::core::option::Option<bool>,
                            #[prost(bool, tag = "2")]
                            pub start_child_span: bool,
                            #[prost(bool, tag = "4")]
                            pub suppress_envoy_headers: bool,
                        }
                    }
                }
            }

            pub mod network {
                pub mod http_connection_manager {
                    pub mod v3 {
                        use crate::proto::envoy::config::core::v3 as core_v3;

                        #[derive(Clone, PartialEq, ::prost::Message)]
                        pub struct Rds {
                            #[prost(message, optional, tag = "1")]
                            pub config_source: ::core::option::Option<core_v3::ConfigSource>,
                            #[prost(string, tag = "2")]
                            pub route_config_name: ::prost::alloc::string::String,
                        }

                        #[derive(Clone, PartialEq, ::prost::Message)]
                        pub struct ScopedRoutes {
                            #[prost(string, tag = "1")]
                            pub name: ::prost::alloc::string::String,
                        }

                        #[derive(Clone, PartialEq, ::prost::Message)]
                        pub struct HttpFilter {
                            #[prost(string, tag = "1")]
                            pub name: ::prost::alloc::string::String,
                            #[prost(bool, tag = "6")]
                            pub is_optional: bool,
                            #[prost(oneof = "http_filter::ConfigType", tags = "4, 5")]
                            pub config_type: ::core::option::Option<http_filter::ConfigType>,
                        }

                        pub mod http_filter {
                            use crate::proto::envoy::config::core::v3 as core_v3;

                            #[derive(Clone, PartialEq, ::prost::Oneof)]
                            pub enum ConfigType {
                                #[prost(message, tag = "4")]
                                TypedConfig(::prost_types::Any),
                                #[prost(message, tag = "5")]
                                ConfigDiscovery(core_v3::ExtensionConfigSource),
                            }
                        }

                        #[derive(Clone, PartialEq, ::prost::Message)]
                        pub struct HttpConnectionManager {
                            #[prost(string, tag = "2")]
                            pub stat_prefix: ::prost::alloc::string::String,
                            #[prost(message, repeated, tag = "5")]
                            pub http_filters: ::prost::alloc::vec::Vec<HttpFilter>,
                            #[prost(uint32, tag = "19")]
                            pub xff_num_trusted_hops: u32,
                            #[prost(message, optional, tag = "35")]
                            pub common_http_protocol_options:
                                ::core::option::Option<core_v3::HttpProtocolOptions>,
                            #[prost(message, repeated, tag = "46")]
                            pub original_ip_detection_extensions:
                                ::prost::alloc::vec::Vec<core_v3::TypedExtensionConfig>,
                            #[prost(
                                oneof = "http_connection_manager::RouteSpecifier",
                                tags = "3, 4, 31"
                            )]
                            pub route_specifier: ::core::option::Option<
                                http_connection_manager::RouteSpecifier,
                            >,
                        }

                        pub mod http_connection_manager {
                            use crate::proto::envoy::config::route::v3 as route_v3;

                            #[derive(Clone, PartialEq, ::prost::Oneof)]
                            pub enum RouteSpecifier {
                                #[prost(message, tag = "3")]
                                Rds(super::Rds),
                                #[prost(message, tag = "4")]
                                RouteConfig(route_v3::RouteConfiguration),
                                #[prost(message, tag = "31")]
                                ScopedRoutes(super::ScopedRoutes),
                            }
                        }
                    }
                }
            }
        }
    }
}

pub mod xds {
    pub mod r#type {
        pub mod v3 {
            /// A struct-encoded extension configuration carrying its real type URL.
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct TypedStruct {
                #[prost(string, tag = "1")]
                pub type_url: ::prost::alloc::string::String,
                #[prost(message, optional, tag = "2")]
                pub value: ::core::option::Option<::prost_types::Struct>,
            }
        }
    }
}

pub mod udpa {
    pub mod r#type {
        pub mod v1 {
            /// The legacy UDPA spelling of [`super::super::super::xds::r#type::v3::TypedStruct`].
            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct TypedStruct {
                #[prost(string, tag = "1")]
                pub type_url: ::prost::alloc::string::String,
                #[prost(message, optional, tag = "2")]
                pub value: ::core::option::Option<::prost_types::Struct>,
            }
        }
    }
}
