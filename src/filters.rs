/*
 * Copyright 2020 Google LLC
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

//! HTTP filter extensions and the registry used to look them up.

mod config_type;
mod error;
mod factory;
mod registry;
mod set;

pub mod router;

/// Prelude containing all types and traits required to implement
/// [`StaticFilter`] and [`FilterFactory`].
pub mod prelude {
    pub use super::{
        ConfigType, ConvertProtoConfigError, CreationError, DynFilterFactory, FilterFactory,
        StaticFilter,
    };
}

#[doc(inline)]
pub use self::{
    config_type::ConfigType,
    error::{ConvertProtoConfigError, CreationError},
    factory::{DynFilterFactory, FilterFactory},
    registry::FilterRegistry,
    router::Router,
    set::{FilterMap, FilterSet},
};

/// Statically safe version of [`FilterFactory`], if you're writing a Rust
/// filter, you should implement [`StaticFilter`] as it guarantees all of the
/// required properties through the type system, and derives the
/// [`FilterFactory`] virtual table automatically at compile-time.
/// ```
/// use xds_listener::filters::prelude::*;
///
/// struct Audit;
///
/// impl StaticFilter for Audit {
///     const NAME: &'static str = "audit";
///     const TYPE_URLS: &'static [&'static str] = &["type.googleapis.com/example.Audit"];
///     const CLIENT_SIDE: bool = true;
///     const SERVER_SIDE: bool = false;
///     type Configuration = ();
///     type BinaryConfiguration = ();
/// }
/// ```
pub trait StaticFilter: Sized
// This where clause simply states that `Configuration`'s conversion error is
// compatible with `CreationError`.
where
    CreationError: From<<Self::Configuration as TryFrom<Self::BinaryConfiguration>>::Error>,
{
    /// A human readable name of the filter.
    const NAME: &'static str;
    /// The type URLs of the filter's configuration.
    const TYPE_URLS: &'static [&'static str];
    /// Whether the filter terminates the chain.
    const TERMINAL: bool = false;
    /// Whether the filter can be used on the client side.
    const CLIENT_SIDE: bool;
    /// Whether the filter can be used on the server side.
    const SERVER_SIDE: bool;

    /// The human-readable configuration of the filter. **Must** be [`serde`]
    /// compatible and convertible from [`Self::BinaryConfiguration`].
    type Configuration: serde::Serialize
        + for<'de> serde::Deserialize<'de>
        + TryFrom<Self::BinaryConfiguration>;
    /// The binary configuration of the filter. **Must** be [`prost`]
    /// compatible.
    type BinaryConfiguration: prost::Message + Default;

    /// Validates a parsed top level configuration.
    /// # Errors
    /// If the provided configuration is invalid.
    fn validate(_config: &Self::Configuration) -> Result<(), CreationError> {
        Ok(())
    }

    /// Parses a per-route override configuration, filters don't accept
    /// overrides unless they implement this.
    fn parse_override(_config: ConfigType) -> Result<serde_json::Value, CreationError> {
        Err(CreationError::OverrideUnsupported(Self::NAME))
    }

    /// Creates a new dynamic [`FilterFactory`] virtual table.
    fn factory() -> DynFilterFactory
    where
        Self: 'static,
    {
        std::sync::Arc::new(std::marker::PhantomData::<fn() -> Self>)
    }
}

impl<F> FilterFactory for std::marker::PhantomData<fn() -> F>
where
    F: StaticFilter,
    CreationError: From<<F::Configuration as TryFrom<F::BinaryConfiguration>>::Error>,
{
    fn name(&self) -> &'static str {
        F::NAME
    }

    fn type_urls(&self) -> &'static [&'static str] {
        F::TYPE_URLS
    }

    fn parse_config(&self, config: ConfigType) -> Result<serde_json::Value, CreationError> {
        let (json, config) = config.deserialize::<F::Configuration, F::BinaryConfiguration>(F::NAME)?;
        F::validate(&config)?;
        Ok(json)
    }

    fn parse_config_override(&self, config: ConfigType) -> Result<serde_json::Value, CreationError> {
        F::parse_override(config)
    }

    fn is_terminal(&self) -> bool {
        F::TERMINAL
    }

    fn supports_client_side(&self) -> bool {
        F::CLIENT_SIDE
    }

    fn supports_server_side(&self) -> bool {
        F::SERVER_SIDE
    }
}
