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

use prost::Message;

use crate::{
    filters::ConfigType,
    listener::Error,
    proto::{udpa::r#type::v1 as udpa, xds::r#type::v3 as xds},
};

/// The encodings of a `TypedStruct`, a struct-encoded extension
/// configuration which names its real type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// `xds.type.v3.TypedStruct`
    Xds,
    /// `udpa.type.v1.TypedStruct`
    Udpa,
}

impl Encoding {
    /// Every known encoding, in the order they are probed.
    pub const PROBES: [Self; 2] = [Self::Xds, Self::Udpa];

    pub const fn type_url(self) -> &'static str {
        match self {
            Self::Xds => "type.googleapis.com/xds.type.v3.TypedStruct",
            Self::Udpa => "type.googleapis.com/udpa.type.v1.TypedStruct",
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<ConfigType, prost::DecodeError> {
        let (type_url, value) = match self {
            Self::Xds => {
                let typed = xds::TypedStruct::decode(bytes)?;
                (typed.type_url, typed.value)
            }
            Self::Udpa => {
                let typed = udpa::TypedStruct::decode(bytes)?;
                (typed.type_url, typed.value)
            }
        };

        Ok(ConfigType::TypedStruct {
            type_url,
            value: value.unwrap_or_default(),
        })
    }
}

/// Unwraps `any` when it is a `TypedStruct`, otherwise passes it through as
/// a [`ConfigType::Dynamic`]. [`ConfigType::type_url`] of the result is the
/// type to look the filter up with.
pub(crate) fn unwrap(any: prost_types::Any) -> Result<ConfigType, Error> {
    match Encoding::PROBES
        .into_iter()
        .find(|encoding| any.type_url == encoding.type_url())
    {
        Some(encoding) => encoding.decode(&any.value).map_err(|source| Error::Decode {
            what: "TypedStruct filter config",
            source,
        }),
        None => Ok(ConfigType::Dynamic(any)),
    }
}
