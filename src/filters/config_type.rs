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

use crate::filters::CreationError;

/// The configuration of an HTTP filter as delivered by the control plane,
/// either as its own protobuf message or wrapped in a `TypedStruct`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigType {
    /// The filter's protobuf message.
    Dynamic(prost_types::Any),
    /// A struct-encoded configuration naming the filter's real type.
    TypedStruct {
        type_url: String,
        value: prost_types::Struct,
    },
}

impl ConfigType {
    /// The type URL of the filter configuration, for `TypedStruct` this is
    /// the wrapped type rather than the wrapper's own type.
    pub fn type_url(&self) -> &str {
        match self {
            Self::Dynamic(any) => &any.type_url,
            Self::TypedStruct { type_url, .. } => type_url,
        }
    }

    /// Parses the configuration of `filter` into `Static`, its human readable
    /// form, returning it along with its JSON representation.
    ///
    /// A [`ConfigType::Dynamic`] payload is decoded as `Dynamic`, the
    /// filter's protobuf message, and then converted. A
    /// [`ConfigType::TypedStruct`] is deserialized straight into `Static`.
    pub fn deserialize<Static, Dynamic>(
        self,
        filter: &'static str,
    ) -> Result<(serde_json::Value, Static), CreationError>
    where
        Dynamic: prost::Message + Default,
        Static: serde::Serialize + for<'de> serde::Deserialize<'de> + TryFrom<Dynamic>,
        CreationError: From<<Static as TryFrom<Dynamic>>::Error>,
    {
        let config = match self {
            Self::Dynamic(any) => {
                let message =
                    Dynamic::decode(&*any.value).map_err(|error| CreationError::Decode {
                        filter,
                        reason: error.to_string(),
                    })?;
                Static::try_from(message)?
            }
            Self::TypedStruct { value, .. } => {
                serde_json::from_value(crate::prost::value_from_struct(value)).map_err(
                    |error| CreationError::Deserialize {
                        filter,
                        reason: error.to_string(),
                    },
                )?
            }
        };

        let json = to_json(filter, &config)?;
        Ok((json, config))
    }
}

fn to_json(
    filter: &'static str,
    config: &impl serde::Serialize,
) -> Result<serde_json::Value, CreationError> {
    serde_json::to_value(config).map_err(|error| CreationError::Serialize {
        filter,
        reason: error.to_string(),
    })
}
