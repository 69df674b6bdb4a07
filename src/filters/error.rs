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

#[cfg(doc)]
use crate::filters::FilterFactory;

/// Why a [`FilterFactory`] rejected the configuration of one of its
/// filters.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum CreationError {
    /// The protobuf payload is not a valid message of the filter's type.
    #[error("filter `{filter}`: config decode error: {reason}")]
    Decode { filter: &'static str, reason: String },
    /// The `TypedStruct` payload doesn't match the filter's configuration.
    #[error("filter `{filter}`: typed struct deserialize error: {reason}")]
    Deserialize { filter: &'static str, reason: String },
    /// The parsed configuration couldn't be represented as JSON.
    #[error("filter `{filter}`: failed to serialize config to json: {reason}")]
    Serialize { filter: &'static str, reason: String },
    /// The configuration is well formed but its values are rejected.
    #[error("filter `{filter}`: {reason}")]
    Invalid { filter: &'static str, reason: String },
    #[error("filter `{0}` does not support per-route override configuration")]
    OverrideUnsupported(&'static str),
    #[error(transparent)]
    ConvertProtoConfig(#[from] ConvertProtoConfigError),
    #[error("infallible! this should never occur")]
    Infallible,
}

impl From<std::convert::Infallible> for CreationError {
    fn from(_: std::convert::Infallible) -> Self {
        Self::Infallible
    }
}

/// A protobuf configuration which decoded but couldn't be converted into the
/// filter's configuration type.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error(
    "failed to convert protobuf config{}: {reason}",
    .field.as_ref().map(|field| format!(", field `{field}`")).unwrap_or_default()
)]
pub struct ConvertProtoConfigError {
    reason: String,
    /// The offending field, if the failure is specific to one.
    field: Option<String>,
}

impl ConvertProtoConfigError {
    pub fn new(reason: impl std::fmt::Display, field: Option<String>) -> Self {
        Self {
            reason: reason.to_string(),
            field,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}
