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

//! Extensions to `prost` and related crates.

use prost_types::value::Kind;
use serde_json::Value;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn value_from_struct(r#struct: prost_types::Struct) -> Value {
    Value::Object(
        r#struct
            .fields
            .into_iter()
            .filter_map(|(k, v)| v.kind.map(value_from_kind).map(|v| (k, v)))
            .collect(),
    )
}

pub fn value_from_kind(kind: Kind) -> Value {
    match kind {
        Kind::NullValue(_) => Value::Null,
        Kind::BoolValue(v) => Value::Bool(v),
        Kind::NumberValue(v) => number_from_f64(v),
        Kind::StringValue(v) => Value::String(v),
        Kind::ListValue(v) => Value::Array(
            v.values
                .into_iter()
                .filter_map(|v| v.kind)
                .map(value_from_kind)
                .collect(),
        ),
        Kind::StructValue(v) => value_from_struct(v),
    }
}

// `Struct` only has doubles, integral values are mapped back to integers so
// they deserialize into integer fields.
fn number_from_f64(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
        if v >= 0.0 {
            Value::from(v as u64)
        } else {
            Value::from(v as i64)
        }
    } else {
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

pub fn struct_from_json(value: Value) -> Option<prost_types::Struct> {
    match from_json(value) {
        prost_types::Value {
            kind: Some(Kind::StructValue(r#struct)),
        } => Some(r#struct),
        _ => None,
    }
}

pub fn from_json(value: Value) -> prost_types::Value {
    prost_types::Value {
        kind: Some(match value {
            Value::Null => Kind::NullValue(<_>::default()),
            Value::Bool(v) => Kind::BoolValue(v),
            Value::Number(v) => v
                .as_f64()
                .map_or(Kind::NullValue(<_>::default()), Kind::NumberValue),
            Value::String(v) => Kind::StringValue(v),
            Value::Array(v) => Kind::ListValue(prost_types::ListValue {
                values: v.into_iter().map(from_json).collect(),
            }),
            Value::Object(v) => Kind::StructValue(prost_types::Struct {
                fields: v
                    .into_iter()
                    .map(|(key, value)| (key, from_json(value)))
                    .collect(),
            }),
        }),
    }
}
