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

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Registry};

pub(crate) const RESULT_LABEL: &str = "result";
pub(crate) const SIDE_LABEL: &str = "side";
pub(crate) const KIND_LABEL: &str = "kind";

pub(crate) const ACCEPTED: &str = "accepted";
pub(crate) const REJECTED: &str = "rejected";
pub(crate) const UNKNOWN_SIDE: &str = "unknown";

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::new_custom(Some("xds_listener".into()), None)
        .expect("a static, valid prefix is always accepted")
});

/// Returns the [`Registry`] containing all the metrics registered by
/// listener processing.
#[inline]
pub fn registry() -> &'static Registry {
    &REGISTRY
}

pub(crate) fn listener_resources(result: &str, side: &str) -> IntCounter {
    static LISTENER_RESOURCES: Lazy<IntCounterVec> = Lazy::new(|| {
        prometheus::register_int_counter_vec_with_registry! {
            prometheus::opts! {
                "listener_resources_total",
                "Total number of listener resources processed, by result and listener side",
            },
            &[RESULT_LABEL, SIDE_LABEL],
            registry(),
        }
        .unwrap()
    });

    LISTENER_RESOURCES.with_label_values(&[result, side])
}

pub(crate) fn listener_errors(kind: &str) -> IntCounter {
    static LISTENER_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
        prometheus::register_int_counter_vec_with_registry! {
            prometheus::opts! {
                "listener_errors_total",
                "Total number of rejected listener resources, by error kind",
            },
            &[KIND_LABEL],
            registry(),
        }
        .unwrap()
    });

    LISTENER_ERRORS.with_label_values(&[kind])
}
