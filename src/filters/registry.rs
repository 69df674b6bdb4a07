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

use crate::filters::{DynFilterFactory, FilterSet};

/// Registry of all HTTP filter factories known to listener processing.
///
/// The registry is built once from a [`FilterSet`] and is read-only from then
/// on, it is meant to be shared behind an [`Arc`][std::sync::Arc] by every
/// caller processing resources.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: FilterSet,
}

impl FilterRegistry {
    pub fn new(filters: FilterSet) -> Self {
        Self { filters }
    }

    /// Returns the factory registered for `type_url`, if any.
    pub fn get(&self, type_url: &str) -> Option<&DynFilterFactory> {
        self.filters.get(type_url)
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl From<FilterSet> for FilterRegistry {
    fn from(filters: FilterSet) -> Self {
        Self::new(filters)
    }
}
