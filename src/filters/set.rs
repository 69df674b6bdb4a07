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

use std::iter::FromIterator;

use crate::filters::{self, DynFilterFactory, StaticFilter};

#[cfg(doc)]
use crate::filters::{FilterFactory, FilterRegistry};

/// A map of type URLs to [`DynFilterFactory`] values.
pub type FilterMap = std::collections::HashMap<&'static str, DynFilterFactory>;

/// A set of filters to be registered with a [`FilterRegistry`].
#[derive(Clone)]
pub struct FilterSet(FilterMap);

impl Default for FilterSet {
    /// Returns the default set of filters built into the crate.
    ///
    /// Current default filters:
    /// - [`router`][filters::router]
    fn default() -> Self {
        Self::default_with(Option::into_iter(None))
    }
}

impl FilterSet {
    /// Returns a `FilterSet` with the filters provided through `filters` in
    /// addition to the defaults. Any filter factories provided by `filters`
    /// will override any defaults registered under the same type URL.
    ///
    /// See [`FilterSet::default`] for a list of the current defaults.
    pub fn default_with(filters: impl IntoIterator<Item = DynFilterFactory>) -> Self {
        Self::with([filters::Router::factory()].into_iter().chain(filters))
    }

    /// Creates a new [`FilterSet`] with the set of `filter_factories` without
    /// any defaults.
    pub fn with(filters: impl IntoIterator<Item = DynFilterFactory>) -> Self {
        Self::from_iter(filters)
    }

    /// Adds `factory` under every type URL it advertises, replacing any
    /// previous factory for those type URLs.
    pub fn insert(&mut self, factory: DynFilterFactory) {
        for type_url in factory.type_urls() {
            self.0.insert(type_url, factory.clone());
        }
    }

    /// Removes the factory registered under `type_url`, returning it.
    pub fn remove(&mut self, type_url: &str) -> Option<DynFilterFactory> {
        self.0.remove(type_url)
    }

    pub fn get(&self, type_url: &str) -> Option<&DynFilterFactory> {
        self.0.get(type_url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DynFilterFactory> for FilterSet {
    fn from_iter<I: IntoIterator<Item = DynFilterFactory>>(iter: I) -> Self {
        let mut set = Self(FilterMap::new());

        for factory in iter {
            set.insert(factory);
        }

        set
    }
}
