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

//! Validation of xDS Listener resources into typed listener updates.

#![deny(unused_must_use)]

pub mod cli;
pub mod config;
pub mod filters;
pub mod listener;
pub mod metrics;
pub mod prost;
pub mod proto;
pub mod route;


pub type Result<T, E = eyre::Error> = std::result::Result<T, E>;

#[doc(inline)]
pub use self::{
    cli::Cli,
    config::Config,
    listener::{ListenerProcessor, ListenerUpdate},
};
