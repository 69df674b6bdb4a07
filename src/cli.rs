/*
 * Copyright 2022 Google LLC
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

use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use eyre::WrapErr;
use serde::Serialize;

use crate::{
    listener::{ListenerProcessor, ListenerUpdate, ListenerUpdates, UnmarshalOptions},
    Config,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validates a batch of listener resources read from a file, and prints the
/// outcome as JSON.
#[derive(clap::Parser)]
#[clap(version)]
#[non_exhaustive]
pub struct Cli {
    /// The path to the file containing the batch of resources.
    #[clap(short, long, env = "XDS_LISTENER_CONFIG", default_value = "listeners.yaml")]
    pub config: PathBuf,
    /// Whether to log to stderr.
    #[clap(short, long, env)]
    pub quiet: bool,
}

/// The JSON printed by [`Cli::drive`].
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub version: &'a str,
    pub accepted: BTreeMap<&'a str, &'a ListenerUpdate>,
    pub rejected: BTreeMap<&'a str, String>,
    pub errors: Vec<String>,
}

impl<'a> From<&'a ListenerUpdates> for Summary<'a> {
    fn from(updates: &'a ListenerUpdates) -> Self {
        let mut summary = Self {
            version: &updates.version,
            accepted: BTreeMap::new(),
            rejected: BTreeMap::new(),
            errors: updates.errors.iter().map(ToString::to_string).collect(),
        };

        for (name, result) in &updates.updates {
            match result {
                Ok(update) => {
                    summary.accepted.insert(name.as_str(), update);
                }
                Err(error) => {
                    summary.rejected.insert(name.as_str(), error.to_string());
                }
            }
        }

        summary
    }
}

impl Cli {
    /// Processes the configured batch, writing the summary to stdout.
    #[tracing::instrument(skip_all)]
    pub fn drive(self) -> crate::Result<()> {
        if !self.quiet {
            let env_filter = tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy();
            tracing_subscriber::fmt()
                .json()
                .with_file(true)
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter)
                .init();
        }

        tracing::info!(version = VERSION, config = %self.config.display(), "starting");

        let updates = Self::process(&self.config)?;
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        serde_json::to_writer_pretty(&mut stdout, &Summary::from(&updates))?;
        writeln!(stdout)?;

        let accepted = updates.updates.values().filter(|result| result.is_ok()).count();
        let rejected = updates.updates.len() - accepted + updates.errors.len();
        tracing::info!(accepted, rejected, "processed listener resources");

        Ok(())
    }

    /// Reads the config at `path` and processes its resources.
    pub fn process(path: &Path) -> crate::Result<ListenerUpdates> {
        let config = Self::read_config(path)?;
        let processor = ListenerProcessor::new(Arc::new(config.filter_registry()));

        Ok(processor.unmarshal_listeners(UnmarshalOptions {
            version: config.version_info.clone(),
            resources: config.resources(),
            update_validator: None,
        }))
    }

    fn read_config(path: &Path) -> crate::Result<Config> {
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to open {}", path.display()))?;
        Config::from_reader(file).wrap_err_with(|| format!("failed to parse {}", path.display()))
    }
}
