// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest precedence first: built-in defaults, the user config file
//! in the platform config directory, an explicit `--config` file, then
//! `PERCOLATION__*` environment variables. CLI flags are applied on top by
//! the commands.

use crate::experiment::ExperimentConfig;
use crate::loader::DEFAULT_DELIMITER;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "transit-percolation.toml";

/// Prefix of environment overrides, e.g. `PERCOLATION__EXPERIMENT__STEPS`
pub const ENV_PREFIX: &str = "PERCOLATION";

/// Input table locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Transit edge table
    pub edges: Option<PathBuf>,
    /// Stop table
    pub nodes: Option<PathBuf>,
    /// Walking edge table
    pub walk: Option<PathBuf>,
    /// Column delimiter (first character is used)
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            edges: None,
            nodes: None,
            walk: None,
            delimiter: char::from(DEFAULT_DELIMITER).to_string(),
        }
    }
}

impl InputConfig {
    /// Delimiter as a byte, falling back to `;`
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(DEFAULT_DELIMITER)
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the network tables live
    pub input: InputConfig,
    /// Sweep parameters
    pub experiment: ExperimentConfig,
}

/// Default location of the user config file
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "transit-percolation")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load configuration from all layers.
///
/// An explicit `path` must exist; the user config file is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    // missing keys fall back to the serde defaults
    let mut builder = config::Config::builder();

    if let Some(user) = default_config_path() {
        debug!("Looking for user config at {}", user.display());
        builder = builder.add_source(config::File::from(user).required(false));
    }

    if let Some(explicit) = path {
        builder = builder.add_source(config::File::from(explicit).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let settings = builder.build().context("Failed to assemble configuration")?;
    settings
        .try_deserialize()
        .context("Invalid configuration")
}
