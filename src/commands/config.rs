// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use crate::config::{default_config_path, Config};
use anyhow::{Context, Result};

/// Print the merged configuration, or a single `section.key`
pub fn run(config: &Config, key: Option<&str>, json: bool) -> Result<()> {
    let value = serde_json::to_value(config).context("Failed to serialize configuration")?;

    if let Some(key) = key {
        let found = key
            .split('.')
            .try_fold(&value, |node, part| node.get(part))
            .with_context(|| format!("Unknown config key: {}", key))?;
        match found {
            serde_json::Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        if let Some(path) = default_config_path() {
            println!("# user config: {}", path.display());
        }
        print!("{}", toml::to_string_pretty(config).context("Failed to render configuration")?);
    }
    Ok(())
}
