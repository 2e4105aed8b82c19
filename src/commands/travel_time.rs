// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Travel-time command - shortest durations on the repaired network

use super::{load_network, InputArgs};
use crate::config::Config;
use crate::travel_time::{pair_travel_time, weighted_average_travel_time};
use crate::types::StopId;
use anyhow::{bail, Context, Result};

/// Arguments for the travel-time command
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TravelTimeArgs {
    /// Input tables
    #[command(flatten)]
    pub input: InputArgs,

    /// Origin stop (requires --to)
    #[arg(long, requires = "to")]
    pub from: Option<u64>,

    /// Destination stop (requires --from)
    #[arg(long, requires = "from")]
    pub to: Option<u64>,
}

/// Print one pair's travel time, or the average over all pairs
pub fn run(config: &Config, args: &TravelTimeArgs, json: bool) -> Result<()> {
    let network = load_network(&args.input.merge(&config.input))?;

    let (label, value) = match (args.from, args.to) {
        (Some(from), Some(to)) => {
            let (from, to) = (StopId(from), StopId(to));
            let time = pair_travel_time(&network.full, from, to)
                .with_context(|| format!("No travel time from {} to {}", from, to))?;
            (format!("{} -> {}", from, to), time)
        }
        (None, None) => (
            "average over all pairs".to_string(),
            weighted_average_travel_time(&network.full),
        ),
        _ => bail!("--from and --to must be given together"),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({ "from": args.from, "to": args.to, "travel_time": value })
        );
    } else {
        println!("Travel time ({}): {:.2}", label, value);
    }
    Ok(())
}
