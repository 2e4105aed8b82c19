// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repair command - show what connecting the walking layer changed

use super::{load_network, InputArgs};
use crate::config::Config;
use anyhow::Result;

/// Report the synthetic walking links added to the network
pub fn run(config: &Config, input: &InputArgs, json: bool) -> Result<()> {
    let network = load_network(&input.merge(&config.input))?;
    let report = &network.repair;

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Walking layer:");
    println!("  Stops:              {}", network.walking.node_count());
    println!("  Walking edges:      {}", network.walking.edge_count());
    println!("  Initial components: {}", report.initial_components);
    println!(
        "  Stops mirrored:     {} into walking, {} into full",
        report.stops_added_to_walking, report.stops_added_to_full
    );

    if report.is_noop() {
        println!("\nAlready connected, nothing added.");
        return Ok(());
    }

    println!("\nSynthetic links ({}):", report.links.len());
    for link in &report.links {
        println!(
            "  {} <-> {}  {:.1} m, {:.1} s",
            link.from, link.to, link.distance, link.duration
        );
    }
    Ok(())
}
