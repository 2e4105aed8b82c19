// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Arbitrary bytes through the edge and node table parsers

#![no_main]

use libfuzzer_sys::fuzz_target;
use transit_percolation::loader::{parse_edge_table, parse_node_table, DEFAULT_DELIMITER};

fuzz_target!(|data: &[u8]| {
    let _ = parse_edge_table(data, DEFAULT_DELIMITER);
    let _ = parse_node_table(data, DEFAULT_DELIMITER);
});
