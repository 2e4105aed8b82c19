// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Longitude/latitude to planar coordinates (spherical Web Mercator)

use crate::types::Position;
use std::f64::consts::PI;

/// Half the Earth's circumference in projected meters
pub const HALF_CIRCUMFERENCE: f64 = 20_037_508.34;

/// Project a longitude/latitude pair (degrees) onto the plane.
///
/// No bounds are checked: latitudes at or beyond ±90° produce infinite or
/// NaN coordinates rather than an error.
#[must_use]
pub fn project(lon: f64, lat: f64) -> Position {
    let x = lon * HALF_CIRCUMFERENCE / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    Position::new(x, y * HALF_CIRCUMFERENCE / 180.0)
}
