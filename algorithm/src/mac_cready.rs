// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::geo::GeoPoint;
use common::glide::{GlidePolar, GlideResult, GlideState};

/// One leg of a glide chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideLeg {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Minimum arrival altitude (MSL) at the destination.
    pub min_height: f64,
}

impl GlideLeg {
    pub fn new(origin: GeoPoint, destination: GeoPoint, min_height: f64) -> Self {
        GlideLeg {
            origin,
            destination,
            min_height,
        }
    }
}

/// Solves every leg of a chain at the MacCready setting of `polar`.
///
/// The aircraft starts at `altitude` (MSL). Each leg is glided while height
/// above the leg's minimum is available, missing height is climbed at the
/// MacCready rate before the leg is continued.
pub fn solve_legs(polar: &GlidePolar, legs: &[GlideLeg], altitude: f64) -> Vec<GlideResult> {
    let mut virtual_altitude = altitude;
    legs.iter()
        .map(|leg| {
            let state = GlideState::new(
                leg.origin.vector_to(&leg.destination),
                virtual_altitude - leg.min_height,
            );
            let result = polar.solve(&state);
            virtual_altitude += result.height_climb - result.height_glide;
            result
        })
        .collect()
}

/// Solves a chain of legs and sums the results, see [`solve_legs`].
///
/// The returned `altitude_difference` is the arrival margin of a pure glide
/// over the whole chain, so it is negative whenever any climb is needed.
///
/// # Returns
/// A result with [`common::glide::GlideValidity::NoSolution`] if `legs` is empty.
pub fn solve_chain(polar: &GlidePolar, legs: &[GlideLeg], altitude: f64) -> GlideResult {
    let mut total = GlideResult::default();
    let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
        return total;
    };

    for result in solve_legs(polar, legs, altitude) {
        total.add(&result);
    }

    total.vector = first.origin.vector_to(&last.destination);
    total.vector.distance = legs
        .iter()
        .map(|l| l.origin.distance(&l.destination))
        .sum();
    total.altitude_difference = altitude - total.height_glide - last.min_height;
    total
}
