// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::{min_height, remaining_legs};
use crate::point::OrderedTaskPoint;
use crate::settings::GlideSettings;
use algorithm::{SearchRange, ZeroFinder};
use common::aircraft::AircraftState;

/// Glide ratio needed to arrive at every remaining point above its
/// minimum height.
pub struct TaskGlideRequired {
    /// Distance from the aircraft and available height per remaining point.
    margins: Vec<(f64, f64)>,
}

impl TaskGlideRequired {
    pub fn new(points: &[OrderedTaskPoint], active: usize, aircraft: &AircraftState, settings: &GlideSettings) -> Self {
        let legs = remaining_legs(points, active, aircraft, settings);
        let mut distance = 0.0;
        let margins = legs
            .iter()
            .zip(points.iter().skip(active))
            .map(|(leg, point)| {
                distance += leg.origin.distance(&leg.destination);
                (distance, aircraft.altitude - min_height(point, settings))
            })
            .collect();
        TaskGlideRequired { margins }
    }

    /// # Returns
    /// The required glide ratio, 0 if there is nothing to reach or even the
    /// flattest glide of the range does not reach all points.
    pub fn search(&mut self, guess: f64) -> f64 {
        if self.margins.is_empty() {
            return 0.0;
        }
        let range = self.range();
        if self.f(range.x_max) < 0.0 {
            return 0.0;
        }
        if self.f(range.x_min) >= 0.0 {
            return range.x_min;
        }
        self.find_zero(guess).unwrap_or(0.0)
    }
}

impl ZeroFinder for TaskGlideRequired {
    fn f(&mut self, glide_ratio: f64) -> f64 {
        self.margins
            .iter()
            .map(|(distance, height)| height - distance / glide_ratio)
            .fold(f64::INFINITY, f64::min)
    }

    fn range(&self) -> SearchRange {
        SearchRange::new(1.0, 200.0, 0.01)
    }
}
