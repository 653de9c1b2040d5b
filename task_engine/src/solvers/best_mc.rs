// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::remaining_legs;
use crate::point::OrderedTaskPoint;
use crate::settings::GlideSettings;
use algorithm::{GlideLeg, SearchRange, ZeroFinder, solve_chain};
use common::aircraft::AircraftState;
use common::glide::GlidePolar;

/// Highest MacCready setting that still reaches the end of the task in
/// final glide.
pub struct TaskBestMc {
    legs: Vec<GlideLeg>,
    altitude: f64,
    polar: GlidePolar,
}

impl TaskBestMc {
    pub fn new(
        points: &[OrderedTaskPoint],
        active: usize,
        aircraft: &AircraftState,
        settings: &GlideSettings,
        polar: &GlidePolar,
    ) -> Self {
        TaskBestMc {
            legs: remaining_legs(points, active, aircraft, settings),
            altitude: aircraft.altitude,
            polar: *polar,
        }
    }

    /// # Returns
    /// The best MacCready setting, the upper bound of the range if the task
    /// is reachable even at that setting, `None` if the end of the task
    /// cannot be reached in a pure glide.
    pub fn search(&mut self, guess: f64) -> Option<f64> {
        if self.legs.is_empty() {
            return None;
        }
        let range = self.range();
        if self.f(range.x_max) >= 0.0 {
            return Some(range.x_max);
        }
        if self.f(range.x_min) < 0.0 {
            return None;
        }
        self.find_zero(guess)
    }
}

impl ZeroFinder for TaskBestMc {
    fn f(&mut self, mc: f64) -> f64 {
        solve_chain(&self.polar.with_mc(mc), &self.legs, self.altitude).altitude_difference
    }

    fn range(&self) -> SearchRange {
        SearchRange::new(0.0, 10.0, 0.001)
    }
}
