// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::{start_altitude, time_since_start, travelled_legs};
use crate::point::OrderedTaskPoint;
use algorithm::{GlideLeg, SearchRange, ZeroFinder, solve_chain};
use common::aircraft::AircraftState;
use common::glide::GlidePolar;

/// Cruise efficiency that explains the time flown so far at the current
/// MacCready setting.
pub struct TaskCruiseEfficiency {
    legs: Vec<GlideLeg>,
    altitude: f64,
    time_elapsed: Option<f64>,
    polar: GlidePolar,
}

impl TaskCruiseEfficiency {
    pub fn new(points: &[OrderedTaskPoint], active: usize, aircraft: &AircraftState, polar: &GlidePolar) -> Self {
        TaskCruiseEfficiency {
            legs: travelled_legs(points, active, aircraft),
            altitude: start_altitude(points, aircraft),
            time_elapsed: time_since_start(points, aircraft),
            polar: *polar,
        }
    }

    /// # Returns
    /// The cruise efficiency, `guess` if there is no solution.
    pub fn search(&mut self, guess: f64) -> f64 {
        if self.legs.is_empty() || !self.time_elapsed.is_some_and(|t| t > 0.0) {
            return guess;
        }
        self.find_zero(guess).unwrap_or(guess)
    }
}

impl ZeroFinder for TaskCruiseEfficiency {
    fn f(&mut self, cruise_efficiency: f64) -> f64 {
        let mut polar = self.polar;
        polar.set_cruise_efficiency(cruise_efficiency);
        let result = solve_chain(&polar, &self.legs, self.altitude);
        result.time_elapsed - self.time_elapsed.unwrap_or_default()
    }

    fn range(&self) -> SearchRange {
        SearchRange::new(0.1, 2.0, 0.001)
    }
}
