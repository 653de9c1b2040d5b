// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::remaining_legs;
use crate::point::OrderedTaskPoint;
use crate::settings::GlideSettings;
use algorithm::{SearchRange, ZeroFinder, solve_chain};
use common::aircraft::AircraftState;
use common::geo::GeoPoint;
use common::glide::GlidePolar;
use tracing::debug;

/// Moves the targets of the remaining area points so that the task is
/// finished in a given time.
///
/// The search parameter `p` places every movable target at fraction `p`
/// between its minimum (0) and maximum (1) distance solution.
pub struct TaskMinTarget<'a> {
    points: &'a mut [OrderedTaskPoint],
    active: usize,
    aircraft: &'a AircraftState,
    settings: &'a GlideSettings,
    polar: GlidePolar,
    /// Time budget in seconds for the remaining task.
    time_remaining: f64,
    force_current: bool,
}

impl<'a> TaskMinTarget<'a> {
    pub fn new(
        points: &'a mut [OrderedTaskPoint],
        active: usize,
        aircraft: &'a AircraftState,
        settings: &'a GlideSettings,
        polar: &GlidePolar,
        time_remaining: f64,
    ) -> Self {
        TaskMinTarget {
            points,
            active,
            aircraft,
            settings,
            polar: *polar,
            time_remaining,
            force_current: false,
        }
    }

    fn set_range(&mut self, p: f64) {
        let force_current = self.force_current;
        for point in self.points.iter_mut().skip(self.active) {
            point.set_range(p, force_current);
        }
    }

    fn targets(&self) -> Vec<GeoPoint> {
        self.points.iter().map(|p| *p.target()).collect()
    }

    fn restore(&mut self, targets: &[GeoPoint]) {
        for (point, target) in self.points.iter_mut().zip(targets) {
            point.set_target_unchecked(*target);
        }
    }

    /// Searches the target parameter and leaves the targets there.
    ///
    /// If the budget cannot be met the targets are left at the nearest
    /// bound of the range. Targets are restored if the search fails
    /// otherwise.
    ///
    /// # Returns
    /// The target parameter in `[0, 1]`.
    pub fn search(&mut self, guess: f64) -> f64 {
        if self.points.len() <= self.active || !self.aircraft.location.is_valid() {
            return guess;
        }
        let saved = self.targets();

        if let Some(p) = self.find_zero(guess) {
            return p;
        }
        // the current point may have been skipped as already entered
        self.force_current = true;
        if let Some(p) = self.find_zero(guess) {
            return p;
        }

        let range = self.range();
        if self.f(range.x_max) < 0.0 {
            debug!("Task is finished early even with the farthest targets");
            return range.x_max;
        }
        if self.f(range.x_min) > 0.0 {
            debug!("Task is finished late even with the nearest targets");
            return range.x_min;
        }
        self.restore(&saved);
        guess
    }
}

impl ZeroFinder for TaskMinTarget<'_> {
    fn f(&mut self, p: f64) -> f64 {
        self.set_range(p);
        let legs = remaining_legs(&*self.points, self.active, self.aircraft, self.settings);
        let result = solve_chain(&self.polar, &legs, self.aircraft.altitude);
        result.time_elapsed - self.time_remaining
    }

    fn range(&self) -> SearchRange {
        SearchRange::new(0.0, 1.0, 0.001)
    }
}
