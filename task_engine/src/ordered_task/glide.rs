// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::OrderedTask;
use crate::point::{OrderedTaskPoint, TaskPointKind};
use crate::settings::duration_seconds;
use crate::solvers::{
    PlannedSolution, TaskBestMc, TaskCruiseEfficiency, TaskEffectiveMc, TaskGlideRequired, TaskMinTarget,
    TaskOptTarget, solve_remaining, solve_travelled,
};
use common::aircraft::{AircraftState, TimeStamp};
use common::glide::GlidePolar;
use common::stats::{TaskSummary, TaskSummaryPoint};
use tracing::debug;

/// Time at which `point` was achieved: the exit for a start, the entry for
/// every other point.
fn scored_time(point: &OrderedTaskPoint) -> TimeStamp {
    let state = match point.kind() {
        TaskPointKind::Start => point.exited_state(),
        _ => point.entered_state(),
    };
    state.map_or(TimeStamp::undefined(), |s| s.time)
}

impl OrderedTask {
    /// MacCready solution from the aircraft over the remaining points.
    pub fn glide_solution_remaining(&mut self, state: &AircraftState, polar: &GlidePolar) {
        if !state.location.is_valid() || self.active >= self.points.len() {
            self.stats.total.solution_remaining.reset();
            self.stats.current_leg.solution_remaining.reset();
            return;
        }
        let (total, leg) = solve_remaining(&self.points, self.active, state, &self.behaviour.glide, polar);
        self.stats.total.solution_remaining = total;
        self.stats.current_leg.solution_remaining = leg;
    }

    /// MacCready solution of the part flown since the start.
    pub fn glide_solution_travelled(&mut self, state: &AircraftState, polar: &GlidePolar) {
        if !state.location.is_valid() || self.points.is_empty() {
            self.stats.total.solution_travelled.reset();
            self.stats.current_leg.solution_travelled.reset();
            return;
        }
        let (total, leg) = solve_travelled(&self.points, self.active, state, polar);
        self.stats.total.solution_travelled = total;
        self.stats.current_leg.solution_travelled = leg;
    }

    /// MacCready solution of the whole task over the planned locations.
    pub fn glide_solution_planned(&mut self, state: &AircraftState, polar: &GlidePolar) {
        if !state.location.is_valid() || self.points.is_empty() {
            self.stats.total.solution_planned.reset();
            self.stats.current_leg.solution_planned.reset();
            self.stats.total.remaining_effective = 0.0;
            self.stats.current_leg.remaining_effective = 0.0;
            return;
        }
        let solution = PlannedSolution::solve(&self.points, self.active, state, &self.behaviour.glide, polar);
        self.stats.total.solution_planned = solution.total;
        self.stats.current_leg.solution_planned = solution.leg;

        let total_remaining = self.stats.total.solution_remaining;
        self.stats.total.remaining_effective = if total_remaining.is_ok() {
            solution.effective_distance(total_remaining.time_elapsed)
        } else {
            0.0
        };
        let leg_remaining = self.stats.current_leg.solution_remaining;
        self.stats.current_leg.remaining_effective = if leg_remaining.is_ok() {
            solution.effective_leg_distance(leg_remaining.time_elapsed)
        } else {
            0.0
        };
    }

    /// MacCready setting that reaches the finish at the minimum height
    /// without climbing, `None` if it can not be reached at all.
    pub fn calc_best_mc(&self, state: &AircraftState, polar: &GlidePolar) -> Option<f64> {
        if !state.location.is_valid() {
            return None;
        }
        TaskBestMc::new(&self.points, self.active, state, &self.behaviour.glide, polar).search(polar.mc())
    }

    /// Glide ratio required to complete the task without climbing, zero if
    /// it can not be determined.
    pub fn calc_required_glide(&self, state: &AircraftState) -> f64 {
        if !state.location.is_valid() {
            return 0.0;
        }
        TaskGlideRequired::new(&self.points, self.active, state, &self.behaviour.glide).search(0.0)
    }

    pub fn calc_cruise_efficiency(&self, state: &AircraftState, polar: &GlidePolar) -> f64 {
        if !state.location.is_valid() {
            return 1.0;
        }
        TaskCruiseEfficiency::new(&self.points, self.active, state, polar).search(1.0)
    }

    pub fn calc_effective_mc(&self, state: &AircraftState, polar: &GlidePolar) -> f64 {
        if !state.location.is_valid() {
            return polar.mc();
        }
        TaskEffectiveMc::new(&self.points, self.active, state, polar).search(polar.mc())
    }

    /// Moves the area targets so that the rest of the task takes
    /// `time_remaining` seconds.
    ///
    /// # Returns
    /// The range parameter of the targets in `[0, 1]`.
    pub fn calc_min_target(&mut self, state: &AircraftState, polar: &GlidePolar, time_remaining: f64) -> f64 {
        if !self.stats.has_targets {
            return 0.0;
        }
        TaskMinTarget::new(
            &mut self.points,
            self.active,
            state,
            &self.behaviour.glide,
            polar,
            time_remaining,
        )
        .search(0.0)
    }

    /// Moves the target of the active area point along its isoline towards
    /// the aircraft.
    pub fn calc_opt_target(&mut self, state: &AircraftState, polar: &GlidePolar) -> bool {
        if !self.points.get(self.active).is_some_and(|p| p.has_target()) {
            return false;
        }
        let projection = self.projection;
        TaskOptTarget::new(
            &mut self.points,
            self.active,
            state,
            &self.behaviour.glide,
            polar,
            &projection,
        )
        .search(0.5)
    }

    /// Glide gradient to the finish along the remaining task, zero if the
    /// finish is not ahead.
    pub fn calc_gradient(&self, state: &AircraftState) -> f64 {
        let Some(last) = self.points.last() else {
            return 0.0;
        };
        let distance = self.scan_distance_remaining(&state.location);
        if distance <= 0.0 {
            return 0.0;
        }
        (state.altitude - last.elevation()) / distance
    }

    /// Cruise statistics are stable only away from the zones of the active
    /// and the previous point.
    pub fn allow_incremental_boundary_stats(&self, state: &AircraftState) -> bool {
        if self.active == 0 {
            return false;
        }
        let inside = |i: usize| self.points.get(i).is_some_and(|p| p.is_in_sector(&state.location));
        !(inside(self.active) || inside(self.active - 1))
    }

    pub(crate) fn update_stats_times(&mut self, state: &AircraftState) {
        self.stats.total.time_elapsed = self
            .points
            .first()
            .map(scored_time)
            .and_then(|start| state.time.since(&start))
            .unwrap_or(0.0)
            .max(0.0);

        self.stats.current_leg.time_elapsed = self
            .active
            .checked_sub(1)
            .and_then(|i| self.points.get(i))
            .map(scored_time)
            .and_then(|leg_start| state.time.since(&leg_start))
            .unwrap_or(0.0)
            .max(0.0);
    }

    pub(crate) fn update_glide_solutions(&mut self, state: &AircraftState, polar: &GlidePolar) {
        self.glide_solution_remaining(state, polar);
        self.glide_solution_travelled(state, polar);
        self.glide_solution_planned(state, polar);

        for leg in [&mut self.stats.total, &mut self.stats.current_leg] {
            leg.time_remaining = leg.solution_remaining.time_elapsed;
            leg.time_planned = leg.solution_planned.time_elapsed;
        }

        self.stats.mc_best = self.calc_best_mc(state, polar).unwrap_or(0.0);
        self.stats.gradient = self.calc_gradient(state);
    }

    /// Runs the expensive solvers. Call when there is time left after an
    /// update cycle.
    ///
    /// # Returns
    /// `true` if area targets were moved.
    pub fn update_idle(&mut self, state: &AircraftState, polar: &GlidePolar) -> bool {
        let boundary_stats = self.task_started() && self.allow_incremental_boundary_stats(state);

        if self.behaviour.calc_cruise_efficiency && boundary_stats {
            self.stats.cruise_efficiency = self.calc_cruise_efficiency(state, polar);
        } else {
            self.stats.cruise_efficiency = 1.0;
        }
        if self.behaviour.calc_effective_mc && boundary_stats {
            self.stats.effective_mc = self.calc_effective_mc(state, polar);
        } else {
            self.stats.effective_mc = polar.mc();
        }
        self.stats.glide_required = if self.behaviour.calc_glide_required {
            self.calc_required_glide(state)
        } else {
            0.0
        };

        let min_time = self.settings.aat_min_time_seconds();
        if !self.has_start() || !self.behaviour.optimise_targets_range || min_time <= 0.0 || !self.stats.has_targets {
            return false;
        }

        let target_time = min_time + duration_seconds(&self.behaviour.optimise_targets_margin);
        let time_remaining = (target_time - self.stats.total.time_elapsed).max(0.0);
        let p = self.calc_min_target(state, polar, time_remaining);
        debug!("Area targets at range {:.3} for {:.0} s", p, time_remaining);

        if self.behaviour.optimise_targets_bearing
            && self.points.get(self.active).is_some_and(|p| p.kind() == TaskPointKind::Aat)
        {
            self.calc_opt_target(state, polar);
        }
        true
    }

    /// Progress overview over the planned task.
    pub fn summary(&self) -> TaskSummary {
        let mut summary = TaskSummary::default();
        summary.clear();
        summary.active = self.active;

        let mut previous = None;
        for (i, point) in self.points.iter().enumerate() {
            let d_planned = previous.map_or(0.0, |p: &OrderedTaskPoint| {
                p.location_planned().distance(point.location_planned())
            });
            let achieved = if i == 0 {
                point.has_exited()
            } else {
                point.has_sampled()
            };
            summary.append(TaskSummaryPoint {
                d_planned,
                achieved,
                p_planned: 0.0,
            });
            previous = Some(point);
        }

        summary.update(self.stats.total.remaining, self.stats.total.planned);
        summary
    }
}
