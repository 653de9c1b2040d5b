// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Snapshot types describing task progress.
//!
//! All types here are plain values. They are recomputed by the task engine
//! on every update cycle and handed out as copies, they never refer back to
//! the task points they were derived from.

use crate::aircraft::{AircraftState, TimeStamp};
use crate::geo::GeoBounds;
use crate::glide::GlideResult;
use serde::{Deserialize, Serialize};

/// Container for start point statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StartStats {
    /// True if the start was advanced by a pilot event.
    pub advanced_by_pev: bool,
    /// Time when the task was started. Only valid if [`StartStats::has_started`].
    pub time: TimeStamp,
    /// Altitude in meters MSL when the task was started.
    pub altitude: f64,
    /// Ground speed in m/s when the task was started.
    pub ground_speed: f64,
}

impl StartStats {
    pub fn reset(&mut self) {
        *self = StartStats::default();
    }

    pub fn has_started(&self) -> bool {
        self.time.is_defined()
    }

    /// Records the start from the given aircraft state.
    pub fn set_started(&mut self, aircraft: &AircraftState, pev: bool) {
        self.advanced_by_pev = pev;
        self.time = aircraft.time;
        self.altitude = aircraft.altitude;
        self.ground_speed = aircraft.ground_speed;
    }

    pub fn started_time(&self) -> TimeStamp {
        self.time
    }
}

/// Distance, time and glide statistics for the whole task or for the
/// current leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegStats {
    pub remaining: f64,
    pub planned: f64,
    pub travelled: f64,
    /// Remaining distance that can be covered in the remaining time at the
    /// planned speed.
    pub remaining_effective: f64,
    pub time_elapsed: f64,
    pub time_remaining: f64,
    pub time_planned: f64,
    pub solution_remaining: GlideResult,
    pub solution_travelled: GlideResult,
    pub solution_planned: GlideResult,
}

impl LegStats {
    pub fn reset(&mut self) {
        *self = LegStats::default();
    }

    /// Average speed so far in m/s, `None` before any time elapsed.
    pub fn speed_travelled(&self) -> Option<f64> {
        (self.time_elapsed > 0.0).then(|| self.travelled / self.time_elapsed)
    }
}

/// Derived snapshot of the current progress on an ordered task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub bounds: GeoBounds,
    pub active_index: usize,

    pub distance_nominal: f64,
    pub distance_min: f64,
    pub distance_max: f64,
    /// Maximum distance using the full zone boundaries, ignoring samples.
    pub distance_max_total: f64,
    pub distance_scored: f64,

    pub total: LegStats,
    pub current_leg: LegStats,

    pub task_valid: bool,
    pub has_targets: bool,
    pub is_mat: bool,
    pub has_optional_starts: bool,
    pub task_finished: bool,
    pub inside_oz: bool,
    pub need_to_arm: bool,
    pub pev_based_advance_ready: bool,

    pub start: StartStats,

    pub mc_best: f64,
    pub cruise_efficiency: f64,
    pub effective_mc: f64,
    pub glide_required: f64,
    pub gradient: f64,
}

impl Default for TaskStats {
    fn default() -> Self {
        TaskStats {
            bounds: GeoBounds::invalid(),
            active_index: 0,
            distance_nominal: 0.0,
            distance_min: 0.0,
            distance_max: 0.0,
            distance_max_total: 0.0,
            distance_scored: 0.0,
            total: LegStats::default(),
            current_leg: LegStats::default(),
            task_valid: false,
            has_targets: false,
            is_mat: false,
            has_optional_starts: false,
            task_finished: false,
            inside_oz: false,
            need_to_arm: false,
            pev_based_advance_ready: false,
            start: StartStats::default(),
            mc_best: 0.0,
            cruise_efficiency: 1.0,
            effective_mc: 0.0,
            glide_required: 0.0,
            gradient: 0.0,
        }
    }
}

impl TaskStats {
    pub fn reset(&mut self) {
        *self = TaskStats::default();
    }
}

/// Per point entry of a [`TaskSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSummaryPoint {
    pub d_planned: f64,
    pub achieved: bool,
    /// Fraction of the planned task distance up to and including this point.
    pub p_planned: f64,
}

/// Compact progress overview, e.g. for a progress bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub active: usize,
    pub points: Vec<TaskSummaryPoint>,
    /// Fraction of the task distance remaining.
    pub p_remaining: f64,
}

impl TaskSummary {
    pub fn clear(&mut self) {
        self.active = 0;
        self.points.clear();
        self.p_remaining = 1.0;
    }

    pub fn append(&mut self, point: TaskSummaryPoint) {
        self.points.push(point);
    }

    /// Normalizes the accumulated planned distances and the remaining fraction.
    pub fn update(&mut self, remaining: f64, planned: f64) {
        if planned <= 0.0 {
            self.p_remaining = 1.0;
            return;
        }
        self.p_remaining = (remaining / planned).clamp(0.0, 1.0);
        let mut accumulated = 0.0;
        for point in self.points.iter_mut() {
            accumulated += point.d_planned;
            point.p_planned = (accumulated / planned).clamp(0.0, 1.0);
        }
    }
}
