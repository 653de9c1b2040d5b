// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Task configuration.
//!
//! [`TaskBehaviour`] is the configuration of the engine itself and changes
//! only through [`crate::OrderedTask::set_task_behaviour`].
//! [`OrderedTaskSettings`] are the rules of a particular task and are part
//! of a task declaration.

use crate::factory::FactoryType;
use chrono::{Duration, NaiveTime};
use common::aircraft::{AircraftState, TimeStamp};
use serde::{Deserialize, Serialize};

/// A time of day interval, each bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "common::serde::time", default)]
    pub start: Option<NaiveTime>,
    #[serde(with = "common::serde::time", default)]
    pub end: Option<NaiveTime>,
}

impl TimeWindow {
    pub fn new(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        TimeWindow { start, end }
    }

    pub fn unbounded() -> Self {
        TimeWindow::default()
    }

    /// `true` if the window has no start bound or `time` is not before it.
    /// An undefined `time` has only begun for a window without start bound.
    pub fn has_begun(&self, time: TimeStamp) -> bool {
        let Some(start) = self.start else {
            return true;
        };
        match time.seconds() {
            Some(t) => t >= seconds_of_day(&start),
            None => false,
        }
    }

    /// `true` if the window has an end bound and `time` is past it.
    pub fn has_ended(&self, time: TimeStamp) -> bool {
        match (self.end, time.seconds()) {
            (Some(end), Some(t)) => t > seconds_of_day(&end),
            _ => false,
        }
    }

    pub fn is_inside(&self, time: TimeStamp) -> bool {
        self.has_begun(time) && !self.has_ended(time)
    }
}

fn seconds_of_day(time: &NaiveTime) -> f64 {
    TimeStamp::from_naive_time(time).seconds().unwrap_or_default()
}

/// Rules for a valid start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConstraints {
    /// Period in which the start gate is open.
    pub open_time_span: TimeWindow,
    /// Maximum ground speed in m/s at the start.
    pub max_speed: Option<f64>,
    /// Maximum altitude in meters MSL at the start.
    pub max_height: Option<f64>,
    /// The start is scored from the pilot event instead of the zone exit.
    pub score_pev: bool,
    /// Delay between a pilot event and the opening of the start gate.
    #[serde(with = "common::serde::duration")]
    pub pev_start_wait_time: Duration,
    /// Length of the start gate opened by a pilot event, zero for unbounded.
    #[serde(with = "common::serde::duration")]
    pub pev_start_window: Duration,
}

impl Default for StartConstraints {
    fn default() -> Self {
        StartConstraints {
            open_time_span: TimeWindow::unbounded(),
            max_speed: None,
            max_height: None,
            score_pev: false,
            pev_start_wait_time: Duration::zero(),
            pev_start_window: Duration::zero(),
        }
    }
}

impl StartConstraints {
    pub fn check_speed(&self, state: &AircraftState) -> bool {
        self.max_speed.is_none_or(|max| state.ground_speed <= max)
    }

    pub fn check_height(&self, state: &AircraftState) -> bool {
        self.max_height.is_none_or(|max| state.altitude <= max)
    }
}

/// Rules for a valid finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinishConstraints {
    /// Minimum altitude in meters MSL when crossing the finish.
    pub min_height: f64,
    /// The finish must not be lower than 1000 m below the start altitude.
    pub fai_finish: bool,
    /// Maximum height loss between start and finish in meters.
    pub max_height_loss: Option<f64>,
}

/// Height loss allowed between start and finish by the FAI rules.
const FAI_FINISH_HEIGHT_LOSS: f64 = 1000.0;

impl FinishConstraints {
    /// Minimum finish altitude for a task started at `start_altitude`.
    pub fn finish_height(&self, start_altitude: Option<f64>) -> f64 {
        let mut height = self.min_height;
        if let Some(start) = start_altitude {
            if self.fai_finish {
                height = height.max(start - FAI_FINISH_HEIGHT_LOSS);
            }
            if let Some(loss) = self.max_height_loss {
                height = height.max(start - loss);
            }
        }
        height
    }
}

/// Rules of a particular task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderedTaskSettings {
    /// Minimum task time of area tasks.
    #[serde(with = "common::serde::duration")]
    pub aat_min_time: Duration,
    pub start_constraints: StartConstraints,
    pub finish_constraints: FinishConstraints,
}

impl Default for OrderedTaskSettings {
    fn default() -> Self {
        OrderedTaskSettings {
            aat_min_time: Duration::hours(3),
            start_constraints: StartConstraints::default(),
            finish_constraints: FinishConstraints::default(),
        }
    }
}

impl OrderedTaskSettings {
    pub fn aat_min_time_seconds(&self) -> f64 {
        duration_seconds(&self.aat_min_time)
    }
}

pub(crate) fn duration_seconds(duration: &Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

/// Glide related settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlideSettings {
    /// Height above a task point's elevation required on arrival, in meters.
    pub safety_height_arrival: f64,
}

impl Default for GlideSettings {
    fn default() -> Self {
        GlideSettings {
            safety_height_arrival: 300.0,
        }
    }
}

/// Thresholds deciding when the aircraft moved far enough for a new
/// minimum distance search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceSignificance {
    /// Relative change of the distance to the active point.
    pub relative_change: f64,
    /// Below this distance to the active point (m) every fix is significant.
    pub absolute_floor: f64,
}

impl Default for DistanceSignificance {
    fn default() -> Self {
        DistanceSignificance {
            relative_change: 0.05,
            absolute_floor: 2000.0,
        }
    }
}

impl DistanceSignificance {
    /// Decides on the truncated distances to the active point before and now.
    pub fn is_significant(&self, last_distance: f64, current_distance: f64) -> bool {
        let last = last_distance.floor();
        let current = current_distance.floor();
        let factor = 1.0 + self.relative_change;
        last < self.absolute_floor
            || current < self.absolute_floor
            || last >= current * factor
            || current >= last * factor
    }
}

/// Configuration of the task engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskBehaviour {
    /// Move area task targets to meet the minimum task time.
    pub optimise_targets_range: bool,
    /// Move the active area target along its isoline towards the aircraft.
    pub optimise_targets_bearing: bool,
    /// Time added to the minimum task time when moving targets.
    #[serde(with = "common::serde::duration")]
    pub optimise_targets_margin: Duration,
    pub calc_cruise_efficiency: bool,
    pub calc_effective_mc: bool,
    pub calc_glide_required: bool,
    /// Measure task distances from the edge of start and finish cylinders
    /// instead of their centers.
    pub subtract_start_finish_cylinder_radius: bool,
    pub glide: GlideSettings,
    pub significance: DistanceSignificance,
    pub task_type_default: FactoryType,
    pub ordered_defaults: OrderedTaskSettings,
}

impl Default for TaskBehaviour {
    fn default() -> Self {
        TaskBehaviour {
            optimise_targets_range: true,
            optimise_targets_bearing: true,
            optimise_targets_margin: Duration::zero(),
            calc_cruise_efficiency: true,
            calc_effective_mc: true,
            calc_glide_required: true,
            subtract_start_finish_cylinder_radius: true,
            glide: GlideSettings::default(),
            significance: DistanceSignificance::default(),
            task_type_default: FactoryType::Racing,
            ordered_defaults: OrderedTaskSettings::default(),
        }
    }
}
