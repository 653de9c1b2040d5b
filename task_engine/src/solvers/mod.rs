// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Glide solvers over the task point chain.
//!
//! The MacCready solutions for the remaining, travelled and planned part
//! of a task are built from chains of [`GlideLeg`]s. The searching solvers
//! wrap one of these chains into a [`algorithm::ZeroFinder`].

mod best_mc;
mod cruise_efficiency;
mod effective_mc;
mod glide_required;
mod min_target;
mod opt_target;

pub use best_mc::TaskBestMc;
pub use cruise_efficiency::TaskCruiseEfficiency;
pub use effective_mc::TaskEffectiveMc;
pub use glide_required::TaskGlideRequired;
pub use min_target::TaskMinTarget;
pub use opt_target::TaskOptTarget;

use crate::point::{OrderedTaskPoint, TaskPointKind};
use crate::settings::GlideSettings;
use algorithm::{GlideLeg, solve_chain, solve_legs};
use common::aircraft::AircraftState;
use common::glide::{GlidePolar, GlideResult};

/// Minimum arrival altitude (MSL) at `point`.
pub fn min_height(point: &OrderedTaskPoint, settings: &GlideSettings) -> f64 {
    let height = point.elevation() + settings.safety_height_arrival;
    if point.kind() == TaskPointKind::Finish {
        height.max(point.min_altitude())
    } else {
        height
    }
}

/// Legs from the aircraft over the remaining locations of all points from
/// `active` on.
pub fn remaining_legs(
    points: &[OrderedTaskPoint],
    active: usize,
    aircraft: &AircraftState,
    settings: &GlideSettings,
) -> Vec<GlideLeg> {
    let mut origin = aircraft.location;
    points
        .iter()
        .skip(active)
        .map(|point| {
            let destination = *point.location_remaining();
            let leg = GlideLeg::new(origin, destination, min_height(point, settings));
            origin = destination;
            leg
        })
        .collect()
}

/// Legs from the start over the maximum distance solution of the achieved
/// points to the aircraft. Empty before the start.
pub fn travelled_legs(points: &[OrderedTaskPoint], active: usize, aircraft: &AircraftState) -> Vec<GlideLeg> {
    if active == 0 || active > points.len() {
        return Vec::new();
    }
    let mut locations: Vec<_> = points[..active].iter().map(|p| *p.search_max().location()).collect();
    locations.push(aircraft.location);
    locations
        .windows(2)
        .map(|w| GlideLeg::new(w[0], w[1], aircraft.altitude))
        .collect()
}

/// Legs over the planned locations of the whole task.
pub fn planned_legs(points: &[OrderedTaskPoint], settings: &GlideSettings) -> Vec<GlideLeg> {
    points
        .windows(2)
        .map(|w| GlideLeg::new(*w[0].location_planned(), *w[1].location_planned(), min_height(&w[1], settings)))
        .collect()
}

/// Altitude at the start, the current altitude before the task is started.
pub fn start_altitude(points: &[OrderedTaskPoint], aircraft: &AircraftState) -> f64 {
    points
        .first()
        .and_then(|p| p.exited_state())
        .map_or(aircraft.altitude, |s| s.altitude)
}

/// Seconds since the start, `None` before the start.
pub fn time_since_start(points: &[OrderedTaskPoint], aircraft: &AircraftState) -> Option<f64> {
    let start = points.first()?.exited_state()?;
    aircraft.time.since(&start.time)
}

/// Total and active leg solution of the remaining task.
pub fn solve_remaining(
    points: &[OrderedTaskPoint],
    active: usize,
    aircraft: &AircraftState,
    settings: &GlideSettings,
    polar: &GlidePolar,
) -> (GlideResult, GlideResult) {
    let legs = remaining_legs(points, active, aircraft, settings);
    let total = solve_chain(polar, &legs, aircraft.altitude);
    let leg = solve_chain(polar, &legs[..legs.len().min(1)], aircraft.altitude);
    (total, leg)
}

/// Total and active leg solution of the travelled part of the task.
pub fn solve_travelled(
    points: &[OrderedTaskPoint],
    active: usize,
    aircraft: &AircraftState,
    polar: &GlidePolar,
) -> (GlideResult, GlideResult) {
    let legs = travelled_legs(points, active, aircraft);
    let altitude = start_altitude(points, aircraft);
    let total = solve_chain(polar, &legs, altitude);
    let leg = solve_chain(polar, &legs[legs.len().saturating_sub(1)..], altitude);
    (total, leg)
}

/// Solution of the whole task over the planned locations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedSolution {
    pub total: GlideResult,
    pub leg: GlideResult,
    legs: Vec<GlideResult>,
    active_leg: Option<usize>,
}

impl PlannedSolution {
    pub fn solve(
        points: &[OrderedTaskPoint],
        active: usize,
        aircraft: &AircraftState,
        settings: &GlideSettings,
        polar: &GlidePolar,
    ) -> Self {
        let legs = planned_legs(points, settings);
        let altitude = start_altitude(points, aircraft);
        let total = solve_chain(polar, &legs, altitude);
        let results = solve_legs(polar, &legs, altitude);
        let active_leg = active.checked_sub(1).filter(|i| *i < results.len());
        let leg = active_leg.map(|i| results[i]).unwrap_or_default();
        PlannedSolution {
            total,
            leg,
            legs: results,
            active_leg,
        }
    }

    /// Distance flown at the planned speeds in the last `time_remaining`
    /// seconds of the task.
    pub fn effective_distance(&self, time_remaining: f64) -> f64 {
        let mut time_left = time_remaining.max(0.0);
        let mut distance = 0.0;
        for leg in self.legs.iter().rev() {
            if time_left <= 0.0 {
                break;
            }
            if leg.time_elapsed > time_left {
                distance += leg.vector.distance * time_left / leg.time_elapsed;
                break;
            }
            distance += leg.vector.distance;
            time_left -= leg.time_elapsed;
        }
        distance
    }

    /// Part of the active leg flown at the planned speed in `time_remaining`.
    pub fn effective_leg_distance(&self, time_remaining: f64) -> f64 {
        let Some(leg) = self.active_leg.map(|i| &self.legs[i]) else {
            return 0.0;
        };
        if leg.time_elapsed <= 0.0 {
            return leg.vector.distance;
        }
        leg.vector.distance * (time_remaining.max(0.0) / leg.time_elapsed).min(1.0)
    }
}
