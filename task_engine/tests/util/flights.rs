// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::aircraft::AircraftState;
use common::geo::GeoPoint;
use common::glide::GlidePolar;
use common::stats::TaskStats;
use task_engine::OrderedTask;

/// Route over the centers of all task points.
pub fn center_route(task: &OrderedTask) -> Vec<GeoPoint> {
    task.points().iter().map(|p| *p.location()).collect()
}

/// Runs a full update cycle for every state, optionally with the idle
/// solvers, and collects the statistics after each fix.
pub fn fly_recording(task: &mut OrderedTask, states: &[AircraftState], polar: &GlidePolar, idle: bool) -> Vec<TaskStats> {
    let mut recorded = Vec::with_capacity(states.len());
    let Some(first) = states.first() else {
        return recorded;
    };
    let mut last = *first;
    for state in states {
        task.update(state, &last, polar);
        if idle {
            task.update_idle(state, polar);
        }
        recorded.push(*task.stats());
        last = *state;
    }
    recorded
}
