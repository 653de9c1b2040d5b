// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::OrderedTask;
use crate::events::TaskEvents;
use crate::point::{OrderedTaskPoint, TaskPointKind};
use crate::settings::StartConstraints;
use common::aircraft::AircraftState;
use common::flat::{FlatBoundingBox, TaskProjection};
use std::sync::Arc;
use tracing::{debug, info};

/// Transitions of one point in one update cycle.
#[derive(Debug, Clone, Copy, Default)]
struct Transition {
    entered: bool,
    exited: bool,
    samples_changed: bool,
}

/// Everything needed to test a single point, detached from the task so the
/// points can be borrowed mutably.
struct TransitionCheck<'a> {
    state: &'a AircraftState,
    last: &'a AircraftState,
    bb_now: FlatBoundingBox,
    bb_last: FlatBoundingBox,
    projection: TaskProjection,
    constraints: StartConstraints,
    pev_ready: bool,
    events: &'a dyn TaskEvents,
}

impl TransitionCheck<'_> {
    fn check(&self, point: &mut OrderedTaskPoint, index: Option<usize>, precondition: bool) -> Transition {
        let mut transition = Transition::default();
        let nearby = point.is_nearby(&self.bb_now, &self.bb_last);

        if nearby && point.transition_enter(self.state, self.last, precondition) {
            debug!("Entered {}", point.name());
            transition.entered = true;
            self.events.enter_transition(point, index);
        }
        if nearby && point.transition_exit(self.state, self.last, &self.constraints, self.pev_ready) {
            debug!("Exited {}", point.name());
            transition.exited = true;
            if point.kind() == TaskPointKind::Start {
                point.clear_samples_all_but_last(&self.projection);
                transition.samples_changed = true;
            }
            self.events.exit_transition(point, index);
        }

        transition.samples_changed |= if nearby {
            point.update_sample_near(self.state, &self.projection)
        } else {
            point.update_sample_far(self.state)
        };
        transition
    }
}

impl OrderedTask {
    /// Scores zone transitions between `state_last` and `state` and
    /// advances the active point.
    ///
    /// Only the active point and its predecessor are tested, at the start
    /// also the optional starts. The active point advances at most once per
    /// call.
    ///
    /// # Returns
    /// `true` if the distance statistics need a full update.
    pub fn check_transitions(&mut self, state: &AircraftState, state_last: &AircraftState) -> bool {
        if self.geometry_dirty {
            self.update_geometry();
        }
        self.scan_active();
        if !state.flying || self.points.is_empty() {
            return false;
        }

        let events = Arc::clone(&self.events);
        let check = TransitionCheck {
            state,
            last: state_last,
            bb_now: FlatBoundingBox::around(self.projection.project_integer(&state.location), 1),
            bb_last: FlatBoundingBox::around(self.projection.project_integer(&state_last.location), 1),
            projection: self.projection,
            constraints: self.settings.start_constraints,
            pev_ready: self.stats.pev_based_advance_ready,
            events: events.as_ref(),
        };

        let last_finished = self.stats.task_finished;
        let last_start_time = self.stats.start.time;
        let n = self.points.len();
        let mut full_update = false;

        for i in self.active.saturating_sub(1)..=self.active.min(n - 1) {
            let mut transition = None;
            if i == 0 {
                transition = self.check_optional_starts(&check);
                full_update |= transition.is_some();
            }

            let transition = match transition {
                Some(t) => t,
                None => {
                    let precondition = i == 0
                        || self.points[i].kind() != TaskPointKind::Finish
                        || self.points[i - 1].has_entered()
                        || self.points[i - 1].has_exited();
                    let t = check.check(&mut self.points[i], Some(i), precondition);
                    if self.points[i].kind() == TaskPointKind::Start {
                        self.update_start_transition(state);
                    }
                    t
                }
            };
            full_update |= transition.samples_changed;

            if i != self.active {
                continue;
            }
            let last_request_armed = self.advance.need_to_arm();
            if self
                .advance
                .check_ready_to_advance(&self.points[i], state, transition.exited)
            {
                self.advance.set_armed(false);
                if i + 1 < n {
                    self.set_active_task_point(i + 1);
                    self.scan_active();
                    info!("Advanced to task point {} {}", i + 1, self.points[i + 1].name());
                    events.active_advanced(&self.points[i + 1], i + 1);
                    full_update = true;
                }
            } else if !last_request_armed && self.advance.need_to_arm() {
                debug!("Requesting to arm the advance at {}", self.points[i].name());
                events.request_arm(&self.points[i]);
            }
        }

        self.stats.need_to_arm = self.advance.need_to_arm();
        self.scan_active();
        self.stats.task_finished = self.has_finish() && self.points[n - 1].has_entered();

        let started = self
            .points
            .first()
            .filter(|p| p.kind() == TaskPointKind::Start)
            .and_then(|p| p.exited_state().map(|s| (*s, p.exited_by_pev())));
        if let Some((exited, by_pev)) = started {
            self.stats.start.set_started(&exited, by_pev);
            self.stats.pev_based_advance_ready = false;
            self.update_finish_height(Some(exited.altitude));
            if exited.time != last_start_time {
                info!("Task started at {:?} with {:.0} m", exited.time.to_naive_time(), exited.altitude);
                events.task_start();
            }
        }

        if self.stats.task_finished && !last_finished {
            info!("Task finished");
            events.task_finish();
        }
        full_update
    }

    /// Tests the optional starts and selects the first one that was entered
    /// or left. The pilot has no choice, the last start flown through is
    /// scored.
    fn check_optional_starts(&mut self, check: &TransitionCheck) -> Option<Transition> {
        let mut selected = None;
        for (k, start) in self.optional_starts.iter_mut().enumerate() {
            let transition = check.check(start, None, true);
            if transition.entered || transition.exited {
                selected = Some((k, transition));
                break;
            }
        }

        let (k, transition) = selected?;
        self.select_optional_start(k);
        Some(transition)
    }

    /// Keeps the start search point on the best boundary point while the
    /// start is active and forgets a start that was left without a valid
    /// exit.
    fn update_start_transition(&mut self, state: &AircraftState) {
        if self.active == 0 {
            if let Some(next) = self.points.get(1).map(|p| *p.location())
                && let Some(start) = self.points.first_mut()
            {
                start.find_best_start(state, &next);
            }
        } else if let Some(start) = self.points.first_mut()
            && !start.has_exited()
            && !start.is_in_sector(&state.location)
        {
            debug!("Forgetting start {} without valid exit", start.name());
            start.reset();
        }
    }

    /// Updates the statistics depending on the current sample only.
    pub fn update_sample(&mut self, state: &AircraftState) {
        self.stats.inside_oz = self
            .points
            .get(self.active)
            .is_some_and(|p| p.is_in_sector(&state.location));
    }
}
