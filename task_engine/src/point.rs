// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Ordered task points.
//!
//! A task point combines a waypoint with an observation zone and carries
//! the per flight state of that point: entry and exit, in-zone samples and
//! the solutions of the path searches.

use crate::settings::StartConstraints;
use crate::waypoint::WaypointPtr;
use crate::zone::ObservationZone;
use common::aircraft::AircraftState;
use common::flat::{FlatBoundingBox, TaskProjection};
use common::geo::{GeoPoint, bearing_difference, normalize_bearing};
use common::search_point::{SearchPoint, SearchPointVector, hull_contains, project_all, prune_interior};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::{Display, EnumIter};

/// Minimum distance in meters at which an area target counts as reached.
const TARGET_REACHED_MIN: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPointKind {
    Start,
    Intermediate,
    /// Turn point of an assigned area task, carries a movable target.
    Aat,
    Finish,
}

impl TaskPointKind {
    /// `false` if a point of this kind must not follow another point.
    pub fn allows_predecessor(&self) -> bool {
        *self != TaskPointKind::Start
    }

    /// `false` if a point of this kind must not be followed by another point.
    pub fn allows_successor(&self) -> bool {
        *self != TaskPointKind::Finish
    }

    pub fn is_intermediate(&self) -> bool {
        matches!(self, TaskPointKind::Intermediate | TaskPointKind::Aat)
    }
}

/// Position of a point relative to the active task point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveState {
    #[default]
    NotFound,
    BeforeActive,
    CurrentActive,
    AfterActive,
}

/// Chain indices of the adjacent points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbours {
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct OrderedTaskPoint {
    kind: TaskPointKind,
    waypoint: WaypointPtr,
    zone: ObservationZone,

    neighbours: Neighbours,
    previous_location: Option<GeoPoint>,
    next_location: Option<GeoPoint>,
    axis: f64,
    active_state: ActiveState,

    entered_state: Option<AircraftState>,
    exited_state: Option<AircraftState>,
    /// The scored exit was released by a pilot event.
    exited_by_pev: bool,
    /// Minimum altitude to be inside a finish zone.
    min_altitude: f64,

    sampled: SearchPointVector,
    boundary: SearchPointVector,
    nominal: SearchPoint,
    search_min: SearchPoint,
    search_max: SearchPoint,
    search_max_total: SearchPoint,
    flat_bb: FlatBoundingBox,

    target: GeoPoint,
    target_locked: bool,
}

impl OrderedTaskPoint {
    pub fn new(kind: TaskPointKind, waypoint: WaypointPtr, zone: ObservationZone) -> Self {
        let location = waypoint.location;
        let nominal = SearchPoint::new(location, &TaskProjection::default());
        OrderedTaskPoint {
            kind,
            waypoint,
            zone,
            neighbours: Neighbours::default(),
            previous_location: None,
            next_location: None,
            axis: 0.0,
            active_state: ActiveState::NotFound,
            entered_state: None,
            exited_state: None,
            exited_by_pev: false,
            min_altitude: 0.0,
            sampled: Vec::new(),
            boundary: Vec::new(),
            nominal,
            search_min: nominal,
            search_max: nominal,
            search_max_total: nominal,
            flat_bb: FlatBoundingBox::around(*nominal.flat(), 0),
            target: location,
            target_locked: false,
        }
    }

    /// Creates an unflown copy of this point, optionally at another waypoint.
    pub fn clone_point(&self, waypoint: Option<WaypointPtr>) -> Self {
        let waypoint = waypoint.unwrap_or_else(|| Arc::clone(&self.waypoint));
        let same_place = waypoint.location == self.waypoint.location;
        let mut point = OrderedTaskPoint::new(self.kind, waypoint, self.zone);
        if same_place {
            point.target = self.target;
            point.target_locked = self.target_locked;
        }
        point
    }

    /// Structural equality: same kind, zone and waypoint.
    pub fn equals(&self, other: &OrderedTaskPoint) -> bool {
        self.kind == other.kind && self.zone == other.zone && *self.waypoint == *other.waypoint
    }

    pub fn kind(&self) -> TaskPointKind {
        self.kind
    }

    pub fn waypoint(&self) -> &WaypointPtr {
        &self.waypoint
    }

    pub(crate) fn set_waypoint(&mut self, waypoint: WaypointPtr) {
        self.waypoint = waypoint;
    }

    pub fn name(&self) -> &str {
        &self.waypoint.name
    }

    pub fn location(&self) -> &GeoPoint {
        &self.waypoint.location
    }

    pub fn elevation(&self) -> f64 {
        self.waypoint.elevation
    }

    pub fn zone(&self) -> &ObservationZone {
        &self.zone
    }

    pub fn allows_predecessor(&self) -> bool {
        self.kind.allows_predecessor()
    }

    pub fn allows_successor(&self) -> bool {
        self.kind.allows_successor()
    }

    pub fn neighbours(&self) -> Neighbours {
        self.neighbours
    }

    /// Sets the adjacent points as `(index, location)` and reorients the zone.
    pub fn set_neighbours(&mut self, previous: Option<(usize, GeoPoint)>, next: Option<(usize, GeoPoint)>) {
        self.neighbours = Neighbours {
            previous: previous.map(|(i, _)| i),
            next: next.map(|(i, _)| i),
        };
        self.previous_location = previous.map(|(_, l)| l);
        self.next_location = next.map(|(_, l)| l);
        self.axis = self.compute_axis();
    }

    pub fn previous_location(&self) -> Option<&GeoPoint> {
        self.previous_location.as_ref()
    }

    pub fn next_location(&self) -> Option<&GeoPoint> {
        self.next_location.as_ref()
    }

    /// Bearing the zone opens towards.
    pub fn axis(&self) -> f64 {
        self.axis
    }

    fn compute_axis(&self) -> f64 {
        let center = self.location();
        match (&self.previous_location, &self.next_location) {
            (Some(previous), Some(next)) => {
                let inbound = center.bearing(previous);
                let outbound = center.bearing(next);
                normalize_bearing(inbound + 0.5 * bearing_difference(inbound, outbound) + 180.0)
            }
            (None, Some(other)) | (Some(other), None) => normalize_bearing(center.bearing(other) + 180.0),
            (None, None) => 0.0,
        }
    }

    pub fn active_state(&self) -> ActiveState {
        self.active_state
    }

    pub(crate) fn set_active_state(&mut self, state: ActiveState) {
        self.active_state = state;
    }

    /// Rebuilds all projected geometry after the projection or the
    /// neighbours changed.
    pub fn update_oz(&mut self, projection: &TaskProjection) {
        self.boundary = self
            .zone
            .boundary(self.location(), self.axis)
            .into_iter()
            .map(|p| SearchPoint::new(p, projection))
            .collect();
        self.nominal = SearchPoint::new(*self.location(), projection);
        project_all(&mut self.sampled, projection);
        self.search_min.project(projection);
        self.search_max.project(projection);
        self.search_max_total.project(projection);

        let flats = self.boundary.iter().chain(std::iter::once(&self.nominal)).map(|p| p.flat());
        if let Some(mut bb) = FlatBoundingBox::from_points(flats) {
            bb.grow(1);
            self.flat_bb = bb;
        }
    }

    pub fn flat_bounding_box(&self) -> &FlatBoundingBox {
        &self.flat_bb
    }

    /// Cheap test whether either fix may be close to the zone.
    pub fn is_nearby(&self, bb_now: &FlatBoundingBox, bb_last: &FlatBoundingBox) -> bool {
        self.flat_bb.overlaps(bb_now) || self.flat_bb.overlaps(bb_last)
    }

    pub fn is_in_sector(&self, location: &GeoPoint) -> bool {
        self.zone.is_inside(self.location(), self.axis, location)
    }

    /// Zone test including the finish height of a finish point.
    pub fn is_inside(&self, state: &AircraftState) -> bool {
        if !self.is_in_sector(&state.location) {
            return false;
        }
        self.kind != TaskPointKind::Finish || state.altitude >= self.min_altitude
    }

    pub fn min_altitude(&self) -> f64 {
        self.min_altitude
    }

    pub(crate) fn set_min_altitude(&mut self, altitude: f64) {
        self.min_altitude = altitude;
    }

    /// Tests for a zone entry between `last` and `now` and scores it.
    ///
    /// # Parameters
    /// - `precondition`: Whether the entry may be scored, e.g. a finish
    ///   requires the previous point to be entered.
    ///
    /// # Returns
    /// `true` if the zone was entered, even if the entry was not scored.
    pub fn transition_enter(&mut self, now: &AircraftState, last: &AircraftState, precondition: bool) -> bool {
        let entered = self.is_inside(now)
            && !self.is_inside(last)
            && self.zone.transition_constraint(self.location(), now, last);
        if entered && precondition && (self.kind == TaskPointKind::Start || self.entered_state.is_none()) {
            self.entered_state = Some(*now);
        }
        entered
    }

    /// Tests for a zone exit between `last` and `now` and scores it.
    ///
    /// A start exit only counts if the start gate was open at `last` and,
    /// unless the start was released by a pilot event, speed and height at
    /// `last` are within the constraints. The start keeps the last valid
    /// exit, all other points the first one.
    ///
    /// # Returns
    /// `true` if the zone was left, for a start only with a valid exit.
    pub fn transition_exit(
        &mut self,
        now: &AircraftState,
        last: &AircraftState,
        constraints: &StartConstraints,
        pev_ready: bool,
    ) -> bool {
        let exited = !self.is_inside(now)
            && self.is_inside(last)
            && self.zone.transition_constraint(self.location(), now, last);
        if !exited {
            return false;
        }

        match self.kind {
            TaskPointKind::Start => {
                let valid = constraints.open_time_span.has_begun(last.time)
                    && (pev_ready || (constraints.check_speed(last) && constraints.check_height(last)));
                if !valid {
                    return false;
                }
                self.exited_state = Some(*last);
                self.exited_by_pev = pev_ready;
            }
            _ => {
                if self.exited_state.is_none() {
                    self.exited_state = Some(*last);
                }
            }
        }
        true
    }

    pub fn has_entered(&self) -> bool {
        self.entered_state.is_some()
    }

    pub fn has_exited(&self) -> bool {
        self.exited_state.is_some()
    }

    pub fn exited_by_pev(&self) -> bool {
        self.exited_by_pev
    }

    pub fn entered_state(&self) -> Option<&AircraftState> {
        self.entered_state.as_ref()
    }

    pub fn exited_state(&self) -> Option<&AircraftState> {
        self.exited_state.as_ref()
    }

    /// Records an in-zone fix. Samples are kept as their convex hull.
    ///
    /// Returns `true` if the samples changed.
    pub fn update_sample_near(&mut self, state: &AircraftState, projection: &TaskProjection) -> bool {
        if !self.is_in_sector(&state.location) {
            return false;
        }
        let sample = SearchPoint::new(state.location, projection);
        if hull_contains(&self.sampled, sample.flat()) {
            return false;
        }
        self.sampled.push(sample);
        prune_interior(&mut self.sampled);
        true
    }

    /// Drops every sample of a start except the fix the start was left
    /// from, so a restart forgets the zone parts of earlier attempts.
    pub fn clear_samples_all_but_last(&mut self, projection: &TaskProjection) {
        if let Some(exit) = self.exited_state {
            self.sampled = vec![SearchPoint::new(exit.location, projection)];
        }
    }

    /// Far away fixes never change the samples.
    pub fn update_sample_far(&mut self, _state: &AircraftState) -> bool {
        false
    }

    pub fn has_sampled(&self) -> bool {
        !self.sampled.is_empty()
    }

    pub fn sampled_points(&self) -> &[SearchPoint] {
        &self.sampled
    }

    pub fn boundary_points(&self) -> &[SearchPoint] {
        &self.boundary
    }

    pub fn nominal_point(&self) -> &SearchPoint {
        &self.nominal
    }

    /// Candidate points of the path searches: the samples once there are
    /// any, the zone boundary before.
    pub fn search_points(&self) -> &[SearchPoint] {
        if self.sampled.is_empty() {
            &self.boundary
        } else {
            &self.sampled
        }
    }

    pub fn search_min(&self) -> &SearchPoint {
        &self.search_min
    }

    pub fn set_search_min(&mut self, point: SearchPoint) {
        self.search_min = point;
    }

    pub fn search_max(&self) -> &SearchPoint {
        &self.search_max
    }

    pub fn set_search_max(&mut self, point: SearchPoint) {
        self.search_max = point;
    }

    pub fn search_max_total(&self) -> &SearchPoint {
        &self.search_max_total
    }

    pub fn set_search_max_total(&mut self, point: SearchPoint) {
        self.search_max_total = point;
    }

    /// Picks the start boundary point with the shortest way from the
    /// aircraft to `next`.
    pub fn find_best_start(&mut self, state: &AircraftState, next: &GeoPoint) {
        let cost = |p: &SearchPoint| state.location.distance(p.location()) + p.location().distance(next);
        if let Some(best) = self.boundary.iter().min_by(|a, b| cost(a).total_cmp(&cost(b))) {
            self.search_min = *best;
        }
    }

    /// Location used for the remaining distance.
    pub fn location_remaining(&self) -> &GeoPoint {
        if self.kind == TaskPointKind::Aat && self.active_state != ActiveState::BeforeActive {
            &self.target
        } else {
            self.search_min.location()
        }
    }

    /// Location used for the planned distance.
    pub fn location_planned(&self) -> &GeoPoint {
        if self.kind == TaskPointKind::Aat {
            &self.target
        } else {
            self.location()
        }
    }

    pub fn has_target(&self) -> bool {
        self.kind == TaskPointKind::Aat
    }

    pub fn target(&self) -> &GeoPoint {
        &self.target
    }

    pub fn is_target_locked(&self) -> bool {
        self.target_locked
    }

    pub fn set_target_locked(&mut self, locked: bool) {
        self.target_locked = locked;
    }

    /// Moves the target of an area point. Only locations inside the zone
    /// are accepted.
    pub fn set_target(&mut self, location: GeoPoint) -> bool {
        if !self.has_target() || self.target_locked || !self.is_in_sector(&location) {
            return false;
        }
        self.target = location;
        true
    }

    /// Moves the target to fraction `p` between the minimum and maximum
    /// distance solutions.
    ///
    /// The target of the current point is only moved before it was entered,
    /// unless `force_current` is set. Points behind the active one are
    /// never moved.
    pub fn set_range(&mut self, p: f64, force_current: bool) -> bool {
        if !self.has_target() || self.target_locked {
            return false;
        }
        let allowed = match self.active_state {
            ActiveState::CurrentActive => !self.has_entered() || force_current,
            ActiveState::AfterActive => true,
            _ => false,
        };
        if !allowed {
            return false;
        }
        self.target = self
            .search_min
            .location()
            .interpolate(self.search_max.location(), p.clamp(0.0, 1.0));
        true
    }

    pub(crate) fn set_target_unchecked(&mut self, location: GeoPoint) {
        self.target = location;
    }

    /// `true` if the aircraft is close enough to the target of an area
    /// point to continue with the next leg.
    pub fn is_close_to_target(&self, state: &AircraftState) -> bool {
        if !self.has_target() {
            return false;
        }
        let threshold = TARGET_REACHED_MIN.max(0.1 * self.zone.radius());
        state.location.distance(&self.target) <= threshold
    }

    /// Forgets all flight state.
    pub fn reset(&mut self) {
        self.entered_state = None;
        self.exited_state = None;
        self.exited_by_pev = false;
        self.sampled.clear();
        self.search_min = self.nominal;
        self.search_max = self.nominal;
        self.search_max_total = self.nominal;
        self.target_locked = false;
    }
}
