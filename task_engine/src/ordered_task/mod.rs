// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! The ordered task aggregate.
//!
//! [`OrderedTask`] owns the point chain and the optional starts, derives the
//! projection and the statistics from them and drives the per fix update
//! cycle:
//!
//! 1. [`OrderedTask::check_transitions`] scores zone transitions and
//!    advances the active point,
//! 2. [`OrderedTask::update_sample`] updates the sample related statistics,
//! 3. [`OrderedTask::update_idle`] runs the expensive solvers.
//!
//! [`OrderedTask::update`] runs one complete cycle except for the idle part.
//!
//! Chain edits leave the geometry stale until [`OrderedTask::update_geometry`]
//! is called, the next update cycle does that automatically.

mod distance;
mod glide;
mod pev;
mod transitions;

use crate::advance::TaskAdvance;
use crate::events::{NullTaskEvents, TaskEvents};
use crate::factory::{FactoryConstraints, FactoryType, TaskValidationError};
use crate::point::{ActiveState, OrderedTaskPoint, TaskPointKind};
use crate::settings::{OrderedTaskSettings, TaskBehaviour};
use crate::waypoint::{WaypointPtr, WaypointStore};
use chrono::NaiveTime;
use common::aircraft::{AircraftState, TimeStamp};
use common::flat::TaskProjection;
use common::geo::GeoPoint;
use common::stats::TaskStats;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info};

pub struct OrderedTask {
    name: String,
    factory: FactoryType,
    settings: OrderedTaskSettings,
    behaviour: TaskBehaviour,

    points: Vec<OrderedTaskPoint>,
    optional_starts: Vec<OrderedTaskPoint>,
    active: usize,
    advance: TaskAdvance,

    projection: TaskProjection,
    stats: TaskStats,
    events: Arc<dyn TaskEvents>,

    /// Aircraft location of the last minimum distance search.
    last_min_location: GeoPoint,
    force_full_update: bool,
    geometry_dirty: bool,

    pev_received: bool,
    pev_receive_time: Option<NaiveTime>,
    last_state_time: TimeStamp,
}

impl std::fmt::Debug for OrderedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedTask")
            .field("name", &self.name)
            .field("factory", &self.factory)
            .field("points", &self.points.len())
            .field("optional_starts", &self.optional_starts.len())
            .field("active", &self.active)
            .finish()
    }
}

impl OrderedTask {
    pub fn new(behaviour: TaskBehaviour) -> Self {
        OrderedTask {
            name: String::new(),
            factory: behaviour.task_type_default,
            settings: behaviour.ordered_defaults,
            behaviour,
            points: Vec::new(),
            optional_starts: Vec::new(),
            active: 0,
            advance: TaskAdvance::default(),
            projection: TaskProjection::default(),
            stats: TaskStats::default(),
            events: Arc::new(NullTaskEvents),
            last_min_location: GeoPoint::invalid(),
            force_full_update: true,
            geometry_dirty: false,
            pev_received: false,
            pev_receive_time: None,
            last_state_time: TimeStamp::undefined(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_task_events(&mut self, events: Arc<dyn TaskEvents>) {
        self.events = events;
    }

    pub fn task_behaviour(&self) -> &TaskBehaviour {
        &self.behaviour
    }

    /// Replaces the engine configuration. Takes effect with the next update.
    pub fn set_task_behaviour(&mut self, behaviour: TaskBehaviour) {
        self.behaviour = behaviour;
        self.force_full_update = true;
    }

    pub fn ordered_task_settings(&self) -> &OrderedTaskSettings {
        &self.settings
    }

    pub fn set_ordered_task_settings(&mut self, settings: OrderedTaskSettings) {
        self.settings = settings;
        self.propagate_ordered_task_settings();
    }

    /// Refreshes the caches of the points derived from the task settings.
    fn propagate_ordered_task_settings(&mut self) {
        let started = self
            .points
            .first()
            .is_some_and(|p| p.active_state() == ActiveState::BeforeActive);
        let start_altitude = (started && self.stats.start.has_started()).then_some(self.stats.start.altitude);
        self.update_finish_height(start_altitude);
    }

    pub(crate) fn update_finish_height(&mut self, start_altitude: Option<f64>) {
        let height = self.settings.finish_constraints.finish_height(start_altitude);
        if self.points.len() > 1
            && let Some(finish) = self.points.last_mut()
            && finish.kind() == TaskPointKind::Finish
        {
            finish.set_min_altitude(height);
        }
    }

    pub fn factory_type(&self) -> FactoryType {
        self.factory
    }

    pub fn factory_constraints(&self) -> FactoryConstraints {
        self.factory.constraints()
    }

    /// All task types a task can be switched to.
    pub fn factory_types(&self) -> Vec<FactoryType> {
        FactoryType::iter().collect()
    }

    /// Switches the task type. A change resets all flight state.
    pub fn set_factory(&mut self, factory: FactoryType) {
        if self.factory == factory {
            return;
        }
        self.reset();
        self.factory = factory;
        self.propagate_ordered_task_settings();
    }

    pub fn is_scored(&self) -> bool {
        self.factory.is_scored()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= self.factory.constraints().max_points
    }

    pub fn check_task(&self) -> Vec<TaskValidationError> {
        self.factory.validate(&self.points)
    }

    pub fn points(&self) -> &[OrderedTaskPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&OrderedTaskPoint> {
        self.points.get(index)
    }

    pub fn optional_starts(&self) -> &[OrderedTaskPoint] {
        &self.optional_starts
    }

    pub fn task_size(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn has_start(&self) -> bool {
        self.points.first().is_some_and(|p| p.kind() == TaskPointKind::Start)
    }

    pub fn has_finish(&self) -> bool {
        self.points.len() > 1 && self.points.last().is_some_and(|p| p.kind() == TaskPointKind::Finish)
    }

    pub fn has_optional_starts(&self) -> bool {
        !self.optional_starts.is_empty()
    }

    pub fn has_targets(&self) -> bool {
        self.points.iter().any(|p| p.has_target())
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_point(&self) -> Option<&OrderedTaskPoint> {
        self.points.get(self.active)
    }

    /// `true` if `active + offset` is a valid point index.
    pub fn is_valid_task_point(&self, offset: isize) -> bool {
        self.active
            .checked_add_signed(offset)
            .is_some_and(|i| i < self.points.len())
    }

    /// Makes `index` the active point and disarms the advance.
    pub fn set_active_task_point(&mut self, index: usize) {
        if index >= self.points.len() || index == self.active {
            return;
        }
        self.advance.set_armed(false);
        self.active = index;
        self.force_full_update = true;
    }

    pub fn task_advance(&self) -> &TaskAdvance {
        &self.advance
    }

    pub fn task_advance_mut(&mut self) -> &mut TaskAdvance {
        &mut self.advance
    }

    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    pub fn projection(&self) -> &TaskProjection {
        &self.projection
    }

    /// Index of the last turn point between start and finish that was
    /// entered without a gap.
    pub fn last_intermediate_achieved(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            return 0;
        }
        (1..n - 1)
            .find(|i| !self.points[*i].has_entered())
            .map_or(n - 2, |i| i - 1)
    }

    /// `true` once the start was exited.
    pub fn task_started(&self) -> bool {
        self.points.first().is_some_and(|p| p.kind() == TaskPointKind::Start && p.has_exited())
    }

    /// Updates neighbours of `position`, for the first point also those of
    /// the optional starts.
    fn set_neighbours(&mut self, position: usize) {
        if position >= self.points.len() {
            return;
        }
        let previous = position
            .checked_sub(1)
            .map(|i| (i, *self.points[i].location()));
        let next = self.points.get(position + 1).map(|p| (position + 1, *p.location()));
        self.points[position].set_neighbours(previous, next);

        if position == 0 {
            for start in self.optional_starts.iter_mut() {
                start.set_neighbours(previous, next);
            }
        }
    }

    fn set_neighbours_from(&mut self, first: usize) {
        for i in first..self.points.len() {
            self.set_neighbours(i);
        }
    }

    /// Appends a copy of `point`.
    ///
    /// # Returns
    /// `false` if `point` may not follow the current last point.
    pub fn append(&mut self, point: &OrderedTaskPoint) -> bool {
        if let Some(last) = self.points.last()
            && (!point.allows_predecessor() || !last.allows_successor())
        {
            debug!("Rejected appending {} after {}", point.kind(), last.kind());
            return false;
        }

        self.points.push(point.clone_point(None));
        let i = self.points.len() - 1;
        if i > 0 {
            self.set_neighbours(i - 1);
        } else {
            self.last_min_location = *point.location();
        }
        self.set_neighbours(i);
        self.geometry_dirty = true;
        true
    }

    /// Inserts a copy of `point` before `position`, appends for a position
    /// past the end.
    pub fn insert(&mut self, point: &OrderedTaskPoint, position: usize) -> bool {
        if position >= self.points.len() {
            return self.append(point);
        }

        if (position > 0 && !point.allows_predecessor())
            || !point.allows_successor()
            || (position > 0 && !self.points[position - 1].allows_successor())
            || !self.points[position].allows_predecessor()
        {
            debug!("Rejected inserting {} at {}", point.kind(), position);
            return false;
        }

        if self.active >= position {
            self.active += 1;
        }
        self.points.insert(position, point.clone_point(None));
        self.set_neighbours_from(position.saturating_sub(1));
        self.geometry_dirty = true;
        true
    }

    /// Replaces the point at `position` by a copy of `point`. Replacing a
    /// point by an equal one keeps its flight state.
    pub fn replace(&mut self, point: &OrderedTaskPoint, position: usize) -> bool {
        if position >= self.points.len() {
            return false;
        }
        if self.points[position].equals(point) {
            return true;
        }
        if (position > 0 && !point.allows_predecessor())
            || (position + 1 < self.points.len() && !point.allows_successor())
        {
            debug!("Rejected replacing point {} by {}", position, point.kind());
            return false;
        }

        self.points[position] = point.clone_point(None);
        if position > 0 {
            self.set_neighbours(position - 1);
        }
        self.set_neighbours(position);
        self.set_neighbours(position + 1);
        self.geometry_dirty = true;
        true
    }

    /// Removes the point at `position`.
    pub fn remove(&mut self, position: usize) -> bool {
        if position >= self.points.len() {
            return false;
        }

        if self.active > position || (self.active > 0 && self.active == self.points.len() - 1) {
            self.active -= 1;
        }
        self.points.remove(position);
        self.set_neighbours_from(position.saturating_sub(1));
        self.geometry_dirty = true;
        true
    }

    pub fn append_optional_start(&mut self, point: &OrderedTaskPoint) -> bool {
        self.optional_starts.push(point.clone_point(None));
        if self.points.len() > 1 {
            self.set_neighbours(0);
        }
        self.geometry_dirty = true;
        true
    }

    pub fn replace_optional_start(&mut self, point: &OrderedTaskPoint, position: usize) -> bool {
        if position >= self.optional_starts.len() {
            return false;
        }
        if self.optional_starts[position].equals(point) {
            return true;
        }
        self.optional_starts[position] = point.clone_point(None);
        self.set_neighbours(0);
        self.geometry_dirty = true;
        true
    }

    pub fn remove_optional_start(&mut self, position: usize) -> bool {
        if position >= self.optional_starts.len() {
            return false;
        }
        self.optional_starts.remove(position);
        if self.points.len() > 1 {
            self.set_neighbours(0);
        }
        self.geometry_dirty = true;
        true
    }

    /// Makes optional start `position` the start of the task. The former
    /// start moves to the end of the optional starts.
    pub fn select_optional_start(&mut self, position: usize) {
        if position >= self.optional_starts.len() || self.points.is_empty() {
            return;
        }

        let selected = self.optional_starts.remove(position);
        let former = std::mem::replace(&mut self.points[0], selected);
        self.optional_starts.push(former);

        self.set_neighbours(0);
        self.set_neighbours(1);
        info!("Selected optional start {}", self.points[0].name());
        self.update_geometry();
    }

    /// Cycles through the optional starts.
    pub fn rotate_optional_starts(&mut self) {
        if self.points.is_empty() || self.optional_starts.is_empty() {
            return;
        }
        self.select_optional_start(0);
    }

    /// Moves the point at `position` to another waypoint, keeping its kind
    /// and zone.
    pub fn relocate(&mut self, position: usize, waypoint: WaypointPtr) -> bool {
        let Some(point) = self.points.get(position) else {
            return false;
        };
        let relocated = point.clone_point(Some(waypoint));
        self.replace(&relocated, position)
    }

    pub fn relocate_optional_start(&mut self, position: usize, waypoint: WaypointPtr) -> bool {
        let Some(point) = self.optional_starts.get(position) else {
            return false;
        };
        self.optional_starts[position] = point.clone_point(Some(waypoint));
        self.set_neighbours(0);
        self.geometry_dirty = true;
        true
    }

    /// Substitutes the waypoints of all points by the matching instances
    /// of `store`, adding missing ones to it.
    pub fn check_duplicate_waypoints(&mut self, store: &mut dyn WaypointStore) {
        for point in self.points.iter_mut().chain(self.optional_starts.iter_mut()) {
            let waypoint = store.check_exists_or_append(point.waypoint());
            if !Arc::ptr_eq(&waypoint, point.waypoint()) {
                point.set_waypoint(waypoint);
            }
        }
    }

    /// Removes all points.
    pub fn remove_all_points(&mut self) {
        self.points.clear();
        self.optional_starts.clear();
        self.active = 0;
        self.force_full_update = true;
        self.geometry_dirty = true;
    }

    /// Removes all points and returns to the default settings.
    pub fn clear(&mut self) {
        self.remove_all_points();
        self.name.clear();
        self.reset();
        self.settings = self.behaviour.ordered_defaults;
    }

    /// Forgets all flight state and returns to the first point.
    pub fn reset(&mut self) {
        for point in self.points.iter_mut().chain(self.optional_starts.iter_mut()) {
            point.reset();
        }
        self.stats.task_finished = false;
        self.stats.start.reset();
        self.stats.pev_based_advance_ready = false;
        self.advance.reset();
        self.set_active_task_point(0);
        self.update_stats_geometry();
        self.update_finish_height(None);
    }

    /// Updates the active state of all points.
    fn scan_active(&mut self) {
        let active = self.active;
        for (i, point) in self.points.iter_mut().enumerate() {
            let state = match i.cmp(&active) {
                std::cmp::Ordering::Less => ActiveState::BeforeActive,
                std::cmp::Ordering::Equal => ActiveState::CurrentActive,
                std::cmp::Ordering::Greater => ActiveState::AfterActive,
            };
            point.set_active_state(state);
        }
        let start_state = self.points.first().map_or(ActiveState::NotFound, |p| p.active_state());
        for start in self.optional_starts.iter_mut() {
            start.set_active_state(start_state);
        }
    }

    fn update_stats_geometry(&mut self) {
        let mut bounds = common::geo::GeoBounds::invalid();
        for point in self.points.iter().chain(self.optional_starts.iter()) {
            bounds.extend(point.location());
        }
        self.stats.bounds = bounds;

        self.stats.task_valid = self.check_task().is_empty();
        self.stats.has_targets = self.stats.task_valid && self.has_targets();
        self.stats.is_mat = self.factory == FactoryType::Mat;
        self.stats.has_optional_starts = self.stats.task_valid && self.has_optional_starts();
    }

    /// Recomputes everything derived from the point geometry: bounds,
    /// projection, zone outlines and the distance statistics before the
    /// flight.
    pub fn update_geometry(&mut self) {
        self.geometry_dirty = false;
        self.update_stats_geometry();
        if self.points.is_empty() {
            return;
        }

        self.scan_active();
        self.projection = TaskProjection::new(&self.stats.bounds);
        let projection = self.projection;
        for point in self.points.iter_mut().chain(self.optional_starts.iter_mut()) {
            point.update_oz(&projection);
        }
        self.propagate_ordered_task_settings();

        if !self.points[0].has_entered() {
            self.update_stats_distances(&GeoPoint::invalid(), true);
        }
        self.force_full_update = true;
    }

    /// Creates an unflown copy of this task with its own points.
    pub fn clone_task(&self, behaviour: TaskBehaviour) -> OrderedTask {
        let mut task = OrderedTask::new(behaviour);
        task.set_factory(self.factory);
        task.settings = self.settings;

        for point in self.points.iter() {
            task.append(point);
        }
        for point in self.optional_starts.iter() {
            task.append_optional_start(point);
        }

        task.active = self.active;
        task.update_geometry();
        task.set_name(&self.name);
        task
    }

    /// Makes this task equal to `other` with the smallest change.
    ///
    /// Points that are equal in both tasks keep their flight state.
    ///
    /// # Returns
    /// `true` if any point was changed.
    pub fn commit(&mut self, other: &OrderedTask) -> bool {
        let mut modified = false;

        self.set_name(other.name());
        self.set_factory(other.factory);
        self.set_ordered_task_settings(other.settings);

        while self.points.len() > other.points.len() {
            self.remove(self.points.len() - 1);
            modified = true;
        }
        for (i, point) in other.points.iter().enumerate() {
            if i >= self.points.len() {
                self.append(point);
                modified = true;
            } else if !self.points[i].equals(point) {
                self.replace(point, i);
                modified = true;
            }
        }

        while self.optional_starts.len() > other.optional_starts.len() {
            self.remove_optional_start(self.optional_starts.len() - 1);
            modified = true;
        }
        for (i, point) in other.optional_starts.iter().enumerate() {
            if i >= self.optional_starts.len() {
                self.append_optional_start(point);
                modified = true;
            } else if !self.optional_starts[i].equals(point) {
                self.replace_optional_start(point, i);
                modified = true;
            }
        }

        if modified {
            info!("Committed task {} with {} points", self.name, self.points.len());
            self.update_geometry();
        }
        modified
    }

    /// Runs one update cycle for a new fix.
    ///
    /// # Returns
    /// `true` if a full update of the distance statistics was done.
    pub fn update(&mut self, state: &AircraftState, state_last: &AircraftState, polar: &common::glide::GlidePolar) -> bool {
        if self.geometry_dirty {
            self.update_geometry();
        }
        if self.pev_received
            && let Some(time) = self.pev_receive_time
        {
            self.update_after_pev(state, time);
        }

        self.stats.active_index = self.active;
        let full_update = self.check_transitions(state, state_last) || self.force_full_update;
        self.stats.active_index = self.active;

        self.update_stats_times(state);
        if state.location.is_valid() {
            self.update_stats_distances(&state.location, full_update);
            self.update_glide_solutions(state, polar);
            self.update_sample(state);
        }

        self.last_state_time = state.time;
        self.force_full_update = false;
        full_update
    }
}
