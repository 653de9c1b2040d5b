// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::OrderedTask;
use crate::point::{OrderedTaskPoint, TaskPointKind};
use algorithm::{DijkstraSolution, TaskDijkstraMax, TaskDijkstraMin};
use common::flat::TaskProjection;
use common::geo::GeoPoint;
use common::search_point::SearchPoint;
use std::slice;

/// Sum of the leg distances between consecutive locations.
fn chain_distance<'a>(locations: impl Iterator<Item = &'a GeoPoint>) -> f64 {
    let mut distance = 0.0;
    let mut previous: Option<&GeoPoint> = None;
    for location in locations {
        if let Some(p) = previous {
            distance += p.distance(location);
        }
        previous = Some(location);
    }
    distance
}

/// Radius of a start or finish cylinder that is measured from its edge.
fn subtracted_radius(point: &OrderedTaskPoint, subtract: bool) -> Option<f64> {
    if !subtract || !matches!(point.kind(), TaskPointKind::Start | TaskPointKind::Finish) {
        return None;
    }
    point.zone().cylinder_radius().filter(|r| *r > 0.0)
}

/// Moves the solution of a cylinder layer from the center onto the edge,
/// towards the solution of the adjacent layer.
fn project_to_edge(
    center: &SearchPoint,
    radius: f64,
    neighbour: &SearchPoint,
    projection: &TaskProjection,
) -> SearchPoint {
    let distance = center.location().distance(neighbour.location());
    if radius >= distance {
        return *center;
    }
    SearchPoint::new(center.location().intermediate_point(neighbour.location(), radius), projection)
}

/// Replaces the centers chosen for edge measured cylinders by their edge
/// points. `first` is the chain index of layer 0, `previous` the solution
/// of the point before it.
fn project_cylinders(
    solution: &mut DijkstraSolution,
    projected: &[Option<f64>],
    first: usize,
    previous: Option<&SearchPoint>,
    projection: &TaskProjection,
) {
    let n = solution.points.len();
    for k in 0..n {
        let Some(radius) = projected[k] else {
            continue;
        };
        let neighbour = if first + k == 0 {
            solution.points.get(k + 1).copied()
        } else if k > 0 {
            Some(solution.points[k - 1])
        } else {
            previous.copied()
        };
        if let Some(neighbour) = neighbour {
            solution.points[k] = project_to_edge(&solution.points[k], radius, &neighbour, projection);
        }
    }
}

impl OrderedTask {
    /// Shortest path from `location` over the remaining points, stored as
    /// the minimum search points. Without a valid location the path starts
    /// at the active point.
    pub(crate) fn run_dijkstra_min(&mut self, location: &GeoPoint) -> bool {
        let n = self.points.len();
        if n < 2 || self.active >= n {
            return false;
        }

        let origin = location.is_valid().then(|| SearchPoint::new(*location, &self.projection));
        let subtract = self.behaviour.subtract_start_finish_cylinder_radius;

        let mut layers: Vec<&[SearchPoint]> = Vec::with_capacity(n - self.active);
        let mut projected = Vec::with_capacity(n - self.active);
        for (i, point) in self.points.iter().enumerate().skip(self.active) {
            let radius = subtracted_radius(point, subtract).filter(|_| i != 0 || origin.is_none());
            if radius.is_some() {
                layers.push(slice::from_ref(point.nominal_point()));
            } else {
                layers.push(point.search_points());
            }
            projected.push(radius);
        }

        let Some(mut solution) = TaskDijkstraMin::new().solve(&layers, origin.as_ref()) else {
            return false;
        };
        // The distance is summed over the point solutions, so an active
        // cylinder is left towards the previous point, not the aircraft.
        let previous = self.active.checked_sub(1).map(|i| *self.points[i].search_min());
        project_cylinders(&mut solution, &projected, self.active, previous.as_ref(), &self.projection);

        for (point, best) in self.points[self.active..].iter_mut().zip(solution.points) {
            point.set_search_min(best);
        }
        true
    }

    /// Longest path over the whole task.
    ///
    /// The active point may still be left anywhere, so it is searched over
    /// its full boundary. Passed points are searched over their samples,
    /// unless `ignore_sampled` is set.
    pub(crate) fn run_dijkstra_max(&self, ignore_sampled: bool) -> Option<DijkstraSolution> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let subtract = self.behaviour.subtract_start_finish_cylinder_radius;

        let mut layers: Vec<&[SearchPoint]> = Vec::with_capacity(n);
        let mut projected = Vec::with_capacity(n);
        for (i, point) in self.points.iter().enumerate() {
            let radius = subtracted_radius(point, subtract);
            if radius.is_some() {
                layers.push(slice::from_ref(point.nominal_point()));
            } else if i == self.active || ignore_sampled {
                layers.push(point.boundary_points());
            } else {
                layers.push(point.search_points());
            }
            projected.push(radius);
        }

        let mut solution = TaskDijkstraMax::new().solve(&layers, None)?;
        project_cylinders(&mut solution, &projected, 0, None, &self.projection);
        Some(solution)
    }

    /// Minimum achievable task distance flying on from `location`.
    ///
    /// The search is repeated only on a full update or when the aircraft
    /// moved significantly relative to its distance to the active point.
    pub(crate) fn scan_distance_min(&mut self, location: &GeoPoint, full: bool) -> f64 {
        if full || self.is_min_search_due(location) {
            self.run_dijkstra_min(location);
            self.last_min_location = *location;
        }
        chain_distance(self.points.iter().map(|p| p.search_min().location()))
    }

    fn is_min_search_due(&self, location: &GeoPoint) -> bool {
        if !location.is_valid() || !self.last_min_location.is_valid() {
            return true;
        }
        let now = self.projection.project_integer(location);
        let last = self.projection.project_integer(&self.last_min_location);
        if now.square_distance_to(&last) <= 1 {
            return false;
        }
        let Some(active) = self.points.get(self.active) else {
            return false;
        };
        self.behaviour.significance.is_significant(
            self.last_min_location.distance(active.location()),
            location.distance(active.location()),
        )
    }

    /// Maximum achievable task distance. Passed points with samples take
    /// their maximum solution as achieved minimum.
    pub(crate) fn scan_distance_max(&mut self) -> f64 {
        if let Some(solution) = self.run_dijkstra_max(false) {
            let active = self.active;
            for (i, (point, best)) in self.points.iter_mut().zip(solution.points).enumerate() {
                point.set_search_max(best);
                if i <= active && point.has_sampled() {
                    point.set_search_min(best);
                }
            }
        }
        chain_distance(self.points.iter().map(|p| p.search_max().location()))
    }

    /// Maximum task distance over the full zone boundaries.
    pub(crate) fn scan_distance_max_total(&mut self) -> f64 {
        if let Some(solution) = self.run_dijkstra_max(true) {
            for (point, best) in self.points.iter_mut().zip(solution.points) {
                point.set_search_max_total(best);
            }
        }
        chain_distance(self.points.iter().map(|p| p.search_max_total().location()))
    }

    /// Task distance over the point centers, start and finish cylinders
    /// measured from their edge.
    pub fn scan_distance_nominal(&self) -> f64 {
        let mut distance = chain_distance(self.points.iter().map(|p| p.location()));
        let subtract = self.behaviour.subtract_start_finish_cylinder_radius;
        if let [first, second, ..] = self.points.as_slice()
            && let Some(radius) = subtracted_radius(first, subtract)
            && radius < first.location().distance(second.location())
        {
            distance -= radius;
        }
        if let [.., previous, last] = self.points.as_slice()
            && let Some(radius) = subtracted_radius(last, subtract)
            && radius < last.location().distance(previous.location())
        {
            distance -= radius;
        }
        distance
    }

    /// Distance over the planned locations, i.e. area targets.
    pub fn scan_distance_planned(&self) -> f64 {
        chain_distance(self.points.iter().map(|p| p.location_planned()))
    }

    /// Distance from `location` over the remaining points.
    pub fn scan_distance_remaining(&self, location: &GeoPoint) -> f64 {
        let Some(active) = self.points.get(self.active) else {
            return 0.0;
        };
        let legs = chain_distance(self.points[self.active..].iter().map(|p| p.location_remaining()));
        if location.is_valid() {
            legs + location.distance(active.location_remaining())
        } else {
            legs
        }
    }

    /// Distance achieved so far: the maximum solution of the passed points
    /// followed by the leg to `location`.
    pub fn scan_distance_travelled(&self, location: &GeoPoint) -> f64 {
        if self.active == 0 || self.active > self.points.len() {
            return 0.0;
        }
        let passed = &self.points[..self.active];
        let mut distance = chain_distance(passed.iter().map(|p| p.search_max().location()));
        if location.is_valid()
            && let Some(last) = passed.last()
        {
            distance += last.search_max().location().distance(location);
        }
        distance
    }

    /// Scored distance: achieved points plus the progress made on the
    /// active leg.
    pub fn scan_distance_scored(&self, location: &GeoPoint) -> f64 {
        if self.active == 0 || self.active >= self.points.len() {
            return 0.0;
        }
        let passed = &self.points[..self.active];
        let distance = chain_distance(passed.iter().map(|p| p.search_max().location()));
        let Some(previous) = passed.last() else {
            return distance;
        };
        if !location.is_valid() {
            return distance;
        }

        let next = self.points[self.active].location_remaining();
        let leg = previous.search_max().location().distance(next);
        distance + (leg - location.distance(next)).max(0.0)
    }

    /// Refreshes all distance statistics.
    ///
    /// # Parameters
    /// - `location`: Aircraft location, invalid before the flight.
    /// - `full`: Repeat the expensive maximum searches.
    pub(crate) fn update_stats_distances(&mut self, location: &GeoPoint, full: bool) {
        // The maximum search fixes the minimum of the passed points, so it
        // has to run first.
        if full {
            self.stats.distance_max = self.scan_distance_max();
            self.stats.distance_max_total = self.scan_distance_max_total();
        }
        self.stats.distance_min = self.scan_distance_min(location, full);
        self.stats.distance_nominal = self.scan_distance_nominal();

        self.stats.total.remaining = self.scan_distance_remaining(location);
        self.stats.total.travelled = self.scan_distance_travelled(location);
        self.stats.total.planned = self.scan_distance_planned();
        self.stats.distance_scored = if self.is_scored() {
            self.scan_distance_scored(location)
        } else {
            0.0
        };

        let leg = &mut self.stats.current_leg;
        leg.remaining = match self.points.get(self.active) {
            Some(active) if location.is_valid() => location.distance(active.location_remaining()),
            _ => 0.0,
        };
        leg.travelled = match self.active.checked_sub(1).and_then(|i| self.points.get(i)) {
            Some(previous) if location.is_valid() => previous.search_max().location().distance(location),
            _ => 0.0,
        };
        leg.planned = match (
            self.active.checked_sub(1).and_then(|i| self.points.get(i)),
            self.points.get(self.active),
        ) {
            (Some(previous), Some(active)) => previous.location_planned().distance(active.location_planned()),
            _ => 0.0,
        };
    }
}
