// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::flat::{FlatGeoPoint, TaskProjection};
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// A [`GeoPoint`] cached together with its projected coordinate.
///
/// Equality and distance comparisons are done in flat space, the
/// geographic location is kept for reporting and great-circle distances.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchPoint {
    location: GeoPoint,
    flat: FlatGeoPoint,
}

pub type SearchPointVector = Vec<SearchPoint>;

impl PartialEq for SearchPoint {
    fn eq(&self, other: &Self) -> bool {
        self.flat == other.flat
    }
}

impl SearchPoint {
    pub fn new(location: GeoPoint, projection: &TaskProjection) -> Self {
        SearchPoint {
            location,
            flat: projection.project_integer(&location),
        }
    }

    pub fn location(&self) -> &GeoPoint {
        &self.location
    }

    pub fn flat(&self) -> &FlatGeoPoint {
        &self.flat
    }

    pub fn is_valid(&self) -> bool {
        self.location.is_valid()
    }

    /// Recomputes the flat coordinate for a new projection.
    pub fn project(&mut self, projection: &TaskProjection) {
        self.flat = projection.project_integer(&self.location);
    }

    pub fn flat_square_distance_to(&self, other: &SearchPoint) -> i64 {
        self.flat.square_distance_to(&other.flat)
    }

    pub fn flat_distance_to(&self, other: &SearchPoint) -> f64 {
        self.flat.distance_to(&other.flat)
    }
}

/// Reprojects every point of `points`.
pub fn project_all(points: &mut [SearchPoint], projection: &TaskProjection) {
    for p in points.iter_mut() {
        p.project(projection);
    }
}

/// Reduces `points` to their convex hull (counter-clockwise, no collinear
/// points, no duplicates).
///
/// Returns `true` if any point was removed.
pub fn prune_interior(points: &mut SearchPointVector) -> bool {
    if points.len() < 3 {
        let before = points.len();
        points.dedup();
        return points.len() != before;
    }

    let before = points.len();
    let mut sorted = points.clone();
    sorted.sort_by(|a, b| (a.flat.x, a.flat.y).cmp(&(b.flat.x, b.flat.y)));
    sorted.dedup();

    if sorted.len() < 3 {
        *points = sorted;
        return points.len() != before;
    }

    let mut hull: SearchPointVector = Vec::with_capacity(sorted.len() * 2);
    for p in sorted.iter() {
        while hull.len() >= 2
            && hull[hull.len() - 2].flat.cross(&hull[hull.len() - 1].flat, &p.flat) <= 0
        {
            hull.pop();
        }
        hull.push(*p);
    }
    let lower_len = hull.len() + 1;
    for p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && hull[hull.len() - 2].flat.cross(&hull[hull.len() - 1].flat, &p.flat) <= 0
        {
            hull.pop();
        }
        hull.push(*p);
    }
    hull.pop();

    if hull.len() < 3 {
        // all points collinear, keep the two extremes
        hull = vec![sorted[0], sorted[sorted.len() - 1]];
    }

    *points = hull;
    points.len() != before
}

/// Tests whether `point` lies inside or on the convex polygon `hull`
/// (as produced by [`prune_interior`]).
pub fn hull_contains(hull: &[SearchPoint], point: &FlatGeoPoint) -> bool {
    if hull.len() < 3 {
        return hull.iter().any(|p| p.flat == *point);
    }
    hull.iter().enumerate().all(|(i, a)| {
        let b = &hull[(i + 1) % hull.len()];
        a.flat.cross(&b.flat, point) >= 0
    })
}
