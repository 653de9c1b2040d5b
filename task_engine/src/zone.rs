// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Observation zone shapes.
//!
//! A zone is described relative to its task point's location and an axis
//! bearing that the task point derives from its neighbours. Shapes with an
//! orientation (sector, keyhole, line) open towards the axis.

use common::aircraft::AircraftState;
use common::geo::{GeoPoint, bearing_difference, normalize_bearing};
use serde::{Deserialize, Serialize};

/// Angular step of sampled arcs in degrees.
const ARC_STEP: f64 = 10.0;

/// Number of samples on straight boundary edges, excluding the end points.
const EDGE_SAMPLES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ObservationZone {
    /// Circle of `radius` meters.
    Cylinder { radius: f64 },
    /// Symmetric sector of `radius` meters, opening `half_angle` degrees to
    /// each side of the axis.
    Sector { radius: f64, half_angle: f64 },
    /// Sector combined with a small cylinder around the turn point.
    Keyhole {
        inner_radius: f64,
        radius: f64,
        half_angle: f64,
    },
    /// Start or finish line of `length` meters, perpendicular to the axis.
    /// The half disc on the axis side of the line is inside.
    Line { length: f64 },
}

impl Default for ObservationZone {
    fn default() -> Self {
        ObservationZone::Cylinder { radius: 500.0 }
    }
}

impl ObservationZone {
    /// Outer radius in meters.
    pub fn radius(&self) -> f64 {
        match *self {
            ObservationZone::Cylinder { radius }
            | ObservationZone::Sector { radius, .. }
            | ObservationZone::Keyhole { radius, .. } => radius,
            ObservationZone::Line { length } => 0.5 * length,
        }
    }

    /// The radius if this zone is a plain cylinder.
    pub fn cylinder_radius(&self) -> Option<f64> {
        match *self {
            ObservationZone::Cylinder { radius } => Some(radius),
            _ => None,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, ObservationZone::Line { .. })
    }

    /// `true` if `location` lies within the zone of a point at `center`
    /// with the given `axis` bearing.
    pub fn is_inside(&self, center: &GeoPoint, axis: f64, location: &GeoPoint) -> bool {
        let distance = center.distance(location);
        match *self {
            ObservationZone::Cylinder { radius } => distance <= radius,
            ObservationZone::Sector { radius, half_angle } => {
                distance <= radius && within_angle(center, axis, half_angle, location, distance)
            }
            ObservationZone::Keyhole {
                inner_radius,
                radius,
                half_angle,
            } => {
                distance <= inner_radius
                    || (distance <= radius && within_angle(center, axis, half_angle, location, distance))
            }
            ObservationZone::Line { length } => {
                distance <= 0.5 * length && within_angle(center, axis, 90.0, location, distance)
            }
        }
    }

    /// Extra condition a transition between `last` and `now` has to meet.
    ///
    /// A line is only crossed if both fixes are close enough to its center,
    /// all other shapes accept any transition.
    pub fn transition_constraint(&self, center: &GeoPoint, now: &AircraftState, last: &AircraftState) -> bool {
        match *self {
            ObservationZone::Line { length } => {
                let half = 0.5 * length;
                center.distance(&now.location) <= half && center.distance(&last.location) <= half
            }
            _ => true,
        }
    }

    /// Samples of the zone outline, used as candidate points by the path
    /// searches. For a line these are points on the line itself.
    pub fn boundary(&self, center: &GeoPoint, axis: f64) -> Vec<GeoPoint> {
        match *self {
            ObservationZone::Cylinder { radius } => arc(center, radius, 0.0, 360.0, false),
            ObservationZone::Sector { radius, half_angle } => {
                sector_boundary(center, axis, radius, half_angle)
            }
            ObservationZone::Keyhole {
                inner_radius,
                radius,
                half_angle,
            } => {
                let mut points = sector_boundary(center, axis, radius, half_angle);
                points.retain(|p| center.distance(p) >= inner_radius * 0.999);
                // the part of the inner cylinder outside of the sector
                let start = axis + half_angle;
                let sweep = 360.0 - 2.0 * half_angle;
                points.extend(arc(center, inner_radius, start, sweep, true));
                points
            }
            ObservationZone::Line { length } => {
                let half = 0.5 * length;
                let left = center.destination(normalize_bearing(axis - 90.0), half);
                let right = center.destination(normalize_bearing(axis + 90.0), half);
                let mut points = edge(&left, center);
                points.extend(edge(center, &right));
                points.push(right);
                points
            }
        }
    }
}

fn within_angle(center: &GeoPoint, axis: f64, half_angle: f64, location: &GeoPoint, distance: f64) -> bool {
    if distance <= f64::EPSILON {
        return true;
    }
    bearing_difference(axis, center.bearing(location)).abs() <= half_angle
}

/// Points on a circle from `start` sweeping `sweep` degrees clockwise.
fn arc(center: &GeoPoint, radius: f64, start: f64, sweep: f64, closed: bool) -> Vec<GeoPoint> {
    let steps = ((sweep / ARC_STEP).ceil() as usize).max(1);
    let step = sweep / steps as f64;
    let count = if closed { steps + 1 } else { steps };
    (0..count)
        .map(|i| center.destination(normalize_bearing(start + step * i as f64), radius))
        .collect()
}

/// Points from `from` towards `to`, including `from`, excluding `to`.
fn edge(from: &GeoPoint, to: &GeoPoint) -> Vec<GeoPoint> {
    (0..=EDGE_SAMPLES)
        .map(|i| from.interpolate(to, i as f64 / (EDGE_SAMPLES + 1) as f64))
        .collect()
}

fn sector_boundary(center: &GeoPoint, axis: f64, radius: f64, half_angle: f64) -> Vec<GeoPoint> {
    let start = axis - half_angle;
    let outline = arc(center, radius, start, 2.0 * half_angle, true);
    let (Some(first), Some(last)) = (outline.first().copied(), outline.last().copied()) else {
        return vec![*center];
    };
    let mut points = edge(center, &first);
    points.extend(outline);
    let mut back = edge(&last, center);
    // `last` is already part of the arc
    back.remove(0);
    points.extend(back);
    points
}
