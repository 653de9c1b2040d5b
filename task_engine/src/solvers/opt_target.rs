// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::remaining_legs;
use crate::point::OrderedTaskPoint;
use crate::settings::GlideSettings;
use algorithm::{SearchRange, ZeroFinder, solve_chain};
use common::aircraft::AircraftState;
use common::flat::{FlatPoint, TaskProjection};
use common::geo::GeoPoint;
use common::glide::GlidePolar;
use std::f64::consts::TAU;

/// Samples of the isoline ellipse tested against the zone.
const ISOLINE_SAMPLES: usize = 64;

/// Part of the ellipse through the current target, with the previous and
/// next point as foci, that lies inside the zone. Every target on it gives
/// the same distance.
struct IsolineSegment {
    projection: TaskProjection,
    center: FlatPoint,
    a: f64,
    b: f64,
    rotation: f64,
    phi_start: f64,
    phi_sweep: f64,
}

impl IsolineSegment {
    fn new(
        previous: &GeoPoint,
        next: &GeoPoint,
        point: &OrderedTaskPoint,
        projection: &TaskProjection,
    ) -> Option<Self> {
        let f1 = projection.project(previous);
        let f2 = projection.project(next);
        let target = projection.project(point.target());

        let a = 0.5 * (target.distance_to(&f1) + target.distance_to(&f2));
        let c = 0.5 * f1.distance_to(&f2);
        if a - c <= 1.0 {
            return None;
        }

        let mut segment = IsolineSegment {
            projection: *projection,
            center: FlatPoint::new(0.5 * (f1.x + f2.x), 0.5 * (f1.y + f2.y)),
            a,
            b: (a * a - c * c).sqrt(),
            rotation: (f2.y - f1.y).atan2(f2.x - f1.x),
            phi_start: 0.0,
            phi_sweep: TAU,
        };

        let step = TAU / ISOLINE_SAMPLES as f64;
        let inside: Vec<bool> = (0..ISOLINE_SAMPLES)
            .map(|k| point.is_in_sector(&segment.at_angle(step * k as f64)))
            .collect();
        let (first, length) = longest_circular_run(&inside)?;
        if length < 2 {
            return None;
        }
        if length < ISOLINE_SAMPLES {
            segment.phi_start = step * first as f64;
            segment.phi_sweep = step * (length - 1) as f64;
        }
        Some(segment)
    }

    fn at_angle(&self, phi: f64) -> GeoPoint {
        let x = self.a * phi.cos();
        let y = self.b * phi.sin();
        let (sin, cos) = self.rotation.sin_cos();
        self.projection.unproject(&FlatPoint::new(
            self.center.x + x * cos - y * sin,
            self.center.y + x * sin + y * cos,
        ))
    }

    /// Point at fraction `t` along the segment.
    fn parametric(&self, t: f64) -> GeoPoint {
        self.at_angle(self.phi_start + t * self.phi_sweep)
    }
}

/// Start index and length of the longest run of `true` in a circular list.
fn longest_circular_run(values: &[bool]) -> Option<(usize, usize)> {
    let n = values.len();
    if values.iter().all(|v| *v) {
        return Some((0, n));
    }
    let mut best: Option<(usize, usize)> = None;
    for start in 0..n {
        if !values[start] || values[(start + n - 1) % n] {
            continue;
        }
        let length = (0..n).take_while(|k| values[(start + k) % n]).count();
        if best.is_none_or(|(_, l)| length > l) {
            best = Some((start, length));
        }
    }
    best
}

/// Moves the target of the active area point along its isoline to the
/// position with the shortest remaining time.
///
/// All targets on the isoline give the same task distance, so this only
/// trades off the bearing towards the aircraft. The search is a heuristic
/// over a sampled isoline.
pub struct TaskOptTarget<'a> {
    points: &'a mut [OrderedTaskPoint],
    active: usize,
    aircraft: &'a AircraftState,
    settings: &'a GlideSettings,
    polar: GlidePolar,
    isoline: Option<IsolineSegment>,
}

impl<'a> TaskOptTarget<'a> {
    pub fn new(
        points: &'a mut [OrderedTaskPoint],
        active: usize,
        aircraft: &'a AircraftState,
        settings: &'a GlideSettings,
        polar: &GlidePolar,
        projection: &TaskProjection,
    ) -> Self {
        let isoline = match (active.checked_sub(1).and_then(|i| points.get(i)), points.get(active), points.get(active + 1)) {
            (Some(previous), Some(point), Some(next)) if point.has_target() && !point.is_target_locked() => {
                IsolineSegment::new(previous.search_max().location(), next.location_remaining(), point, projection)
            }
            _ => None,
        };
        TaskOptTarget {
            points,
            active,
            aircraft,
            settings,
            polar: *polar,
            isoline,
        }
    }

    fn remaining_time(&self) -> f64 {
        let legs = remaining_legs(&*self.points, self.active, self.aircraft, self.settings);
        solve_chain(&self.polar, &legs, self.aircraft.altitude).time_elapsed
    }

    /// Searches the best target starting at fraction `guess` of the isoline.
    ///
    /// # Returns
    /// `true` if the target was moved.
    pub fn search(&mut self, guess: f64) -> bool {
        if self.isoline.is_none() || !self.aircraft.location.is_valid() {
            return false;
        }
        let original = *self.points[self.active].target();
        let original_time = self.remaining_time();

        let t = self.find_min(guess);
        let time = self.f(t);
        if time.is_finite() && time < original_time {
            return true;
        }
        self.points[self.active].set_target_unchecked(original);
        false
    }
}

impl ZeroFinder for TaskOptTarget<'_> {
    fn f(&mut self, t: f64) -> f64 {
        let Some(target) = self.isoline.as_ref().map(|i| i.parametric(t)) else {
            return f64::INFINITY;
        };
        self.points[self.active].set_target_unchecked(target);
        self.remaining_time()
    }

    fn range(&self) -> SearchRange {
        SearchRange::new(0.0, 1.0, 0.01)
    }
}
