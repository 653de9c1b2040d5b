// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Glide performance model.
//!
//! The polar is a quadratic sink rate function `w(v) = a v² + b v + c`
//! (m/s, sink positive). All solvers of the task engine consume it through
//! [`GlidePolar::solve`], which computes the MacCready solution of a single
//! glide leg.

use crate::geo::GeoVector;
use serde::{Deserialize, Serialize};

/// Glide polar with MacCready setting, bugs factor and cruise efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlidePolar {
    a: f64,
    b: f64,
    c: f64,
    /// MacCready setting in m/s.
    mc: f64,
    /// Performance degradation, 1.0 is clean.
    bugs: f64,
    /// Ratio of achieved to theoretical cruise speed.
    cruise_efficiency: f64,
    v_min: f64,
    v_max: f64,
}

impl Default for GlidePolar {
    /// A standard class polar with best L/D of about 42 at 105 km/h.
    fn default() -> Self {
        GlidePolar::new(0.0016, -0.0704, 1.3744, 0.0)
    }
}

impl GlidePolar {
    pub fn new(a: f64, b: f64, c: f64, mc: f64) -> Self {
        GlidePolar {
            a,
            b,
            c,
            mc: mc.max(0.0),
            bugs: 1.0,
            cruise_efficiency: 1.0,
            v_min: 18.0,
            v_max: 70.0,
        }
    }

    /// Fits the quadratic through three `(speed, sink)` pairs in m/s.
    ///
    /// Returns `None` if the points do not describe a polar with a minimum sink.
    pub fn from_points(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), mc: f64) -> Option<Self> {
        let (v1, w1) = p1;
        let (v2, w2) = p2;
        let (v3, w3) = p3;
        let d = (v1 - v2) * (v1 - v3) * (v2 - v3);
        if d.abs() < f64::EPSILON {
            return None;
        }
        let a = (v3 * (w2 - w1) + v2 * (w1 - w3) + v1 * (w3 - w2)) / d;
        let b = (v3 * v3 * (w1 - w2) + v2 * v2 * (w3 - w1) + v1 * v1 * (w2 - w3)) / d;
        let c = (v2 * v3 * (v2 - v3) * w1 + v3 * v1 * (v3 - v1) * w2 + v1 * v2 * (v1 - v2) * w3) / d;
        if a <= 0.0 {
            return None;
        }
        Some(GlidePolar::new(a, b, c, mc))
    }

    pub fn mc(&self) -> f64 {
        self.mc
    }

    pub fn set_mc(&mut self, mc: f64) {
        self.mc = mc.max(0.0);
    }

    /// Copy of this polar with a different MacCready setting.
    pub fn with_mc(&self, mc: f64) -> Self {
        let mut polar = *self;
        polar.set_mc(mc);
        polar
    }

    pub fn bugs(&self) -> f64 {
        self.bugs
    }

    pub fn set_bugs(&mut self, bugs: f64) {
        self.bugs = bugs.clamp(0.5, 1.0);
    }

    pub fn cruise_efficiency(&self) -> f64 {
        self.cruise_efficiency
    }

    pub fn set_cruise_efficiency(&mut self, cruise_efficiency: f64) {
        self.cruise_efficiency = cruise_efficiency.max(0.01);
    }

    /// Sink rate in m/s at airspeed `v` (m/s).
    pub fn sink_rate(&self, v: f64) -> f64 {
        (self.a * v * v + self.b * v + self.c) / self.bugs
    }

    /// Speed to fly in still air for the given MacCready value.
    pub fn v_opt(&self, mc: f64) -> f64 {
        ((self.c + mc.max(0.0) * self.bugs) / self.a)
            .sqrt()
            .clamp(self.v_min, self.v_max)
    }

    pub fn best_ld(&self) -> f64 {
        let v = self.v_opt(0.0);
        v / self.sink_rate(v)
    }

    /// Solves a single leg at the current MacCready setting.
    ///
    /// The aircraft cruises at the MacCready speed. Height missing to reach
    /// the leg with `altitude_difference >= 0` is climbed at the MacCready
    /// rate. Without lift (MC 0) a missing height makes the result
    /// [`GlideValidity::MacCreadyTooLow`].
    pub fn solve(&self, state: &GlideState) -> GlideResult {
        let mut result = GlideResult {
            validity: GlideValidity::Ok,
            vector: state.vector,
            mc: self.mc,
            ..GlideResult::default()
        };

        let distance = state.vector.distance.max(0.0);
        let v = self.v_opt(self.mc);
        result.v_opt = v;

        if distance <= 0.0 {
            result.altitude_difference = state.altitude_difference;
            return result;
        }

        let sink = self.sink_rate(v);
        result.height_glide = distance * sink / v;
        result.altitude_difference = state.altitude_difference - result.height_glide;
        let time_cruise = distance / (v * self.cruise_efficiency);

        if result.altitude_difference >= 0.0 {
            result.time_elapsed = time_cruise;
            result.time_virtual = 0.0;
            return result;
        }

        if self.mc <= 0.0 {
            result.validity = GlideValidity::MacCreadyTooLow;
            result.time_elapsed = time_cruise;
            return result;
        }

        result.height_climb = -result.altitude_difference;
        result.time_virtual = result.height_climb / self.mc;
        result.time_elapsed = time_cruise + result.time_virtual;
        result
    }
}

/// Input for a single leg glide calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlideState {
    pub vector: GeoVector,
    /// Height of the aircraft above the minimum arrival height of the leg.
    pub altitude_difference: f64,
}

impl GlideState {
    pub fn new(vector: GeoVector, altitude_difference: f64) -> Self {
        GlideState {
            vector,
            altitude_difference,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlideValidity {
    #[default]
    NoSolution,
    Ok,
    MacCreadyTooLow,
}

/// Result of a glide calculation, for one leg or summed over a chain of legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlideResult {
    pub validity: GlideValidity,
    pub vector: GeoVector,
    /// Height lost in cruise.
    pub height_glide: f64,
    /// Height to be gained in climbs.
    pub height_climb: f64,
    /// Arrival height above the minimum, assuming pure glide.
    pub altitude_difference: f64,
    /// Total time in seconds including climbs.
    pub time_elapsed: f64,
    /// Time in seconds spent climbing.
    pub time_virtual: f64,
    pub v_opt: f64,
    pub mc: f64,
}

impl GlideResult {
    pub fn is_ok(&self) -> bool {
        self.validity == GlideValidity::Ok
    }

    pub fn is_defined(&self) -> bool {
        self.validity != GlideValidity::NoSolution
    }

    pub fn is_final_glide(&self) -> bool {
        self.is_ok() && self.altitude_difference >= 0.0 && self.height_climb <= 0.0
    }

    pub fn reset(&mut self) {
        *self = GlideResult::default();
    }

    /// Glide ratio over the cruise part, `None` without height loss.
    pub fn glide_ratio(&self) -> Option<f64> {
        (self.height_glide > 0.0).then(|| self.vector.distance / self.height_glide)
    }

    /// Appends the result of the following leg.
    ///
    /// Distances, heights and times are summed; the bearing of the first leg
    /// is kept; the arrival margin becomes the one of `leg`; the validity is
    /// the worse of both.
    pub fn add(&mut self, leg: &GlideResult) {
        if !self.is_defined() {
            *self = *leg;
            return;
        }
        self.vector.distance += leg.vector.distance;
        self.height_glide += leg.height_glide;
        self.height_climb += leg.height_climb;
        self.time_elapsed += leg.time_elapsed;
        self.time_virtual += leg.time_virtual;
        self.altitude_difference = leg.altitude_difference;
        if leg.validity != GlideValidity::Ok {
            self.validity = leg.validity;
        }
    }
}
