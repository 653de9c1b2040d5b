// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::geo::GeoPoint;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A point in time in UTC seconds since midnight, or undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeStamp(Option<f64>);

impl TimeStamp {
    pub fn undefined() -> Self {
        TimeStamp(None)
    }

    pub fn from_seconds(seconds: f64) -> Self {
        TimeStamp(Some(seconds))
    }

    pub fn from_naive_time(time: &NaiveTime) -> Self {
        TimeStamp(Some(
            f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) * 1e-9,
        ))
    }

    pub fn is_defined(&self) -> bool {
        self.0.is_some()
    }

    pub fn seconds(&self) -> Option<f64> {
        self.0
    }

    /// Time of day, wrapped into a single day.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        let seconds = self.0?.rem_euclid(SECONDS_PER_DAY);
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(whole as u32, nanos.min(999_999_999))
    }

    /// Seconds from `earlier` to `self`, `None` if either is undefined.
    pub fn since(&self, earlier: &TimeStamp) -> Option<f64> {
        Some(self.0? - earlier.0?)
    }

    /// `true` if both are defined and `self` is strictly later than `other`.
    /// An undefined `other` counts as earlier than any defined time.
    pub fn is_after(&self, other: &TimeStamp) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

/// Navigation state of the aircraft at a single fix.
///
/// This is the input for every update cycle of the task engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    pub location: GeoPoint,
    pub time: TimeStamp,
    /// Altitude in meters MSL.
    pub altitude: f64,
    /// Ground speed in m/s.
    pub ground_speed: f64,
    /// Track over ground in degrees.
    pub track: f64,
    pub flying: bool,
}

impl Default for AircraftState {
    fn default() -> Self {
        AircraftState {
            location: GeoPoint::invalid(),
            time: TimeStamp::undefined(),
            altitude: 0.0,
            ground_speed: 0.0,
            track: 0.0,
            flying: false,
        }
    }
}

impl AircraftState {
    pub fn new(location: GeoPoint, time: f64, altitude: f64) -> Self {
        AircraftState {
            location,
            time: TimeStamp::from_seconds(time),
            altitude,
            flying: true,
            ..AircraftState::default()
        }
    }

    pub fn has_time(&self) -> bool {
        self.time.is_defined()
    }
}
