// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Two waypoints of the same name closer than this are considered the same.
const DUPLICATE_DISTANCE: f64 = 100.0;

/// A named location on the ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub location: GeoPoint,
    /// Ground elevation in meters MSL.
    #[serde(default)]
    pub elevation: f64,
}

pub type WaypointPtr = Arc<Waypoint>;

impl Waypoint {
    pub fn new(name: &str, location: GeoPoint, elevation: f64) -> Self {
        Waypoint {
            id: 0,
            name: name.to_string(),
            location,
            elevation,
        }
    }

    /// `true` if both describe the same place.
    pub fn is_same(&self, other: &Waypoint) -> bool {
        self.name == other.name && self.location.distance(&other.location) < DUPLICATE_DISTANCE
    }
}

/// Resolves waypoint identity for task points.
///
/// Task points refer to shared waypoints. When a task is loaded or edited,
/// points may carry their own copies of waypoints that already exist in the
/// database; the store hands out the canonical instance.
pub trait WaypointStore {
    /// Returns the stored waypoint equal to `waypoint`, or stores and returns
    /// `waypoint` if there is none.
    fn check_exists_or_append(&mut self, waypoint: &WaypointPtr) -> WaypointPtr;

    fn find_by_name(&self, name: &str) -> Option<WaypointPtr>;
}

/// In-memory [`WaypointStore`].
#[derive(Debug, Default)]
pub struct Waypoints {
    waypoints: Vec<WaypointPtr>,
}

impl Waypoints {
    pub fn new() -> Self {
        Waypoints::default()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaypointPtr> {
        self.waypoints.iter()
    }
}

impl WaypointStore for Waypoints {
    fn check_exists_or_append(&mut self, waypoint: &WaypointPtr) -> WaypointPtr {
        if let Some(existing) = self.waypoints.iter().find(|w| w.is_same(waypoint)) {
            return Arc::clone(existing);
        }

        let mut appended = Waypoint::clone(waypoint);
        appended.id = u32::try_from(self.waypoints.len() + 1).unwrap_or(u32::MAX);
        let appended = Arc::new(appended);
        self.waypoints.push(Arc::clone(&appended));
        appended
    }

    fn find_by_name(&self, name: &str) -> Option<WaypointPtr> {
        self.waypoints.iter().find(|w| w.name == name).cloned()
    }
}
