// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Sample tasks, flights and event sinks for tests of the task engine and
//! the modules built on it.

use crate::events::TaskEvents;
use crate::factory::FactoryType;
use crate::ordered_task::OrderedTask;
use crate::point::{OrderedTaskPoint, TaskPointKind};
use crate::settings::TaskBehaviour;
use crate::waypoint::{Waypoint, WaypointPtr};
use crate::zone::ObservationZone;
use common::aircraft::AircraftState;
use common::geo::GeoPoint;
use std::sync::{Arc, Mutex};

pub const START: GeoPoint = GeoPoint {
    latitude: 52.0,
    longitude: 10.0,
};
pub const TURN: GeoPoint = GeoPoint {
    latitude: 52.15,
    longitude: 10.0,
};
pub const FINISH: GeoPoint = GeoPoint {
    latitude: 52.0,
    longitude: 10.2,
};
pub const AREA_NORTH: GeoPoint = GeoPoint {
    latitude: 52.3,
    longitude: 10.0,
};
pub const AREA_EAST: GeoPoint = GeoPoint {
    latitude: 52.15,
    longitude: 10.5,
};

pub fn waypoint(name: &str, location: GeoPoint) -> WaypointPtr {
    Arc::new(Waypoint::new(name, location, 100.0))
}

pub fn point(kind: TaskPointKind, name: &str, location: GeoPoint, zone: ObservationZone) -> OrderedTaskPoint {
    OrderedTaskPoint::new(kind, waypoint(name, location), zone)
}

pub fn start_cylinder(name: &str, location: GeoPoint, radius: f64) -> OrderedTaskPoint {
    point(TaskPointKind::Start, name, location, ObservationZone::Cylinder { radius })
}

pub fn finish_cylinder(name: &str, location: GeoPoint, radius: f64) -> OrderedTaskPoint {
    point(TaskPointKind::Finish, name, location, ObservationZone::Cylinder { radius })
}

pub fn turn_sector(name: &str, location: GeoPoint) -> OrderedTaskPoint {
    point(
        TaskPointKind::Intermediate,
        name,
        location,
        ObservationZone::Sector {
            radius: 3000.0,
            half_angle: 45.0,
        },
    )
}

pub fn area(name: &str, location: GeoPoint, radius: f64) -> OrderedTaskPoint {
    point(TaskPointKind::Aat, name, location, ObservationZone::Cylinder { radius })
}

/// Racing task: start cylinder 500 m, sector turn point, finish cylinder
/// 500 m.
pub fn racing_task() -> OrderedTask {
    let mut task = OrderedTask::new(TaskBehaviour::default());
    task.set_name("racing");
    task.append(&start_cylinder("Start", START, 500.0));
    task.append(&turn_sector("Turn", TURN));
    task.append(&finish_cylinder("Finish", FINISH, 500.0));
    task.update_geometry();
    task
}

/// Assigned area task over two area cylinders of 10 km.
pub fn aat_task() -> OrderedTask {
    let mut task = OrderedTask::new(TaskBehaviour::default());
    task.set_factory(FactoryType::Aat);
    task.set_name("aat");
    task.append(&start_cylinder("Start", START, 500.0));
    task.append(&area("North", AREA_NORTH, 10_000.0));
    task.append(&area("East", AREA_EAST, 10_000.0));
    task.append(&finish_cylinder("Finish", FINISH, 500.0));
    task.update_geometry();
    task
}

/// Route through the racing task: start center, just inside the turn
/// point sector, finish center.
pub fn racing_route(task: &OrderedTask) -> Vec<GeoPoint> {
    task.points()
        .iter()
        .map(|p| match p.kind() {
            TaskPointKind::Intermediate => p.location().destination(p.axis(), 1000.0),
            _ => *p.location(),
        })
        .collect()
}

/// Fixes of a straight flight along `route` every `step` meters at 30 m/s
/// and 1500 m, starting at `start_time` seconds.
pub fn straight_flight(route: &[GeoPoint], step: f64, start_time: f64) -> Vec<AircraftState> {
    const SPEED: f64 = 30.0;
    const ALTITUDE: f64 = 1500.0;

    let mut states = Vec::new();
    let mut time = start_time;
    let mut push = |location: GeoPoint, time: f64| {
        let mut state = AircraftState::new(location, time, ALTITUDE);
        state.ground_speed = SPEED;
        states.push(state);
    };

    let Some(first) = route.first() else {
        return Vec::new();
    };
    push(*first, time);
    for leg in route.windows(2) {
        let distance = leg[0].distance(&leg[1]);
        let bearing = leg[0].bearing(&leg[1]);
        let steps = (distance / step).ceil().max(1.0) as usize;
        for k in 1..=steps {
            let travelled = distance * k as f64 / steps as f64;
            time += distance / steps as f64 / SPEED;
            push(leg[0].destination(bearing, travelled), time);
        }
    }
    states
}

/// Feeds `states` into `task` one update cycle at a time.
pub fn fly(task: &mut OrderedTask, states: &[AircraftState]) {
    let polar = common::glide::GlidePolar::default();
    let Some(first) = states.first() else {
        return;
    };
    let mut last = *first;
    for state in states {
        task.update(state, &last, &polar);
        last = *state;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Enter(String),
    Exit(String),
    Advanced(String, usize),
    RequestArm(String),
    Start,
    Finish,
}

/// Task event sink remembering every notification.
#[derive(Debug, Default)]
pub struct RecordingTaskEvents {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingTaskEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingTaskEvents::default())
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn count(&self, event: &RecordedEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    fn record(&self, event: RecordedEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl TaskEvents for RecordingTaskEvents {
    fn enter_transition(&self, point: &OrderedTaskPoint, _index: Option<usize>) {
        self.record(RecordedEvent::Enter(point.name().to_string()));
    }

    fn exit_transition(&self, point: &OrderedTaskPoint, _index: Option<usize>) {
        self.record(RecordedEvent::Exit(point.name().to_string()));
    }

    fn active_advanced(&self, point: &OrderedTaskPoint, index: usize) {
        self.record(RecordedEvent::Advanced(point.name().to_string(), index));
    }

    fn request_arm(&self, point: &OrderedTaskPoint) {
        self.record(RecordedEvent::RequestArm(point.name().to_string()));
    }

    fn task_start(&self) {
        self.record(RecordedEvent::Start);
    }

    fn task_finish(&self) {
        self.record(RecordedEvent::Finish);
    }
}
