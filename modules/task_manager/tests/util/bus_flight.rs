// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::aircraft::AircraftState;
use common::stats::TaskStats;
use module_core::{Event, EventBus, EventKind, EventKindType};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

const STATS_TIMEOUT: Duration = Duration::from_secs(1);

/// Publishes a single fix and waits for the stats of its update cycle.
///
/// # Returns
/// All events published by the update cycle, the stats event last.
pub async fn publish_fix(eb: &EventBus, rx: &mut Receiver<Event>, state: &AircraftState) -> Vec<Event> {
    eb.publish(&Event {
        kind: EventKind::AircraftStateEvent(Arc::new(*state)),
    });

    let mut events = Vec::new();
    loop {
        let event = tokio::time::timeout(STATS_TIMEOUT, rx.recv())
            .await
            .expect("Task stats not published in time")
            .expect("Event bus failed");
        match event.event_type() {
            EventKindType::AircraftStateEvent => (),
            EventKindType::TaskStatsEvent => {
                events.push(event);
                return events;
            }
            _ => events.push(event),
        }
    }
}

/// Flies all `states` fix by fix through the bus.
pub async fn fly_on_bus(eb: &EventBus, rx: &mut Receiver<Event>, states: &[AircraftState]) -> Vec<Event> {
    let mut events = Vec::new();
    for state in states {
        events.extend(publish_fix(eb, rx, state).await);
    }
    events
}

/// The stats of the last update cycle in `events`.
pub fn last_stats(events: &[Event]) -> TaskStats {
    events
        .iter()
        .rev()
        .find_map(|e| match &e.kind {
            EventKind::TaskStatsEvent(stats) => Some(**stats),
            _ => None,
        })
        .expect("no task stats published")
}

/// Events of the task without the stats snapshots.
pub fn task_events(events: &[Event]) -> Vec<EventKind> {
    events
        .iter()
        .filter(|e| e.event_type() != EventKindType::TaskStatsEvent)
        .map(|e| e.kind.clone())
        .collect()
}
