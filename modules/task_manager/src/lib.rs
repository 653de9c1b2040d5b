// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Drives an [`OrderedTask`] from the events on the bus.
//!
//! The [`TaskManager`] runs one update cycle per received aircraft state and
//! publishes the transitions of the task as well as a [`TaskStats`] snapshot
//! after every cycle.

use common::aircraft::AircraftState;
use common::glide::GlidePolar;
use common::stats::TaskStats;
use module_core::{Event, EventKind, Module, ModuleCtx, TaskPointInfo};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use task_engine::{OrderedTask, OrderedTaskPoint, TaskEvents};
use tracing::{debug, error, info, warn};

/// A task shared between the [`TaskManager`] and its observers.
///
/// The task is only mutated behind this lock, an update cycle holds the write
/// lock for its whole duration.
pub type SharedTask = Arc<RwLock<OrderedTask>>;

/// Publishes the notifications of a task as bus events.
pub struct BusTaskEvents {
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl BusTaskEvents {
    pub fn new(sender: tokio::sync::broadcast::Sender<Event>) -> Self {
        BusTaskEvents { sender }
    }

    fn publish(&self, kind: EventKind) {
        // Nobody listening is fine for a notification.
        let _ = self.sender.send(Event { kind });
    }
}

impl TaskEvents for BusTaskEvents {
    fn enter_transition(&self, point: &OrderedTaskPoint, index: Option<usize>) {
        self.publish(EventKind::EnterTransitionEvent(TaskPointInfo::new(point.name(), index)));
    }

    fn exit_transition(&self, point: &OrderedTaskPoint, index: Option<usize>) {
        self.publish(EventKind::ExitTransitionEvent(TaskPointInfo::new(point.name(), index)));
    }

    fn active_advanced(&self, point: &OrderedTaskPoint, index: usize) {
        self.publish(EventKind::ActiveAdvancedEvent(TaskPointInfo::new(point.name(), Some(index))));
    }

    fn request_arm(&self, point: &OrderedTaskPoint) {
        self.publish(EventKind::RequestArmEvent(TaskPointInfo::new(point.name(), None)));
    }

    fn task_start(&self) {
        self.publish(EventKind::TaskStartEvent);
    }

    fn task_finish(&self) {
        self.publish(EventKind::TaskFinishEvent);
    }
}

/// Module owning the ordered task of the flight.
///
/// Reacts on the following events:
/// - [`EventKind::AircraftStateEvent`]: runs an update cycle followed by the
///   idle solvers and publishes [`EventKind::TaskStatsEvent`].
/// - [`EventKind::PilotEvent`]: records a pilot event at the time of the last fix.
/// - [`EventKind::McChangedEvent`]: changes the MacCready setting of the polar.
/// - [`EventKind::QuitEvent`]: stops the module.
pub struct TaskManager {
    task: SharedTask,
    polar: GlidePolar,
    last_state: Option<AircraftState>,
    ctx: ModuleCtx,
}

impl TaskManager {
    /// Creates the manager and routes the notifications of `task` onto the bus
    /// of `ctx`.
    pub fn new(ctx: ModuleCtx, mut task: OrderedTask, polar: GlidePolar) -> Self {
        task.set_task_events(Arc::new(BusTaskEvents::new(ctx.sender.clone())));
        let errors = task.check_task();
        if !errors.is_empty() {
            warn!("Task {} is not valid: {:?}", task.name(), errors);
        }
        TaskManager {
            task: Arc::new(RwLock::new(task)),
            polar,
            last_state: None,
            ctx,
        }
    }

    /// Handle to the managed task.
    pub fn task(&self) -> SharedTask {
        self.task.clone()
    }

    pub fn polar(&self) -> &GlidePolar {
        &self.polar
    }

    fn write_task(&self) -> RwLockWriteGuard<'_, OrderedTask> {
        self.task.write().unwrap_or_else(|task| task.into_inner())
    }

    /// Runs a complete update cycle for `state`.
    ///
    /// # Returns
    /// The statistics after the cycle.
    pub fn update_aircraft(&mut self, state: &AircraftState) -> TaskStats {
        let last = self.last_state.unwrap_or(*state);
        let stats = {
            let mut task = self.write_task();
            let active = task.active_index();
            task.update(state, &last, &self.polar);
            if task.update_idle(state, &self.polar) {
                debug!("Area targets updated");
            }
            if task.active_index() != active {
                info!("Active task point is now {}", task.active_index());
            }
            *task.stats()
        };
        self.last_state = Some(*state);
        stats
    }

    /// Records a pilot event at the time of the last received fix.
    ///
    /// # Returns
    /// `true` if the task accepted the pilot event.
    pub fn pilot_event(&mut self) -> bool {
        let Some(time) = self.last_state.and_then(|s| s.time.to_naive_time()) else {
            warn!("Pilot event without a timed fix is ignored");
            return false;
        };
        let accepted = self.write_task().set_pev(time);
        info!("Pilot event at {} {}", time, if accepted { "accepted" } else { "ignored" });
        accepted
    }

    pub fn set_mc(&mut self, mc: f64) {
        self.polar.set_mc(mc);
        debug!("MacCready set to {:.1} m/s", self.polar.mc());
    }

    fn handle_event(&mut self, event: Event) -> bool {
        match event.kind {
            EventKind::QuitEvent => return false,
            EventKind::AircraftStateEvent(state) => {
                let stats = self.update_aircraft(&state);
                if let Err(e) = self.ctx.publish_event(EventKind::TaskStatsEvent(Arc::new(stats))) {
                    debug!("No receiver for task stats: {}", e);
                }
            }
            EventKind::PilotEvent => {
                self.pilot_event();
            }
            EventKind::McChangedEvent(mc) => self.set_mc(mc),
            _ => (),
        }
        true
    }
}

#[async_trait::async_trait]
impl Module for TaskManager {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => run = self.handle_event(event),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Task manager missed {} events", n);
                        }
                        Err(e) => {
                            error!("Event bus failed: {}", e);
                            return Err(());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
