// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Event bus and module runtime.
//!
//! Modules communicate exclusively through [`Event`]s published on an
//! [`EventBus`]. Each module owns a [`ModuleCtx`] and runs its own event loop.

use common::aircraft::AircraftState;
use common::stats::TaskStats;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoDiscriminant;
use strum_macros::EnumDiscriminants;

/// Represents a high-level event in the system.
///
/// Each `Event` wraps an [`EventKind`], which defines the actual type
/// and data carried by the event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The inner event type and associated data.
    pub kind: EventKind,
}

impl Event {
    /// The discriminant of the carried [`EventKind`].
    pub fn event_type(&self) -> EventKindType {
        self.kind.discriminant()
    }
}

/// A thread-safe, reference-counted pointer to an [`AircraftState`].
pub type AircraftStatePtr = Arc<AircraftState>;

/// A thread-safe, reference-counted pointer to a [`TaskStats`] snapshot.
pub type TaskStatsPtr = Arc<TaskStats>;

/// Identifies the task point an event refers to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskPointInfo {
    /// Name of the waypoint of the task point.
    pub name: String,
    /// Index in the task, `None` for an optional start point or if the
    /// position is not known to the sender.
    pub index: Option<usize>,
}

impl TaskPointInfo {
    pub fn new(name: &str, index: Option<usize>) -> Self {
        TaskPointInfo {
            name: name.to_owned(),
            index,
        }
    }
}

/// Enumerates the different kinds of events that can be emitted
/// and transmitted via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// A new navigation fix of the aircraft.
    AircraftStateEvent(AircraftStatePtr),

    /// The pilot confirmed the start (pilot event).
    PilotEvent,

    /// The MacCready setting was changed, in m/s.
    McChangedEvent(f64),

    /// The aircraft entered the observation zone of a task point.
    EnterTransitionEvent(TaskPointInfo),

    /// The aircraft left the observation zone of a task point.
    ExitTransitionEvent(TaskPointInfo),

    /// The active task point moved on to the carried task point.
    ActiveAdvancedEvent(TaskPointInfo),

    /// The carried task point is ready to advance but needs to be armed.
    RequestArmEvent(TaskPointInfo),

    /// The task was started.
    TaskStartEvent,

    /// The task was finished.
    TaskFinishEvent,

    /// Snapshot of the task statistics after a completed update cycle.
    TaskStatsEvent(TaskStatsPtr),
}

/// Borrows the payload of an [`EventKind`] variant.
///
/// Evaluates to `Some(&payload)` if `$kind` is the variant `$variant`,
/// otherwise to `None`.
///
/// ```
/// use module_core::{EventKind, payload_ref};
///
/// let kind = EventKind::McChangedEvent(1.5);
/// assert_eq!(payload_ref!(kind, EventKind::McChangedEvent), Some(&1.5));
/// assert_eq!(payload_ref!(kind, EventKind::TaskStatsEvent), None);
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            _ => None,
        }
    };
}

static NEXT_BUS_ID: AtomicUsize = AtomicUsize::new(0);

/// A simple asynchronous event bus for publishing and subscribing to [`Event`]s.
///
/// The event bus uses a [`tokio::sync::broadcast::channel`] under the hood,
/// allowing multiple receivers to listen for the same stream of events.
///
/// Each published event is cloned and distributed to all active subscribers.
/// If no subscribers exist at the time of publication, the event is discarded silently.
pub struct EventBus {
    id: usize,
    /// The broadcast sender used internally to distribute events.
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new [`EventBus`] with a fixed buffer capacity of 100 messages.
    ///
    /// When the buffer is full, the oldest messages are dropped automatically
    /// as new ones are published.
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        EventBus {
            id: NEXT_BUS_ID.fetch_add(1, Ordering::Relaxed),
            sender,
        }
    }

    /// Unique id of this bus within the process.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Subscribes to the event bus and returns a [`tokio::sync::broadcast::Receiver`].
    ///
    /// The returned receiver will receive all future events published after the
    /// subscription is created.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an [`Event`] to all active subscribers.
    ///
    /// If no subscribers exist, the event is discarded silently.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Creates a [`ModuleCtx`] bound to this [`EventBus`].
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the common interface for an asynchronous module
/// that can be executed and communicate via the [`EventBus`].
#[async_trait::async_trait]
pub trait Module {
    /// Runs the module asynchronously until completion.
    ///
    /// This function typically contains the module's main event loop,
    /// reacting to messages received through the [`ModuleCtx`].
    async fn run(&mut self) -> Result<(), ()>;
}

/// Provides a module-scoped context for interacting with the [`EventBus`].
///
/// Each `ModuleCtx` owns both a sender and a receiver, allowing the module
/// to both publish and listen for events concurrently.
pub struct ModuleCtx {
    bus_id: usize,

    /// The broadcast sender used to publish events.
    pub sender: tokio::sync::broadcast::Sender<Event>,

    /// The broadcast receiver used to listen for events.
    pub receiver: tokio::sync::broadcast::Receiver<Event>,
}

impl ModuleCtx {
    /// Constructs a new [`ModuleCtx`] from the given [`EventBus`].
    ///
    /// Clones the internal broadcast sender and creates a new receiver.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            bus_id: event_bus.id,
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Id of the bus this context is bound to.
    pub fn bus_id(&self) -> usize {
        self.bus_id
    }

    /// Publishes an event with the given kind.
    ///
    /// # Returns
    /// An error if no receiver is subscribed to the bus.
    pub fn publish_event(
        &self,
        kind: EventKind,
    ) -> Result<(), tokio::sync::broadcast::error::SendError<Event>> {
        self.sender.send(Event { kind }).map(|_| ())
    }
}

pub mod test_helper;
