// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Ordered task engine for gliding competitions.
//!
//! An [`OrderedTask`] owns a chain of [`OrderedTaskPoint`]s, each with an
//! [`ObservationZone`]. Per navigation fix the task detects zone transitions,
//! advances the active point, and recomputes the distance bounds and glide
//! solutions that are published as [`common::stats::TaskStats`].

pub mod advance;
pub mod declaration;
pub mod events;
pub mod factory;
pub mod ordered_task;
pub mod point;
pub mod settings;
pub mod solvers;
pub mod test_helper;
pub mod waypoint;
pub mod zone;

pub use advance::{AdvanceMode, TaskAdvance};
pub use events::{NullTaskEvents, TaskEvents};
pub use factory::{FactoryType, TaskValidationError};
pub use ordered_task::OrderedTask;
pub use point::{ActiveState, OrderedTaskPoint, TaskPointKind};
pub use settings::{OrderedTaskSettings, TaskBehaviour};
pub use waypoint::{Waypoint, WaypointPtr, WaypointStore, Waypoints};
pub use zone::ObservationZone;

#[cfg(test)]
mod tests;
