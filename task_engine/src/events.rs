// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::point::OrderedTaskPoint;

/// Receiver of notifications from the transition checks of a task.
///
/// Notifications are fire and forget. Implementations must return quickly,
/// they are called from within the update cycle while the task is borrowed.
/// All methods default to doing nothing.
pub trait TaskEvents: Send + Sync {
    /// The aircraft entered the zone of `point`.
    fn enter_transition(&self, _point: &OrderedTaskPoint, _index: Option<usize>) {}

    /// The aircraft left the zone of `point`.
    fn exit_transition(&self, _point: &OrderedTaskPoint, _index: Option<usize>) {}

    /// The active task point changed to `index`.
    fn active_advanced(&self, _point: &OrderedTaskPoint, _index: usize) {}

    /// The pilot should arm the advance to the next point.
    fn request_arm(&self, _point: &OrderedTaskPoint) {}

    fn task_start(&self) {}

    fn task_finish(&self) {}
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTaskEvents;

impl TaskEvents for NullTaskEvents {}
