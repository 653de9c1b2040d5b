// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::point::{OrderedTaskPoint, TaskPointKind};
use common::aircraft::AircraftState;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Policy for moving to the next task point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceMode {
    /// The pilot selects the active point.
    Manual,
    /// Advance as soon as a point is achieved.
    #[default]
    Auto,
    /// The start has to be armed by the pilot, all other points advance
    /// automatically.
    ArmStart,
    /// Every point has to be armed by the pilot.
    ArmAll,
}

/// Decides when the active task point advances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskAdvance {
    mode: AdvanceMode,
    armed: bool,
    request_armed: bool,
}

impl TaskAdvance {
    pub fn new(mode: AdvanceMode) -> Self {
        TaskAdvance {
            mode,
            ..TaskAdvance::default()
        }
    }

    pub fn mode(&self) -> AdvanceMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AdvanceMode) {
        self.mode = mode;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arms or disarms the advance. Arming clears a pending request.
    pub fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
        if armed {
            self.request_armed = false;
        }
    }

    pub fn toggle_armed(&mut self) -> bool {
        self.set_armed(!self.armed);
        self.armed
    }

    /// `true` if the pilot should be asked to arm the advance.
    pub fn need_to_arm(&self) -> bool {
        self.request_armed
    }

    pub fn reset(&mut self) {
        self.armed = false;
        self.request_armed = false;
    }

    /// Decides whether `point` is done and the next point becomes active.
    ///
    /// `x_exit` tells whether the point was exited in this cycle.
    pub fn check_ready_to_advance(&mut self, point: &OrderedTaskPoint, state: &AircraftState, x_exit: bool) -> bool {
        let ready = Self::is_state_ready(point, state, x_exit);
        if self.armed {
            self.request_armed = false;
        }

        match self.mode {
            AdvanceMode::Manual => false,
            AdvanceMode::Auto => ready,
            AdvanceMode::ArmStart if point.kind() != TaskPointKind::Start => ready,
            AdvanceMode::ArmStart | AdvanceMode::ArmAll => {
                if self.armed {
                    ready
                } else {
                    if ready {
                        self.request_armed = true;
                    }
                    false
                }
            }
        }
    }

    fn is_state_ready(point: &OrderedTaskPoint, state: &AircraftState, x_exit: bool) -> bool {
        match point.kind() {
            TaskPointKind::Start => x_exit || point.has_exited(),
            TaskPointKind::Intermediate => point.has_entered(),
            TaskPointKind::Aat => point.has_entered() && (x_exit || point.is_close_to_target(state)),
            TaskPointKind::Finish => false,
        }
    }
}
