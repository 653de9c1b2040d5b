// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Task types and their structural rules.

use crate::point::{OrderedTaskPoint, TaskPointKind};
use crate::waypoint::WaypointPtr;
use crate::zone::ObservationZone;
use serde::{Deserialize, Serialize};
use std::mem::discriminant;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryType {
    /// Racing task over fixed turn points.
    #[default]
    Racing,
    /// Assigned area task.
    Aat,
    /// Modified area task, turn points are added while flying.
    Mat,
    /// FAI badge and record task.
    FaiGeneral,
}

/// Structural rules of a task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConstraints {
    pub min_points: usize,
    pub max_points: usize,
    /// Kind of all points between start and finish.
    pub intermediate_kind: TaskPointKind,
    /// All turn points must share the zone shape.
    pub homogeneous_tps: bool,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    #[error("task has no points")]
    EmptyTask,
    #[error("task has too few points")]
    TooFewPoints,
    #[error("task has too many points")]
    TooManyPoints,
    #[error("task does not begin with a start point")]
    NoValidStart,
    #[error("task does not end with a finish point")]
    NoValidFinish,
    #[error("turn point {0} has the wrong type for this task")]
    WrongPointType(usize),
    #[error("turn points have different observation zones")]
    NotHomogeneous,
}

impl FactoryType {
    pub fn constraints(&self) -> FactoryConstraints {
        match self {
            FactoryType::Racing => FactoryConstraints {
                min_points: 2,
                max_points: 13,
                intermediate_kind: TaskPointKind::Intermediate,
                homogeneous_tps: false,
            },
            FactoryType::Aat => FactoryConstraints {
                min_points: 2,
                max_points: 13,
                intermediate_kind: TaskPointKind::Aat,
                homogeneous_tps: false,
            },
            FactoryType::Mat => FactoryConstraints {
                min_points: 2,
                max_points: 30,
                intermediate_kind: TaskPointKind::Intermediate,
                homogeneous_tps: true,
            },
            FactoryType::FaiGeneral => FactoryConstraints {
                min_points: 2,
                max_points: 13,
                intermediate_kind: TaskPointKind::Intermediate,
                homogeneous_tps: true,
            },
        }
    }

    /// Zone a new point of `kind` gets in a task of this type.
    pub fn default_zone(&self, kind: TaskPointKind) -> ObservationZone {
        match (self, kind) {
            (_, TaskPointKind::Start) => ObservationZone::Line { length: 1000.0 },
            (_, TaskPointKind::Finish) => ObservationZone::Cylinder { radius: 1000.0 },
            (_, TaskPointKind::Aat) => ObservationZone::Cylinder { radius: 10_000.0 },
            (FactoryType::Mat, _) => ObservationZone::Cylinder { radius: 500.0 },
            (_, TaskPointKind::Intermediate) => ObservationZone::Sector {
                radius: 10_000.0,
                half_angle: 45.0,
            },
        }
    }

    pub fn create_start(&self, waypoint: WaypointPtr) -> OrderedTaskPoint {
        OrderedTaskPoint::new(TaskPointKind::Start, waypoint, self.default_zone(TaskPointKind::Start))
    }

    pub fn create_intermediate(&self, waypoint: WaypointPtr) -> OrderedTaskPoint {
        let kind = self.constraints().intermediate_kind;
        OrderedTaskPoint::new(kind, waypoint, self.default_zone(kind))
    }

    pub fn create_finish(&self, waypoint: WaypointPtr) -> OrderedTaskPoint {
        OrderedTaskPoint::new(TaskPointKind::Finish, waypoint, self.default_zone(TaskPointKind::Finish))
    }

    /// Checks `points` against the rules of this task type.
    ///
    /// # Returns
    /// All violations, an empty list for a valid task.
    pub fn validate(&self, points: &[OrderedTaskPoint]) -> Vec<TaskValidationError> {
        let constraints = self.constraints();
        let mut errors = Vec::new();

        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            errors.push(TaskValidationError::EmptyTask);
            return errors;
        };

        if points.len() < constraints.min_points {
            errors.push(TaskValidationError::TooFewPoints);
        }
        if points.len() > constraints.max_points {
            errors.push(TaskValidationError::TooManyPoints);
        }
        if first.kind() != TaskPointKind::Start {
            errors.push(TaskValidationError::NoValidStart);
        }
        if points.len() < 2 || last.kind() != TaskPointKind::Finish {
            errors.push(TaskValidationError::NoValidFinish);
        }

        let turn_points = points.iter().enumerate().skip(1).take(points.len().saturating_sub(2));
        for (i, point) in turn_points.clone() {
            if point.kind() != constraints.intermediate_kind {
                errors.push(TaskValidationError::WrongPointType(i));
            }
        }

        if constraints.homogeneous_tps {
            let mut shapes = turn_points.map(|(_, p)| discriminant(p.zone()));
            if let Some(shape) = shapes.next()
                && shapes.any(|s| s != shape)
            {
                errors.push(TaskValidationError::NotHomogeneous);
            }
        }

        errors
    }

    /// `true` for competition tasks, badge tasks are not scored.
    pub fn is_scored(&self) -> bool {
        *self != FactoryType::FaiGeneral
    }
}
