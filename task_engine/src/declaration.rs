// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! JSON task declarations.
//!
//! A declaration describes a task by its type, settings and points. Building
//! it resolves the waypoints against a [`WaypointStore`] and appends the
//! points one by one, so a declaration is subject to the same chain rules
//! as interactive editing.

use crate::factory::FactoryType;
use crate::ordered_task::OrderedTask;
use crate::point::{OrderedTaskPoint, TaskPointKind};
use crate::settings::{OrderedTaskSettings, TaskBehaviour};
use crate::waypoint::{Waypoint, WaypointStore};
use crate::zone::ObservationZone;
use common::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DeclarationError {
    #[error("Failed to read task declaration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid task declaration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Waypoint {0} has an invalid location")]
    InvalidLocation(String),

    #[error("Point {index} of type {kind} is not allowed at its position")]
    Rejected { index: usize, kind: TaskPointKind },

    #[error("Optional start {0} is not a start point")]
    InvalidOptionalStart(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointDeclaration {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDeclaration {
    #[serde(rename = "type")]
    pub kind: TaskPointKind,
    pub waypoint: WaypointDeclaration,
    /// Zone of the point, the default zone of the task type if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<ObservationZone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDeclaration {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub factory: FactoryType,
    /// Task rules, the defaults of the engine configuration if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<OrderedTaskSettings>,
    pub points: Vec<PointDeclaration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_starts: Vec<PointDeclaration>,
}

impl PointDeclaration {
    fn from_point(point: &OrderedTaskPoint) -> Self {
        let waypoint = point.waypoint();
        PointDeclaration {
            kind: point.kind(),
            waypoint: WaypointDeclaration {
                name: waypoint.name.clone(),
                latitude: waypoint.location.latitude,
                longitude: waypoint.location.longitude,
                elevation: waypoint.elevation,
            },
            zone: Some(*point.zone()),
        }
    }

    fn to_point(&self, factory: FactoryType, store: &mut dyn WaypointStore) -> Result<OrderedTaskPoint, DeclarationError> {
        let declared = &self.waypoint;
        let location = GeoPoint::new(declared.latitude, declared.longitude);
        if !location.is_valid() {
            return Err(DeclarationError::InvalidLocation(declared.name.clone()));
        }
        let waypoint = store.check_exists_or_append(&Arc::new(Waypoint::new(
            &declared.name,
            location,
            declared.elevation,
        )));
        let zone = self.zone.unwrap_or_else(|| factory.default_zone(self.kind));
        Ok(OrderedTaskPoint::new(self.kind, waypoint, zone))
    }
}

impl TaskDeclaration {
    pub fn from_json(json: &str) -> Result<Self, DeclarationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, DeclarationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, DeclarationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describes the structure of `task`, without any flight state.
    pub fn from_task(task: &OrderedTask) -> Self {
        TaskDeclaration {
            name: task.name().to_string(),
            factory: task.factory_type(),
            settings: Some(*task.ordered_task_settings()),
            points: task.points().iter().map(PointDeclaration::from_point).collect(),
            optional_starts: task
                .optional_starts()
                .iter()
                .map(PointDeclaration::from_point)
                .collect(),
        }
    }

    /// Creates the declared task.
    ///
    /// # Errors
    /// [`DeclarationError::Rejected`] if a point may not follow its
    /// predecessor, e.g. a point after the finish.
    pub fn build(&self, behaviour: TaskBehaviour, store: &mut dyn WaypointStore) -> Result<OrderedTask, DeclarationError> {
        let mut task = OrderedTask::new(behaviour);
        task.set_factory(self.factory);
        task.set_name(&self.name);
        task.set_ordered_task_settings(self.settings.unwrap_or(behaviour.ordered_defaults));

        for (index, declared) in self.points.iter().enumerate() {
            let point = declared.to_point(self.factory, store)?;
            if !task.append(&point) {
                return Err(DeclarationError::Rejected {
                    index,
                    kind: declared.kind,
                });
            }
        }
        for (index, declared) in self.optional_starts.iter().enumerate() {
            if declared.kind != TaskPointKind::Start {
                return Err(DeclarationError::InvalidOptionalStart(index));
            }
            let point = declared.to_point(self.factory, store)?;
            task.append_optional_start(&point);
        }

        task.update_geometry();
        info!(
            "Loaded {} task {} with {} points",
            self.factory,
            self.name,
            task.task_size()
        );
        Ok(task)
    }
}
