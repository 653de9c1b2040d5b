// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::NaiveTime;
use common::aircraft::{AircraftState, TimeStamp};
use common::geo::GeoPoint;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("trace can not be read: {0}")]
    Csv(#[from] csv::Error),
    #[error("fix {index} has no valid location")]
    InvalidFix { index: usize },
    #[error("fix {index} is older than its predecessor")]
    TimeGoesBack { index: usize },
    #[error("trace has no fixes")]
    EmptyTrace,
}

/// A single line of a trace file.
///
/// Ground speed and track are derived from the neighbouring fixes if
/// missing, a fix counts as flying unless stated otherwise.
#[derive(Debug, Deserialize)]
struct TraceRecord {
    time: NaiveTime,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    ground_speed: Option<f64>,
    track: Option<f64>,
    flying: Option<bool>,
}

/// Reads a trace in CSV format with the header
/// `time,latitude,longitude,altitude[,ground_speed][,track][,flying]`.
pub fn read_trace(path: &Path) -> Result<Vec<AircraftState>, ReplayError> {
    let reader = csv::Reader::from_path(path)?;
    let states = read_records(reader)?;
    debug!("Read {} fixes from {}", states.len(), path.display());
    Ok(states)
}

/// Same as [`read_trace`] for an already opened source.
pub fn read_trace_from<R: Read>(source: R) -> Result<Vec<AircraftState>, ReplayError> {
    read_records(csv::Reader::from_reader(source))
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<AircraftState>, ReplayError> {
    let mut states: Vec<AircraftState> = Vec::new();
    for (index, record) in reader.deserialize::<TraceRecord>().enumerate() {
        let record = record?;
        let location = GeoPoint::new(record.latitude, record.longitude);
        if !location.is_valid() {
            return Err(ReplayError::InvalidFix { index });
        }

        let mut state = AircraftState::new(location, 0.0, record.altitude);
        state.time = TimeStamp::from_naive_time(&record.time);
        state.flying = record.flying.unwrap_or(true);

        let previous = states.last();
        let elapsed = previous.and_then(|p| state.time.since(&p.time));
        if elapsed.is_some_and(|dt| dt < 0.0) {
            return Err(ReplayError::TimeGoesBack { index });
        }
        state.ground_speed = match (record.ground_speed, previous, elapsed) {
            (Some(speed), _, _) => speed,
            (None, Some(p), Some(dt)) if dt > 0.0 => p.location.distance(&location) / dt,
            _ => 0.0,
        };
        state.track = match (record.track, previous) {
            (Some(track), _) => track,
            (None, Some(p)) if p.location != location => p.location.bearing(&location),
            (None, Some(p)) => p.track,
            (None, None) => 0.0,
        };
        states.push(state);
    }
    Ok(states)
}
