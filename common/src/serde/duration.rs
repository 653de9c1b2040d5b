// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! `chrono::Duration` as `"HH:MM:SS"` (below one day).

use chrono::{Duration, NaiveTime, Timelike};
use serde::{self, Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M:%S";

pub fn duration_to_string<S: Serializer>(duration: &Duration) -> Result<String, S::Error> {
    let total_seconds = u32::try_from(duration.num_seconds())
        .map_err(|_| serde::ser::Error::custom("negative duration"))?;

    let time = NaiveTime::from_num_seconds_from_midnight_opt(total_seconds, 0)
        .ok_or_else(|| serde::ser::Error::custom("duration exceeds one day"))?;

    Ok(time.format(FORMAT).to_string())
}

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = duration_to_string::<S>(duration)?;
    serializer.serialize_str(&s)
}

/// Deserialize a string like "01:30:00" into a `chrono::Duration`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let time = NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)?;

    Ok(Duration::seconds(i64::from(time.num_seconds_from_midnight())))
}
