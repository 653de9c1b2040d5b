// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Optional time of day as `"HH:MM:SS"`, `null` for an unbounded value.

use chrono::NaiveTime;
use serde::{self, Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M:%S";
const SHORT_FORMAT: &str = "%H:%M";

pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

/// Accepts `"12:30:00"`, `"12:30"` or `null`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(s) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    NaiveTime::parse_from_str(&s, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(&s, SHORT_FORMAT))
        .map(Some)
        .map_err(serde::de::Error::custom)
}
