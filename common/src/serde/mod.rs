// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! `#[serde(with = ...)]` helpers for human readable settings files.

pub mod duration;
pub mod time;
