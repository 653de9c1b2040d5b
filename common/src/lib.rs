// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common module for the task engine
//!
//! Provides the data types that are shared by every crate of the workspace:
//! geographic and projected geometry, the aircraft state, the glide polar
//! model and the derived task statistics.

pub mod aircraft;
pub mod flat;
pub mod geo;
pub mod glide;
pub mod search_point;
pub mod serde;
pub mod stats;

#[cfg(test)]
mod tests;
