// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Numeric and geometric searches used by the task engine.
//!
//! Everything in this crate is synchronous and bounded: every search runs
//! to completion (or gives up) within a single call and never holds state
//! between calls.

pub mod dijkstra;
pub mod mac_cready;
pub mod zero_finder;

pub use dijkstra::{DijkstraSolution, TaskDijkstraMax, TaskDijkstraMin};
pub use mac_cready::{GlideLeg, solve_chain, solve_legs};
pub use zero_finder::{SearchRange, ZeroFinder};

#[cfg(test)]
mod tests;
