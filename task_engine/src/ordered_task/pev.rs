// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::OrderedTask;
use crate::settings::TimeWindow;
use chrono::{Duration, NaiveTime, Timelike};
use common::aircraft::AircraftState;
use tracing::{debug, info};

impl OrderedTask {
    /// Records a pilot event pressed at `time`. It is applied to the start
    /// gate in the next update cycle.
    ///
    /// The gate check uses the time of the last update cycle, not `time`.
    ///
    /// # Returns
    /// `false` if the event is ignored: before the first update or, for
    /// starts scored by pilot event, while the start gate is still closed.
    /// Tasks without a start have no gate to check.
    pub fn set_pev(&mut self, time: NaiveTime) -> bool {
        if !self.last_state_time.is_defined() {
            debug!("Ignoring pilot event before the first fix");
            return false;
        }
        let constraints = &self.settings.start_constraints;
        if self.has_start() && constraints.score_pev && !constraints.open_time_span.has_begun(self.last_state_time) {
            debug!("Ignoring pilot event, start gate not open");
            return false;
        }
        self.pev_received = true;
        self.pev_receive_time = Some(time);
        true
    }

    pub fn pev_received(&self) -> bool {
        self.pev_received
    }

    /// Opens the start gate from a received pilot event.
    ///
    /// The gate opens at the minute of `state` plus the wait time, rounded
    /// up to the next minute if the event was not pressed on a full minute.
    /// For starts scored by pilot event the next start exit is accepted
    /// regardless of speed and height and the gate stays open, otherwise it
    /// closes after the start window.
    pub(crate) fn update_after_pev(&mut self, state: &AircraftState, pev_time: NaiveTime) {
        self.pev_received = false;

        let Some(seconds) = state.time.seconds().filter(|s| *s >= 0.0) else {
            return;
        };
        let Some(now) = state.time.to_naive_time() else {
            return;
        };
        let Some(mut start) = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0) else {
            return;
        };

        let constraints = &mut self.settings.start_constraints;
        let wait_minutes = constraints.pev_start_wait_time.num_minutes();
        if wait_minutes > 0 {
            start += Duration::minutes(wait_minutes);
            if pev_time.second() > 0 {
                start += Duration::minutes(1);
            }
        }

        let window = if constraints.score_pev {
            self.stats.pev_based_advance_ready = true;
            TimeWindow::new(Some(start), None)
        } else {
            let length = constraints.pev_start_window.num_minutes();
            let end = (length > 0).then(|| start + Duration::minutes(length));
            TimeWindow::new(Some(start), end)
        };

        info!(
            "Start gate opened by pilot event at {:.0} s: {:?} - {:?}",
            seconds, window.start, window.end
        );
        constraints.open_time_span = window;
    }
}
