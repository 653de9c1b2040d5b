// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Replays a recorded flight trace onto the event bus.

pub mod trace;

use common::aircraft::AircraftState;
use module_core::{EventKind, Module, ModuleCtx};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub use trace::{ReplayError, read_trace, read_trace_from};

/// Publishes the fixes of a trace one by one at a fixed interval.
///
/// After the last fix a [`EventKind::QuitEvent`] is published, which stops
/// all modules on the bus.
pub struct TraceReplayModule {
    ctx: ModuleCtx,
    states: Vec<AircraftState>,
    interval: Duration,
}

impl TraceReplayModule {
    /// # Errors
    /// [`ReplayError::EmptyTrace`] if there is nothing to replay.
    pub fn new(ctx: ModuleCtx, states: Vec<AircraftState>, interval: Duration) -> Result<Self, ReplayError> {
        if states.is_empty() {
            return Err(ReplayError::EmptyTrace);
        }
        Ok(TraceReplayModule { ctx, states, interval })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[async_trait::async_trait]
impl Module for TraceReplayModule {
    async fn run(&mut self) -> Result<(), ()> {
        let mut timer = tokio::time::interval(self.interval);
        let mut next = 0;
        info!("Replaying {} fixes", self.states.len());
        loop {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            if let EventKind::QuitEvent = event.kind {
                                debug!("Replay stopped after {} fixes", next);
                                return Ok(());
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => (),
                        Err(e) => {
                            error!("Event bus failed: {}", e);
                            return Err(());
                        }
                    }
                }
                _ = timer.tick() => {
                    let Some(state) = self.states.get(next) else {
                        info!("Replay finished");
                        if self.ctx.publish_event(EventKind::QuitEvent).is_err() {
                            warn!("Nobody listens to the end of the replay");
                        }
                        return Ok(());
                    };
                    if let Err(e) = self.ctx.publish_event(EventKind::AircraftStateEvent(Arc::new(*state))) {
                        warn!("Fix {} not delivered: {}", next, e);
                    }
                    next += 1;
                }
            }
        }
    }
}
