// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::stats::TaskStats;
use module_core::{EventKind, Module, ModuleCtx, TaskPointInfo};
use tracing::{debug, error, info};

/// Writes the progress of the task to the log.
pub struct TaskLog {
    ctx: ModuleCtx,
    last_stats: Option<TaskStats>,
}

fn describe(point: &TaskPointInfo) -> String {
    match point.index {
        Some(index) => format!("{} ({})", point.name, index),
        None => point.name.clone(),
    }
}

impl TaskLog {
    pub fn new(ctx: ModuleCtx) -> Self {
        TaskLog { ctx, last_stats: None }
    }

    fn log_summary(&self) {
        let Some(stats) = &self.last_stats else {
            info!("No fix was processed");
            return;
        };
        info!(
            "Task {}: scored {:.1} km of nominal {:.1} km, travelled {:.1} km",
            if stats.task_finished { "finished" } else { "not finished" },
            stats.distance_scored / 1000.0,
            stats.distance_nominal / 1000.0,
            stats.total.travelled / 1000.0
        );
        if let Some(speed) = stats.total.speed_travelled() {
            info!("Average task speed {:.1} km/h", speed * 3.6);
        }
    }
}

#[async_trait::async_trait]
impl Module for TaskLog {
    async fn run(&mut self) -> Result<(), ()> {
        loop {
            let event = match self.ctx.receiver.recv().await {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    debug!("Task log skipped {} events", n);
                    continue;
                }
                Err(e) => {
                    error!("Event bus failed: {}", e);
                    return Err(());
                }
            };
            match event.kind {
                EventKind::QuitEvent => {
                    self.log_summary();
                    return Ok(());
                }
                EventKind::EnterTransitionEvent(point) => info!("Entered {}", describe(&point)),
                EventKind::ExitTransitionEvent(point) => info!("Left {}", describe(&point)),
                EventKind::ActiveAdvancedEvent(point) => info!("Next task point {}", describe(&point)),
                EventKind::RequestArmEvent(point) => info!("Arm the advance at {}", describe(&point)),
                EventKind::TaskStartEvent => info!("Task started"),
                EventKind::TaskFinishEvent => info!("Task finished"),
                EventKind::TaskStatsEvent(stats) => {
                    debug!(
                        "Active {} remaining {:.1} km",
                        stats.active_index,
                        stats.total.remaining / 1000.0
                    );
                    self.last_stats = Some(*stats);
                }
                _ => (),
            }
        }
    }
}
