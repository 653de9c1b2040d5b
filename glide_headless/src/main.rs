// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

mod task_log;

use clap::Parser;
use common::glide::GlidePolar;
use module_core::{EventBus, Module};
use replay::TraceReplayModule;
use std::path::PathBuf;
use std::time::Duration;
use task_engine::TaskBehaviour;
use task_engine::declaration::TaskDeclaration;
use task_engine::waypoint::Waypoints;
use task_log::TaskLog;
use task_manager::TaskManager;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Task declaration in JSON format.
    #[arg(short, long)]
    task: PathBuf,
    /// Flight trace in CSV format.
    #[arg(short = 'r', long)]
    trace: PathBuf,
    /// Task behaviour settings in JSON format.
    #[arg(short, long)]
    behaviour: Option<PathBuf>,
    /// MacCready setting in m/s.
    #[arg(short, long, default_value_t = 1.0)]
    mc: f64,
    /// Delay between two replayed fixes.
    #[arg(short, long, default_value_t = 10)]
    interval_ms: u64,
}

fn load_behaviour(cli: &Cli) -> Result<TaskBehaviour, ()> {
    let Some(path) = &cli.behaviour else {
        return Ok(TaskBehaviour::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| {
        error!("Failed to read {}. Error: {}", path.display(), e);
    })?;
    serde_json::from_str(&json).map_err(|e| {
        error!("Invalid task behaviour {}. Error: {}", path.display(), e);
    })
}

fn create_task_manager(eb: &EventBus, cli: &Cli) -> Result<TaskManager, ()> {
    let behaviour = load_behaviour(cli)?;
    let declaration = TaskDeclaration::load(&cli.task).map_err(|e| {
        error!("Failed to load task {}. Error: {}", cli.task.display(), e);
    })?;
    let task = declaration.build(behaviour, &mut Waypoints::new()).map_err(|e| {
        error!("Failed to build task {}. Error: {}", cli.task.display(), e);
    })?;
    info!(
        "Task {} with {} points, nominal {:.1} km",
        task.name(),
        task.task_size(),
        task.stats().distance_nominal / 1000.0
    );
    Ok(TaskManager::new(eb.context(), task, GlidePolar::default().with_mc(cli.mc)))
}

fn create_replay_module(eb: &EventBus, cli: &Cli) -> Result<TraceReplayModule, ()> {
    let states = replay::read_trace(&cli.trace).map_err(|e| {
        error!("Failed to read trace {}. Error: {}", cli.trace.display(), e);
    })?;
    TraceReplayModule::new(eb.context(), states, Duration::from_millis(cli.interval_ms)).map_err(|e| {
        error!("Failed to create replay. Error: {}", e);
    })
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let eb = EventBus::default();
    let mut task_manager = create_task_manager(&eb, &cli)?;
    let mut task_log = TaskLog::new(eb.context());
    let mut replay = create_replay_module(&eb, &cli)?;

    info!("Starting modules...");
    let (manager, log, replay) = tokio::join!(task_manager.run(), task_log.run(), replay.run());
    manager.and(log).and(replay)
}
