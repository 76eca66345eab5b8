// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! GestureOS - headless session driver
//!
//! Runs the session coordinator without a UI: starts tracking, optionally
//! trains one gesture, logs every change and prints the final snapshot.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use gestureos::{Change, Config, SessionCoordinator, SessionEvent, NAME, VERSION};

/// GestureOS - hand-gesture desktop control session core
#[derive(Parser, Debug)]
#[command(name = "gestureos")]
#[command(author = "GestureOS Project")]
#[command(version = VERSION)]
#[command(about = "Gesture tracking, training and telemetry session driver")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Train this gesture id while tracking runs
    #[arg(long)]
    train: Option<String>,

    /// Do not start the tracking session
    #[arg(long)]
    no_tracking: bool,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// List the gesture catalog and exit
    #[arg(long)]
    list_gestures: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{} v{}", NAME, VERSION);

    // Load or create configuration
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_create(&config_path)?;
    info!("Configuration loaded from {:?}", config_path);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config, args))
}

async fn run(config: Config, args: Args) -> Result<()> {
    let coordinator = SessionCoordinator::new(config)?;

    if args.list_gestures {
        for gesture in coordinator.catalog().iter() {
            println!(
                "{:<12} {:<14} {:<18} {:?}, {} samples",
                gesture.id, gesture.name, gesture.mapped_action, gesture.difficulty, gesture.required_samples
            );
        }
        return Ok(());
    }

    let _subscription = coordinator.on_change(log_change);

    if !args.no_tracking {
        coordinator.start_tracking();
    }
    if let Some(gesture_id) = &args.train {
        coordinator.start_training(gesture_id)?;
    }

    match args.duration_secs {
        Some(secs) => {
            info!("Running for {}s", secs);
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
            }
        }
        None => {
            info!("Press Ctrl+C to shutdown");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received");
        }
    }

    coordinator.shutdown();
    let snapshot = coordinator.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
    } else {
        let health = snapshot.metrics.health();
        info!("Gestures detected: {}", snapshot.gestures_detected);
        info!(
            "Trained: {}/{} ({:.0}%, {} samples)",
            snapshot.summary.completed,
            snapshot.summary.total,
            snapshot.summary.completion_rate,
            snapshot.summary.completed_samples
        );
        info!("System health: {:?} ({:.1})", health.grade, health.score);
    }

    Ok(())
}

fn log_change(event: &SessionEvent) {
    let snapshot = &event.snapshot;
    match &event.change {
        Change::Metrics => {
            let m = &snapshot.metrics;
            debug!(
                "#{} metrics: {:.0} fps, {:.0} ms, cpu {:.0}%, mem {:.0}%, accuracy {:.1}%, {:?}",
                event.sequence,
                m.fps,
                m.latency_ms,
                m.cpu_pct,
                m.mem_pct,
                m.accuracy_pct,
                m.health().grade
            );
        }
        Change::Detection(detection) => match &detection.gesture_id {
            Some(id) => info!("#{} detected {} ({:.0}%)", event.sequence, id, detection.confidence),
            None => debug!("#{} no gesture", event.sequence),
        },
        Change::CaptureProgress { gesture_id, progress } => {
            debug!("#{} capturing {}: {:.0}%", event.sequence, gesture_id, progress);
        }
        change => info!("#{} {:?}", event.sequence, change),
    }
}
