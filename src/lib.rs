// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! GestureOS - session core for hand-gesture desktop control
//!
//! Coordinates a live tracking session that emits detection events, a
//! single-flight per-gesture training session (countdown, then capture),
//! and a periodic telemetry sampler, and publishes them as one stream of
//! immutable snapshots.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Session Coordinator                     │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌─────────┐                │
//! │  │ Tracking │   │ Training │   │ Metrics │  ← timer ticks │
//! │  │ Session  │   │ Session  │   │ Sampler │                │
//! │  └──────────┘   └──────────┘   └─────────┘                │
//! │       ↑               ↓             ↓                     │
//! │  DetectorSource  ┌─────────────────────────────┐          │
//! │  ActionExecutor  │   Event Bus (snapshots)     │ → UI     │
//! │                  └─────────────────────────────┘          │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod catalog;
pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod metrics;
pub mod sessions;

// Re-exports for convenience
pub use actions::{ActionError, ActionExecutor, LoggingExecutor};
pub use catalog::{Difficulty, GestureCatalog, GestureDefinition};
pub use config::Config;
pub use crate::core::{Change, ChangeReceiver, SessionCoordinator, SessionEvent, Snapshot, Subscription};
pub use detection::{DetectionEvent, DetectorSource, SimulatedDetector};
pub use error::SessionError;
pub use metrics::{HealthGrade, MetricsSnapshot};
pub use sessions::{TrainingPhase, TrainingState, TrackingState};

/// GestureOS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GestureOS name
pub const NAME: &str = "GestureOS";

/// Build info
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION.to_string(),
        target: std::env::consts::ARCH.to_string(),
        os: std::env::consts::OS.to_string(),
    }
}

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version string
    pub version: String,
    /// Target architecture
    pub target: String,
    /// Operating system
    pub os: String,
}
