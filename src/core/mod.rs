//! Core module - the session coordinator and its plumbing

mod coordinator;
mod scheduler;
mod event_bus;

pub use coordinator::{CoordinatorBuilder, SessionCoordinator};
pub use scheduler::TimerSlot;
pub use event_bus::{Change, ChangeReceiver, EventBus, SessionEvent, Subscription};

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::catalog::GestureCatalog;
use crate::metrics::MetricsSnapshot;
use crate::sessions::{TrackingState, TrainingState};

/// Immutable view of everything the coordinator owns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tracking: TrackingState,
    pub training: TrainingState,
    pub completed: BTreeSet<String>,
    pub metrics: MetricsSnapshot,
    pub gestures_detected: u64,
    pub summary: TrainingSummary,
}

/// Catalog-wide training progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    /// Percent of the catalog trained
    pub completion_rate: f64,
    /// Sum of required samples over trained gestures
    pub completed_samples: u64,
}

impl TrainingSummary {
    pub fn compute(catalog: &GestureCatalog, completed: &BTreeSet<String>) -> Self {
        let total = catalog.len();
        let trained = catalog.iter().filter(|g| completed.contains(&g.id));

        let (count, samples) = trained.fold((0usize, 0u64), |(n, s), g| {
            (n + 1, s + u64::from(g.required_samples))
        });

        Self {
            total,
            completed: count,
            remaining: total - count,
            completion_rate: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
            completed_samples: samples,
        }
    }
}
