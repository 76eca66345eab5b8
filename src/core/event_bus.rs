// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Event bus for publishing coordinator changes

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::trace;
use uuid::Uuid;

use super::Snapshot;
use crate::detection::DetectionEvent;

/// What changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    TrackingStarted,
    TrackingStopped,
    Detection(DetectionEvent),
    TrainingStarted { gesture_id: String, run_id: Uuid },
    Countdown { gesture_id: String, remaining: u32 },
    CaptureStarted { gesture_id: String },
    CaptureProgress { gesture_id: String, progress: f64 },
    /// Snapshot shows the run at `Complete`
    TrainingCompleted { gesture_id: String, run_id: Uuid },
    /// Snapshot shows training back at `Idle` after a completion
    TrainingIdle,
    TrainingStopped { gesture_id: String },
    GestureReset { gesture_id: String },
    Metrics,
}

impl Change {
    pub fn is_metrics(&self) -> bool {
        matches!(self, Change::Metrics)
    }
}

/// A change plus the full state right after it
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub change: Change,
    pub snapshot: Arc<Snapshot>,
}

/// One subscriber's queue
struct Outlet {
    tx: mpsc::UnboundedSender<SessionEvent>,
    pending_metrics: Arc<AtomicUsize>,
}

/// Per-subscriber fan-out of session events.
///
/// Session changes are queued without limit and never dropped. Metrics
/// updates are skipped for a subscriber that already has `metrics_backlog`
/// of them unread. Publishing happens under the coordinator's state lock, so
/// sequence numbers follow mutation order.
pub struct EventBus {
    outlets: Mutex<Vec<Outlet>>,
    metrics_backlog: usize,
    sequence: AtomicU64,
}

impl EventBus {
    pub fn new(metrics_backlog: usize) -> Self {
        Self {
            outlets: Mutex::new(Vec::new()),
            metrics_backlog,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, change: Change, snapshot: Arc<Snapshot>) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let event = SessionEvent {
            sequence,
            timestamp: Utc::now(),
            change,
            snapshot,
        };

        let is_metrics = event.change.is_metrics();
        let mut outlets = self.outlets.lock();
        // Closed receivers are pruned here
        outlets.retain(|outlet| {
            if is_metrics {
                if outlet.pending_metrics.load(Ordering::Acquire) >= self.metrics_backlog {
                    trace!("Subscriber behind on metrics, skipping #{}", sequence);
                    return !outlet.tx.is_closed();
                }
                outlet.pending_metrics.fetch_add(1, Ordering::AcqRel);
            }
            outlet.tx.send(event.clone()).is_ok()
        });
        sequence
    }

    pub fn subscribe(&self) -> ChangeReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending_metrics = Arc::new(AtomicUsize::new(0));
        self.outlets.lock().push(Outlet {
            tx,
            pending_metrics: pending_metrics.clone(),
        });
        ChangeReceiver { rx, pending_metrics }
    }

    pub fn receiver_count(&self) -> usize {
        let mut outlets = self.outlets.lock();
        outlets.retain(|outlet| !outlet.tx.is_closed());
        outlets.len()
    }

    /// Forward every event to `listener` on its own task
    pub fn listen<F>(&self, runtime: &Handle, mut listener: F) -> Subscription
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        let mut rx = self.subscribe();
        let handle = runtime.spawn(async move {
            while let Some(event) = rx.recv().await {
                listener(&event);
            }
        });

        Subscription { handle: Some(handle) }
    }
}

/// Receiving end of one subscription. Dropping it unsubscribes.
pub struct ChangeReceiver {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    pending_metrics: Arc<AtomicUsize>,
}

impl ChangeReceiver {
    /// Next event, or `None` once the bus is gone
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        let event = self.rx.recv().await?;
        self.received(&event);
        Some(event)
    }

    pub fn try_recv(&mut self) -> Result<SessionEvent, TryRecvError> {
        let event = self.rx.try_recv()?;
        self.received(&event);
        Ok(event)
    }

    fn received(&self, event: &SessionEvent) {
        if event.change.is_metrics() {
            self.pending_metrics.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// Live listener registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
