// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Session coordinator - owns tracking, training and metrics, and is the only
//! way to mutate them

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::event_bus::{Change, ChangeReceiver, EventBus, SessionEvent, Subscription};
use super::scheduler::{self, TimerSlot};
use super::{Snapshot, TrainingSummary};
use crate::actions::{ActionExecutor, LoggingExecutor};
use crate::catalog::GestureCatalog;
use crate::config::Config;
use crate::detection::{DetectorSource, SimulatedDetector};
use crate::error::SessionError;
use crate::metrics::MetricsSampler;
use crate::sessions::{TrackingSession, TrainingSession, TrainingTick};

/// Single entry point for UI layers.
///
/// Every mutation, whether from a command or a timer tick, runs under one
/// lock and publishes exactly the changes it made, in order.
pub struct SessionCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    catalog: GestureCatalog,
    runtime: Handle,
    executor: Arc<dyn ActionExecutor>,
    bus: EventBus,
    state: Mutex<CoordinatorState>,
}

struct CoordinatorState {
    tracking: TrackingSession,
    tracking_timer: TimerSlot,
    training: TrainingSession,
    training_timer: TimerSlot,
    metrics: MetricsSampler,
    metrics_timer: TimerSlot,
    completed: BTreeSet<String>,
    gestures_detected: u64,
    latest: Arc<Snapshot>,
}

impl SessionCoordinator {
    pub fn builder(config: Config) -> CoordinatorBuilder {
        CoordinatorBuilder::new(config)
    }

    /// Coordinator with the built-in catalog, simulated detector and logging executor
    pub fn new(config: Config) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn catalog(&self) -> &GestureCatalog {
        &self.inner.catalog
    }

    /// Begin producing detection events. No-op if already tracking.
    pub fn start_tracking(&self) {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        if !state.tracking.start() {
            debug!("Tracking already active");
            return;
        }

        let generation = state.tracking_timer.arm();
        let weak = Arc::downgrade(inner);
        let handle = scheduler::every(&inner.runtime, inner.config.timing.detection_interval(), move || {
            weak.upgrade()
                .map(|inner| inner.on_detection_tick(generation))
                .unwrap_or(false)
        });
        state.tracking_timer.attach(handle);

        info!("Tracking started ({} detector)", state.tracking.detector_name());
        inner.publish(&mut state, Change::TrackingStarted);
    }

    /// Stop detection. Once this returns no further detection is published.
    pub fn stop_tracking(&self) {
        let mut state = self.inner.state.lock();
        self.inner.stop_tracking(&mut state);
    }

    /// Start the countdown for `gesture_id`
    pub fn start_training(&self, gesture_id: &str) -> Result<(), SessionError> {
        let inner = &self.inner;
        if !inner.catalog.contains(gesture_id) {
            warn!("Rejected training request for unknown gesture '{}'", gesture_id);
            return Err(SessionError::InvalidGesture(gesture_id.to_string()));
        }

        let mut state = inner.state.lock();
        let run_id = match state.training.start(gesture_id) {
            Ok(run_id) => run_id,
            Err(e) => {
                warn!("Rejected training request: {}", e);
                return Err(e);
            }
        };

        let generation = state.training_timer.arm();
        let weak = Arc::downgrade(inner);
        let handle = scheduler::paced(&inner.runtime, inner.config.timing.countdown_interval(), move || {
            weak.upgrade()
                .and_then(|inner| inner.on_training_tick(generation))
        });
        state.training_timer.attach(handle);

        info!("Training started for '{}' (run {})", gesture_id, run_id);
        inner.publish(
            &mut state,
            Change::TrainingStarted {
                gesture_id: gesture_id.to_string(),
                run_id,
            },
        );
        Ok(())
    }

    /// Abandon the current run without recording it. No-op when idle.
    pub fn stop_training(&self) {
        let mut state = self.inner.state.lock();
        self.inner.stop_training(&mut state);
    }

    /// Forget that `gesture_id` was trained
    pub fn reset_gesture(&self, gesture_id: &str) -> Result<(), SessionError> {
        let inner = &self.inner;
        if !inner.catalog.contains(gesture_id) {
            warn!("Rejected reset for unknown gesture '{}'", gesture_id);
            return Err(SessionError::InvalidGesture(gesture_id.to_string()));
        }

        let mut state = inner.state.lock();
        if state.training.active_gesture() == Some(gesture_id) {
            warn!("Rejected reset for '{}' while it is training", gesture_id);
            return Err(SessionError::ResetWhileTraining(gesture_id.to_string()));
        }

        if state.completed.remove(gesture_id) {
            info!("Training reset for '{}'", gesture_id);
            inner.publish(
                &mut state,
                Change::GestureReset {
                    gesture_id: gesture_id.to_string(),
                },
            );
        } else {
            debug!("'{}' not trained, nothing to reset", gesture_id);
        }
        Ok(())
    }

    /// Current state
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.state.lock().latest.clone()
    }

    /// Raw change stream. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> ChangeReceiver {
        self.inner.bus.subscribe()
    }

    /// Call `listener` for every change, in publish order
    pub fn on_change<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        self.inner.bus.listen(&self.inner.runtime, listener)
    }

    /// Stop tracking, abandon training and halt the metrics sampler
    pub fn shutdown(&self) {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        inner.stop_training(&mut state);
        inner.stop_tracking(&mut state);
        if state.metrics_timer.cancel() {
            info!("Session coordinator shut down");
        }
    }
}

impl Drop for SessionCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn snapshot(&self, state: &CoordinatorState) -> Snapshot {
        Snapshot {
            tracking: state.tracking.state().clone(),
            training: state.training.state().clone(),
            completed: state.completed.clone(),
            metrics: state.metrics.current().clone(),
            gestures_detected: state.gestures_detected,
            summary: TrainingSummary::compute(&self.catalog, &state.completed),
        }
    }

    fn publish(&self, state: &mut CoordinatorState, change: Change) {
        let snapshot = Arc::new(self.snapshot(state));
        state.latest = snapshot.clone();
        self.bus.publish(change, snapshot);
    }

    fn stop_tracking(&self, state: &mut CoordinatorState) {
        state.tracking_timer.cancel();
        if state.tracking.stop() {
            info!("Tracking stopped ({} gestures detected)", state.gestures_detected);
            self.publish(state, Change::TrackingStopped);
        }
    }

    fn stop_training(&self, state: &mut CoordinatorState) {
        state.training_timer.cancel();
        if let Some(gesture_id) = state.training.stop() {
            info!("Training stopped for '{}'", gesture_id);
            self.publish(state, Change::TrainingStopped { gesture_id });
        }
    }

    fn on_detection_tick(&self, generation: u64) -> bool {
        let mut state = self.state.lock();
        if !state.tracking_timer.is_current(generation) {
            return false;
        }

        let Some(event) = state.tracking.tick(&self.catalog) else {
            return false;
        };

        if let Some(gesture_id) = &event.gesture_id {
            state.gestures_detected += 1;
            debug!("Detected '{}' ({:.1}%)", gesture_id, event.confidence);
            self.dispatch(gesture_id, event.confidence);
        }

        self.publish(&mut state, Change::Detection(event));
        true
    }

    fn on_training_tick(&self, generation: u64) -> Option<Duration> {
        let mut state = self.state.lock();
        if !state.training_timer.is_current(generation) {
            return None;
        }

        let timing = &self.config.timing;
        let gesture_id = state.training.state().gesture_id.clone().unwrap_or_default();

        match state.training.tick() {
            TrainingTick::Countdown { remaining } => {
                debug!("Countdown for '{}': {}", gesture_id, remaining);
                self.publish(&mut state, Change::Countdown { gesture_id, remaining });
                Some(timing.countdown_interval())
            }
            TrainingTick::CaptureStarted => {
                info!("Capturing '{}'", gesture_id);
                self.publish(&mut state, Change::CaptureStarted { gesture_id });
                Some(timing.capture_interval())
            }
            TrainingTick::Progress(progress) => {
                self.publish(&mut state, Change::CaptureProgress { gesture_id, progress });
                Some(timing.capture_interval())
            }
            TrainingTick::Completed { gesture_id, run_id } => {
                state.completed.insert(gesture_id.clone());
                info!("Training complete for '{}' (run {})", gesture_id, run_id);
                self.publish(&mut state, Change::TrainingCompleted { gesture_id, run_id });

                state.training.settle();
                state.training_timer.disarm();
                self.publish(&mut state, Change::TrainingIdle);
                None
            }
            TrainingTick::Idle => {
                state.training_timer.disarm();
                None
            }
        }
    }

    fn on_metrics_tick(&self, generation: u64) -> bool {
        let mut state = self.state.lock();
        if !state.metrics_timer.is_current(generation) {
            return false;
        }

        state.metrics.sample();
        self.publish(&mut state, Change::Metrics);
        true
    }

    /// Hand a confident detection to the executor, off the state lock
    fn dispatch(&self, gesture_id: &str, confidence: f64) {
        let actions = &self.config.actions;
        if !actions.dispatch_enabled || confidence < actions.min_confidence {
            return;
        }
        if actions.disabled_gestures.contains(gesture_id) {
            debug!("Action for '{}' is disabled", gesture_id);
            return;
        }
        let Some(gesture) = self.catalog.get(gesture_id) else {
            return;
        };

        let executor = self.executor.clone();
        let gesture_id = gesture.id.clone();
        let action = gesture.mapped_action.clone();
        self.runtime.spawn(async move {
            if let Err(e) = executor.execute(&gesture_id, &action).await {
                warn!("Action '{}' for '{}' failed: {}", action, gesture_id, e);
            }
        });
    }
}

/// Wires injected capabilities into a coordinator
pub struct CoordinatorBuilder {
    config: Config,
    catalog: Option<GestureCatalog>,
    detector: Option<Box<dyn DetectorSource>>,
    executor: Option<Arc<dyn ActionExecutor>>,
    runtime: Option<Handle>,
}

impl CoordinatorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: None,
            detector: None,
            executor: None,
            runtime: None,
        }
    }

    pub fn catalog(mut self, catalog: GestureCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn detector<D: DetectorSource + 'static>(mut self, detector: D) -> Self {
        self.detector = Some(Box::new(detector));
        self
    }

    pub fn executor<E: ActionExecutor + 'static>(mut self, executor: E) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Runtime for timer tasks; defaults to the current one
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Validate config and start the metrics sampler
    pub fn build(self) -> Result<SessionCoordinator> {
        let CoordinatorBuilder {
            config,
            catalog,
            detector,
            executor,
            runtime,
        } = self;

        config.validate()?;
        let catalog = catalog.unwrap_or_default();
        for id in &config.actions.disabled_gestures {
            if !catalog.contains(id) {
                warn!("Disabled action for unknown gesture '{}' has no effect", id);
            }
        }

        let runtime = match runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().context("session coordinator needs a tokio runtime")?,
        };

        let detector: Box<dyn DetectorSource> = match detector {
            Some(detector) => detector,
            None => Box::new(SimulatedDetector::new(&config.detection)),
        };
        let executor: Arc<dyn ActionExecutor> = match executor {
            Some(executor) => executor,
            None => Arc::new(LoggingExecutor),
        };

        let state = CoordinatorState {
            tracking: TrackingSession::new(detector),
            tracking_timer: TimerSlot::new("detection"),
            training: TrainingSession::new(config.timing.capture_step),
            training_timer: TimerSlot::new("training"),
            metrics: MetricsSampler::new(&config.metrics),
            metrics_timer: TimerSlot::new("metrics"),
            completed: BTreeSet::new(),
            gestures_detected: 0,
            latest: Arc::new(Snapshot::default()),
        };

        let inner = Arc::new(Inner {
            bus: EventBus::new(config.events.metrics_backlog),
            config,
            catalog,
            runtime,
            executor,
            state: Mutex::new(state),
        });

        {
            let mut state = inner.state.lock();
            let initial = Arc::new(inner.snapshot(&state));
            state.latest = initial;

            let generation = state.metrics_timer.arm();
            let weak = Arc::downgrade(&inner);
            let handle = scheduler::every(&inner.runtime, inner.config.timing.metrics_interval(), move || {
                weak.upgrade()
                    .map(|inner| inner.on_metrics_tick(generation))
                    .unwrap_or(false)
            });
            state.metrics_timer.attach(handle);
        }

        info!("Session coordinator ready with {} gestures", inner.catalog.len());
        Ok(SessionCoordinator { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionError;
    use crate::detection::DetectionEvent;
    use crate::sessions::{TrainingPhase, COUNTDOWN_TICKS};
    use async_trait::async_trait;
    use tokio::time::sleep;

    struct Always(&'static str, f64);

    impl DetectorSource for Always {
        fn name(&self) -> &str {
            "always"
        }

        fn detect(&mut self, _catalog: &GestureCatalog) -> DetectionEvent {
            DetectionEvent::gesture(self.0, self.1)
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(String, String)>>>);

    #[async_trait]
    impl ActionExecutor for Recorder {
        async fn execute(&self, gesture_id: &str, action: &str) -> Result<(), ActionError> {
            self.0.lock().push((gesture_id.to_string(), action.to_string()));
            Ok(())
        }
    }

    fn always(gesture: &'static str, confidence: f64) -> SessionCoordinator {
        SessionCoordinator::builder(Config::default())
            .detector(Always(gesture, confidence))
            .build()
            .unwrap()
    }

    async fn advance(ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }

    fn drain(rx: &mut ChangeReceiver) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn session_changes(events: &[SessionEvent]) -> Vec<&SessionEvent> {
        events.iter().filter(|e| !e.change.is_metrics()).collect()
    }

    #[test]
    fn test_build_requires_runtime() {
        assert!(SessionCoordinator::new(Config::default()).is_err());
    }

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let mut config = Config::default();
        config.timing.capture_step = 0.0;
        assert!(SessionCoordinator::new(config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_training_runs_to_completion() {
        let coordinator = SessionCoordinator::new(Config::default()).unwrap();
        let mut rx = coordinator.subscribe();

        coordinator.start_training("open-palm").unwrap();
        let training = coordinator.snapshot().training.clone();
        assert_eq!(training.phase, TrainingPhase::Countdown);
        assert_eq!(training.countdown_remaining, COUNTDOWN_TICKS);
        assert_eq!(training.gesture_id.as_deref(), Some("open-palm"));

        advance(3050).await;
        let training = coordinator.snapshot().training.clone();
        assert_eq!(training.phase, TrainingPhase::Capturing);
        assert_eq!(training.capture_progress, 0.0);
        assert_eq!(training.countdown_remaining, 0);

        advance(5000).await;
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.training.phase, TrainingPhase::Idle);
        assert!(snapshot.completed.contains("open-palm"));
        assert_eq!(snapshot.summary.completed, 1);
        assert_eq!(snapshot.summary.completed_samples, 25);

        let events = drain(&mut rx);
        let changes = session_changes(&events);

        let countdown: Vec<u32> = changes
            .iter()
            .filter_map(|e| match e.change {
                Change::Countdown { remaining, .. } => Some(remaining),
                _ => None,
            })
            .collect();
        assert_eq!(countdown, vec![2, 1]);

        let progress: Vec<f64> = changes
            .iter()
            .filter_map(|e| match e.change {
                Change::CaptureProgress { progress, .. } => Some(progress),
                _ => None,
            })
            .collect();
        assert_eq!(progress.len(), 49);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert!(progress.iter().all(|&p| p <= 100.0));

        let completed: Vec<&&SessionEvent> = changes
            .iter()
            .filter(|e| matches!(e.change, Change::TrainingCompleted { .. }))
            .collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].snapshot.training.phase, TrainingPhase::Complete);
        assert_eq!(completed[0].snapshot.training.capture_progress, 100.0);
        assert!(completed[0].snapshot.completed.contains("open-palm"));

        let last = changes.last().unwrap();
        assert_eq!(last.change, Change::TrainingIdle);
        assert_eq!(last.snapshot.training.phase, TrainingPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_training_is_rejected() {
        let coordinator = SessionCoordinator::new(Config::default()).unwrap();
        coordinator.start_training("open-palm").unwrap();

        let err = coordinator.start_training("closed-fist").unwrap_err();
        assert_eq!(err.reason(), "training_in_progress");

        let training = coordinator.snapshot().training.clone();
        assert_eq!(training.gesture_id.as_deref(), Some("open-palm"));
        assert_eq!(training.phase, TrainingPhase::Countdown);
        assert_eq!(training.countdown_remaining, COUNTDOWN_TICKS);

        advance(8100).await;
        let snapshot = coordinator.snapshot();
        assert!(snapshot.completed.contains("open-palm"));
        assert!(!snapshot.completed.contains("closed-fist"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_gesture_is_rejected() {
        let coordinator = SessionCoordinator::new(Config::default()).unwrap();
        let mut rx = coordinator.subscribe();

        assert_eq!(
            coordinator.start_training("wave"),
            Err(SessionError::InvalidGesture("wave".to_string()))
        );
        assert_eq!(
            coordinator.reset_gesture("wave"),
            Err(SessionError::InvalidGesture("wave".to_string()))
        );
        assert_eq!(coordinator.snapshot().training.phase, TrainingPhase::Idle);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_detection() {
        let coordinator = always("peace-sign", 95.0);
        let mut rx = coordinator.subscribe();

        coordinator.start_tracking();
        assert!(coordinator.snapshot().tracking.active);
        advance(500).await;
        coordinator.stop_tracking();

        advance(10_000).await;
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.gestures_detected, 0);
        assert!(snapshot.tracking.last_event.is_none());
        assert!(!snapshot.tracking.active);
        assert!(!drain(&mut rx)
            .iter()
            .any(|e| matches!(e.change, Change::Detection(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_detection_after_stop() {
        let coordinator = always("closed-fist", 90.0);
        let mut rx = coordinator.subscribe();

        coordinator.start_tracking();
        advance(4500).await;
        assert_eq!(coordinator.snapshot().gestures_detected, 2);
        let last = coordinator.snapshot().tracking.last_event.clone().unwrap();
        assert_eq!(last.gesture_id.as_deref(), Some("closed-fist"));

        coordinator.stop_tracking();
        advance(20_000).await;

        let events = drain(&mut rx);
        let stopped_at = events
            .iter()
            .find(|e| e.change == Change::TrackingStopped)
            .map(|e| e.sequence)
            .unwrap();
        assert!(events
            .iter()
            .filter(|e| matches!(e.change, Change::Detection(_)))
            .all(|e| e.sequence < stopped_at));
        assert_eq!(coordinator.snapshot().gestures_detected, 2);
        assert!(coordinator.snapshot().tracking.last_event.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracking_commands_are_idempotent() {
        let coordinator = always("pinch", 90.0);
        let mut rx = coordinator.subscribe();

        coordinator.start_tracking();
        coordinator.start_tracking();
        coordinator.stop_tracking();
        coordinator.stop_tracking();

        let changes: Vec<Change> = drain(&mut rx).into_iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![Change::TrackingStarted, Change::TrackingStopped]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_gesture() {
        let coordinator = SessionCoordinator::new(Config::default()).unwrap();
        let mut rx = coordinator.subscribe();

        // Not trained yet: success, nothing changes
        assert!(coordinator.reset_gesture("open-palm").is_ok());
        assert!(coordinator.snapshot().completed.is_empty());
        assert!(drain(&mut rx).is_empty());

        coordinator.start_training("open-palm").unwrap();
        let err = coordinator.reset_gesture("open-palm").unwrap_err();
        assert_eq!(err, SessionError::ResetWhileTraining("open-palm".to_string()));
        assert_eq!(err.reason(), "training_in_progress");
        // Other gestures can still be reset mid-training
        assert!(coordinator.reset_gesture("pinch").is_ok());

        advance(8100).await;
        assert!(coordinator.snapshot().completed.contains("open-palm"));
        drain(&mut rx);

        coordinator.reset_gesture("open-palm").unwrap();
        assert!(coordinator.snapshot().completed.is_empty());
        let changes: Vec<Change> = drain(&mut rx).into_iter().map(|e| e.change).collect();
        assert_eq!(
            changes,
            vec![Change::GestureReset {
                gesture_id: "open-palm".to_string()
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_training_discards_run() {
        let coordinator = SessionCoordinator::new(Config::default()).unwrap();

        coordinator.start_training("swipe-left").unwrap();
        advance(3550).await;
        let training = coordinator.snapshot().training.clone();
        assert_eq!(training.phase, TrainingPhase::Capturing);
        assert!(training.capture_progress > 0.0);

        coordinator.stop_training();
        assert_eq!(coordinator.snapshot().training.phase, TrainingPhase::Idle);

        // A fresh run restarts the countdown; the old timer must not leak into it
        coordinator.start_training("swipe-left").unwrap();
        advance(1050).await;
        let training = coordinator.snapshot().training.clone();
        assert_eq!(training.phase, TrainingPhase::Countdown);
        assert_eq!(training.countdown_remaining, 2);
        assert_eq!(training.capture_progress, 0.0);

        coordinator.stop_training();
        advance(10_000).await;
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.training.phase, TrainingPhase::Idle);
        assert!(snapshot.completed.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_training_when_idle_is_silent() {
        let coordinator = SessionCoordinator::new(Config::default()).unwrap();
        let mut rx = coordinator.subscribe();
        coordinator.stop_training();
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confident_detection_triggers_action() {
        let recorder = Recorder::default();
        let coordinator = SessionCoordinator::builder(Config::default())
            .detector(Always("open-palm", 90.0))
            .executor(recorder.clone())
            .build()
            .unwrap();

        coordinator.start_tracking();
        advance(2100).await;

        assert_eq!(
            recorder.0.lock().as_slice(),
            &[("open-palm".to_string(), "Play/Pause Media".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_action_is_counted_but_not_dispatched() {
        let recorder = Recorder::default();
        let coordinator = SessionCoordinator::builder(Config::default())
            .detector(Always("thumbs-up", 99.0))
            .executor(recorder.clone())
            .build()
            .unwrap();

        coordinator.start_tracking();
        advance(4100).await;

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.gestures_detected, 2);
        let last = snapshot.tracking.last_event.clone().unwrap();
        assert_eq!(last.gesture_id.as_deref(), Some("thumbs-up"));
        assert!(recorder.0.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enabling_an_action_in_config() {
        let recorder = Recorder::default();
        let mut config = Config::default();
        config.actions.disabled_gestures.remove("thumbs-up");
        let coordinator = SessionCoordinator::builder(config)
            .detector(Always("thumbs-up", 99.0))
            .executor(recorder.clone())
            .build()
            .unwrap();

        coordinator.start_tracking();
        advance(2100).await;

        assert_eq!(
            recorder.0.lock().as_slice(),
            &[("thumbs-up".to_string(), "Lock Screen".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_confidence_is_counted_but_not_dispatched() {
        let recorder = Recorder::default();
        let coordinator = SessionCoordinator::builder(Config::default())
            .detector(Always("open-palm", 70.0))
            .executor(recorder.clone())
            .build()
            .unwrap();

        coordinator.start_tracking();
        advance(2100).await;

        assert_eq!(coordinator.snapshot().gestures_detected, 1);
        assert!(recorder.0.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_tick_independently() {
        let coordinator = SessionCoordinator::new(Config::default()).unwrap();
        let mut rx = coordinator.subscribe();

        advance(20_100).await;
        let events = drain(&mut rx);
        let metrics: Vec<&SessionEvent> = events.iter().filter(|e| e.change.is_metrics()).collect();
        assert_eq!(metrics.len(), 10);
        assert!(metrics.iter().all(|e| e.snapshot.metrics.within_bounds()));
        assert!(!coordinator.snapshot().tracking.active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_sees_changes_in_order() {
        let coordinator = always("open-palm", 99.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let subscription = coordinator.on_change(move |event| {
            sink.lock().push(event.sequence);
        });

        coordinator.start_tracking();
        coordinator.start_training("pinch").unwrap();
        advance(6100).await;

        let sequences = seen.lock().clone();
        assert!(sequences.len() > 5);
        assert!(sequences.windows(2).all(|w| w[0] < w[1]));

        subscription.unsubscribe();
        let before = seen.lock().len();
        advance(4000).await;
        assert_eq!(seen.lock().len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_listener_misses_no_session_change() {
        let mut config = Config::default();
        config.events.metrics_backlog = 4;
        let coordinator = SessionCoordinator::builder(config)
            .detector(Always("pinch", 90.0))
            .build()
            .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = coordinator.on_change(move |event| {
            if !event.change.is_metrics() {
                sink.lock().push(event.change.clone());
            }
        });

        // Nothing is delivered until the test yields
        for _ in 0..10 {
            coordinator.start_tracking();
            coordinator.stop_tracking();
        }
        advance(10).await;

        let changes = seen.lock().clone();
        assert_eq!(changes.len(), 20);
        assert!(changes.chunks(2).all(|pair| {
            pair == [Change::TrackingStarted, Change::TrackingStopped].as_slice()
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_everything() {
        let coordinator = always("peace-sign", 90.0);
        coordinator.start_tracking();
        coordinator.start_training("peace-sign").unwrap();
        advance(1500).await;

        let mut rx = coordinator.subscribe();
        coordinator.shutdown();
        advance(30_000).await;

        let changes: Vec<Change> = drain(&mut rx).into_iter().map(|e| e.change).collect();
        assert_eq!(
            changes,
            vec![
                Change::TrainingStopped {
                    gesture_id: "peace-sign".to_string()
                },
                Change::TrackingStopped,
            ]
        );
        let snapshot = coordinator.snapshot();
        assert!(!snapshot.tracking.active);
        assert_eq!(snapshot.training.phase, TrainingPhase::Idle);
    }
}
