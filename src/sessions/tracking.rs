// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Tracking session - the "is detection running" lifecycle

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::catalog::GestureCatalog;
use crate::detection::{DetectionEvent, DetectorSource};

/// Published tracking state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingState {
    pub active: bool,
    pub last_event: Option<DetectionEvent>,
}

/// Owns the detector and the Stopped/Running state
pub struct TrackingSession {
    state: TrackingState,
    detector: Box<dyn DetectorSource>,
}

impl TrackingSession {
    pub fn new(detector: Box<dyn DetectorSource>) -> Self {
        Self {
            state: TrackingState::default(),
            detector,
        }
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Returns false when already running
    pub fn start(&mut self) -> bool {
        if self.state.active {
            return false;
        }
        self.state.active = true;
        true
    }

    /// Returns false when already stopped. The last event is cleared either way.
    pub fn stop(&mut self) -> bool {
        let was_active = self.state.active;
        self.state.active = false;
        self.state.last_event = None;
        was_active
    }

    /// One detection tick. Produces nothing while stopped.
    pub fn tick(&mut self, catalog: &GestureCatalog) -> Option<DetectionEvent> {
        if !self.state.active {
            return None;
        }

        let event = sanitize(self.detector.detect(catalog), catalog);
        trace!(gesture = ?event.gesture_id, confidence = event.confidence, "detection tick");
        self.state.last_event = Some(event.clone());
        Some(event)
    }
}

/// Unknown ids become "no gesture"; "no gesture" always carries zero confidence
fn sanitize(mut event: DetectionEvent, catalog: &GestureCatalog) -> DetectionEvent {
    if let Some(id) = &event.gesture_id {
        if !catalog.contains(id) {
            event.gesture_id = None;
        }
    }

    event.confidence = match event.gesture_id {
        Some(_) if event.confidence.is_finite() => event.confidence.clamp(0.0, 100.0),
        _ => 0.0,
    };
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>, f64);

    impl DetectorSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn detect(&mut self, _catalog: &GestureCatalog) -> DetectionEvent {
            DetectionEvent {
                gesture_id: self.0.map(str::to_string),
                confidence: self.1,
                timestamp: chrono::Utc::now(),
            }
        }
    }

    #[test]
    fn test_start_stop_lifecycle() {
        let catalog = GestureCatalog::builtin();
        let mut session = TrackingSession::new(Box::new(Fixed(Some("thumbs-up"), 88.0)));

        assert!(session.tick(&catalog).is_none());
        assert!(session.start());
        assert!(!session.start());

        let event = session.tick(&catalog).unwrap();
        assert_eq!(event.gesture_id.as_deref(), Some("thumbs-up"));
        assert_eq!(session.state().last_event, Some(event));

        assert!(session.stop());
        assert!(!session.stop());
        assert!(session.state().last_event.is_none());
        assert!(session.tick(&catalog).is_none());
    }

    #[test]
    fn test_unknown_gesture_becomes_none() {
        let catalog = GestureCatalog::builtin();
        let mut session = TrackingSession::new(Box::new(Fixed(Some("wave"), 95.0)));
        session.start();

        let event = session.tick(&catalog).unwrap();
        assert!(event.gesture_id.is_none());
        assert_eq!(event.confidence, 0.0);
    }

    #[test]
    fn test_none_event_has_zero_confidence() {
        let catalog = GestureCatalog::builtin();
        let mut session = TrackingSession::new(Box::new(Fixed(None, 42.0)));
        session.start();

        assert_eq!(session.tick(&catalog).unwrap().confidence, 0.0);
    }
}
