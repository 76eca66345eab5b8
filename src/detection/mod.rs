// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Detection module - gesture detection events and the detector capability

mod simulator;

pub use simulator::SimulatedDetector;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::GestureCatalog;

/// A single detector output. `gesture_id == None` means no gesture was seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub gesture_id: Option<String>,
    /// Confidence in percent, 0-100
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl DetectionEvent {
    pub fn none() -> Self {
        Self {
            gesture_id: None,
            confidence: 0.0,
            timestamp: Utc::now(),
        }
    }

    pub fn gesture(id: &str, confidence: f64) -> Self {
        Self {
            gesture_id: Some(id.to_string()),
            confidence: confidence.clamp(0.0, 100.0),
            timestamp: Utc::now(),
        }
    }

    pub fn is_gesture(&self) -> bool {
        self.gesture_id.is_some()
    }
}

/// Source of detection events.
///
/// Polled once per detection tick while tracking is active. Implementations
/// backed by real inference should return their most recent result without
/// blocking.
pub trait DetectorSource: Send {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Produce the next event. Ids outside the catalog are treated as no gesture.
    fn detect(&mut self, catalog: &GestureCatalog) -> DetectionEvent;
}
