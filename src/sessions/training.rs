// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Training session - countdown, then capture, then completion

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;

/// Countdown ticks before capture begins
pub const COUNTDOWN_TICKS: u32 = 3;

/// Training lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrainingPhase {
    #[default]
    Idle,
    Countdown,
    Capturing,
    Complete,
}

/// Published training state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingState {
    pub phase: TrainingPhase,
    pub gesture_id: Option<String>,
    pub run_id: Option<Uuid>,
    pub countdown_remaining: u32,
    /// Percent, 0-100
    pub capture_progress: f64,
}

impl TrainingState {
    fn countdown(gesture_id: &str) -> Self {
        Self {
            phase: TrainingPhase::Countdown,
            gesture_id: Some(gesture_id.to_string()),
            run_id: Some(Uuid::new_v4()),
            countdown_remaining: COUNTDOWN_TICKS,
            capture_progress: 0.0,
        }
    }

    /// Countdown or capture underway
    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, TrainingPhase::Countdown | TrainingPhase::Capturing)
    }

    /// Pure tick transition. Idle and Complete do not move.
    pub fn advance(&self, step: f64) -> TrainingState {
        let mut next = self.clone();

        match self.phase {
            TrainingPhase::Idle | TrainingPhase::Complete => {}
            TrainingPhase::Countdown => {
                next.countdown_remaining = self.countdown_remaining.saturating_sub(1);
                if next.countdown_remaining == 0 {
                    next.phase = TrainingPhase::Capturing;
                    next.capture_progress = 0.0;
                }
            }
            TrainingPhase::Capturing => {
                next.capture_progress = (self.capture_progress + step).min(100.0);
                if next.capture_progress >= 100.0 {
                    next.phase = TrainingPhase::Complete;
                }
            }
        }

        next
    }
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingTick {
    /// Nothing in flight
    Idle,
    Countdown { remaining: u32 },
    CaptureStarted,
    Progress(f64),
    Completed { gesture_id: String, run_id: Uuid },
}

/// Single-flight training session
#[derive(Debug, Clone)]
pub struct TrainingSession {
    state: TrainingState,
    step: f64,
}

impl TrainingSession {
    pub fn new(step: f64) -> Self {
        Self {
            state: TrainingState::default(),
            step,
        }
    }

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    /// Gesture currently in countdown or capture
    pub fn active_gesture(&self) -> Option<&str> {
        if self.is_in_flight() {
            self.state.gesture_id.as_deref()
        } else {
            None
        }
    }

    /// Begin a fresh run at Countdown. Caller validates the id against the catalog.
    pub fn start(&mut self, gesture_id: &str) -> Result<Uuid, SessionError> {
        if let Some(active) = self.active_gesture() {
            return Err(SessionError::TrainingInProgress {
                requested: gesture_id.to_string(),
                active: active.to_string(),
            });
        }

        self.state = TrainingState::countdown(gesture_id);
        Ok(self.state.run_id.unwrap_or_default())
    }

    /// Abandon the current run. Returns the gesture that was training, if any.
    pub fn stop(&mut self) -> Option<String> {
        if self.state.phase == TrainingPhase::Idle {
            return None;
        }
        let state = std::mem::take(&mut self.state);
        state.gesture_id
    }

    /// Complete is terminal for a run; fold it back to Idle
    pub fn settle(&mut self) {
        if self.state.phase == TrainingPhase::Complete {
            self.state = TrainingState::default();
        }
    }

    pub fn tick(&mut self) -> TrainingTick {
        let prev = self.state.phase;
        self.state = self.state.advance(self.step);

        match (prev, self.state.phase) {
            (TrainingPhase::Countdown, TrainingPhase::Countdown) => TrainingTick::Countdown {
                remaining: self.state.countdown_remaining,
            },
            (TrainingPhase::Countdown, TrainingPhase::Capturing) => TrainingTick::CaptureStarted,
            (TrainingPhase::Capturing, TrainingPhase::Capturing) => {
                TrainingTick::Progress(self.state.capture_progress)
            }
            (TrainingPhase::Capturing, TrainingPhase::Complete) => TrainingTick::Completed {
                gesture_id: self.state.gesture_id.clone().unwrap_or_default(),
                run_id: self.state.run_id.unwrap_or_default(),
            },
            _ => TrainingTick::Idle,
        }
    }
}
