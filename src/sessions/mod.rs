// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Session state machines.
//!
//! Both sessions are plain data plus tick transitions; they never touch a
//! clock. The coordinator decides when a tick happens.

mod tracking;
mod training;

pub use tracking::{TrackingSession, TrackingState};
pub use training::{TrainingPhase, TrainingSession, TrainingState, TrainingTick, COUNTDOWN_TICKS};
