// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Error types for session commands

use thiserror::Error;

/// Reasons a coordinator command is rejected.
///
/// A rejected command leaves every session untouched and publishes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown gesture: {0}")]
    InvalidGesture(String),

    #[error("training already in progress for '{active}' (requested '{requested}')")]
    TrainingInProgress { requested: String, active: String },

    #[error("cannot reset '{0}' while it is training")]
    ResetWhileTraining(String),
}

impl SessionError {
    /// Short machine-readable reason for display layers
    pub fn reason(&self) -> &'static str {
        match self {
            SessionError::InvalidGesture(_) => "invalid_gesture",
            SessionError::TrainingInProgress { .. } | SessionError::ResetWhileTraining(_) => {
                "training_in_progress"
            }
        }
    }
}
