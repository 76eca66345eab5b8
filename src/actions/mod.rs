// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Action dispatch - maps detected gestures to desktop actions

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Failure reported by an action executor
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action '{action}' failed: {message}")]
    Failed { action: String, message: String },
}

/// Executes a gesture's mapped action against the host system.
///
/// Called off the coordinator's state lock; failures are logged and never
/// affect session state.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, gesture_id: &str, action: &str) -> Result<(), ActionError>;
}

/// Default executor: records the action in the log and does nothing else
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingExecutor;

#[async_trait]
impl ActionExecutor for LoggingExecutor {
    async fn execute(&self, gesture_id: &str, action: &str) -> Result<(), ActionError> {
        info!("Action '{}' triggered by gesture '{}'", action, gesture_id);
        Ok(())
    }
}
