// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Metrics module - bounded random-walk telemetry and derived health

mod sampler;
mod health;

pub use sampler::{Bounds, MetricsSampler, MetricsSnapshot};
pub use sampler::{ACCURACY, CPU, FPS, GESTURES_PER_MINUTE, LATENCY, MEMORY};
pub use health::{HealthGrade, HealthScore, MetricLevel, MetricLevels};
