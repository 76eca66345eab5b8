// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Telemetry sampler

use chrono::{DateTime, Utc};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MetricsConfig;

/// Per-field random-walk parameters: step width and hard limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub delta: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(delta: f64, lower: f64, upper: f64) -> Self {
        Self { delta, lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// `clamp(value + uniform(-delta/2, delta/2), lower, upper)`
    pub fn walk<R: Rng>(&self, value: f64, rng: &mut R) -> f64 {
        let half = self.delta / 2.0;
        let next = value + rng.gen_range(-half..half);
        if next.is_nan() {
            return self.lower;
        }
        next.clamp(self.lower, self.upper)
    }
}

pub const FPS: Bounds = Bounds::new(4.0, 25.0, 60.0);
pub const LATENCY: Bounds = Bounds::new(6.0, 15.0, 50.0);
pub const CPU: Bounds = Bounds::new(8.0, 15.0, 80.0);
pub const MEMORY: Bounds = Bounds::new(6.0, 30.0, 70.0);
pub const ACCURACY: Bounds = Bounds::new(2.0, 85.0, 98.0);
pub const GESTURES_PER_MINUTE: Bounds = Bounds::new(3.0, 5.0, 25.0);

/// One telemetry reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub fps: f64,
    pub latency_ms: f64,
    pub cpu_pct: f64,
    pub mem_pct: f64,
    pub accuracy_pct: f64,
    pub gestures_per_minute: f64,
    pub captured_at: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// Pure step: every field walks within its own bounds
    pub fn walk<R: Rng>(&self, rng: &mut R) -> MetricsSnapshot {
        MetricsSnapshot {
            fps: FPS.walk(self.fps, rng),
            latency_ms: LATENCY.walk(self.latency_ms, rng),
            cpu_pct: CPU.walk(self.cpu_pct, rng),
            mem_pct: MEMORY.walk(self.mem_pct, rng),
            accuracy_pct: ACCURACY.walk(self.accuracy_pct, rng),
            gestures_per_minute: GESTURES_PER_MINUTE.walk(self.gestures_per_minute, rng),
            captured_at: Utc::now(),
        }
    }

    pub fn within_bounds(&self) -> bool {
        FPS.contains(self.fps)
            && LATENCY.contains(self.latency_ms)
            && CPU.contains(self.cpu_pct)
            && MEMORY.contains(self.mem_pct)
            && ACCURACY.contains(self.accuracy_pct)
            && GESTURES_PER_MINUTE.contains(self.gestures_per_minute)
    }
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            fps: 30.0,
            latency_ms: 23.0,
            cpu_pct: 25.0,
            mem_pct: 45.0,
            accuracy_pct: 94.2,
            gestures_per_minute: 12.0,
            captured_at: Utc::now(),
        }
    }
}

/// Produces a new snapshot from the previous one on every sample
pub struct MetricsSampler {
    rng: StdRng,
    current: MetricsSnapshot,
}

impl MetricsSampler {
    pub fn new(config: &MetricsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            current: MetricsSnapshot::default(),
        }
    }

    pub fn current(&self) -> &MetricsSnapshot {
        &self.current
    }

    pub fn sample(&mut self) -> &MetricsSnapshot {
        self.current = self.current.walk(&mut self.rng);
        &self.current
    }
}
