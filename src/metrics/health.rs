// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Derived health indicators. Recomputed from a snapshot on every read.

use serde::{Deserialize, Serialize};

use super::MetricsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthGrade {
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            HealthGrade::Excellent
        } else if score > 60.0 {
            HealthGrade::Good
        } else if score > 40.0 {
            HealthGrade::Fair
        } else {
            HealthGrade::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: f64,
    pub grade: HealthGrade,
}

/// Traffic-light state of a single metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricLevel {
    Nominal,
    Elevated,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricLevels {
    pub fps: MetricLevel,
    pub latency: MetricLevel,
    pub cpu: MetricLevel,
    pub memory: MetricLevel,
    pub accuracy: MetricLevel,
}

impl MetricsSnapshot {
    /// Mean of five sub-scores on a 0-100 scale
    pub fn health(&self) -> HealthScore {
        let fps = self.fps / 60.0 * 100.0;
        let latency = (100.0 - self.latency_ms / 50.0 * 100.0).max(0.0);
        let cpu = (100.0 - self.cpu_pct).max(0.0);
        let memory = (100.0 - self.mem_pct).max(0.0);

        let score = (fps + latency + cpu + memory + self.accuracy_pct) / 5.0;
        HealthScore {
            score,
            grade: HealthGrade::from_score(score),
        }
    }

    pub fn levels(&self) -> MetricLevels {
        use MetricLevel::*;

        MetricLevels {
            fps: if self.fps > 25.0 { Nominal } else { Critical },
            latency: if self.latency_ms < 30.0 { Nominal } else { Elevated },
            cpu: if self.cpu_pct < 50.0 {
                Nominal
            } else if self.cpu_pct < 70.0 {
                Elevated
            } else {
                Critical
            },
            memory: if self.mem_pct < 60.0 { Nominal } else { Elevated },
            accuracy: if self.accuracy_pct > 90.0 { Nominal } else { Elevated },
        }
    }
}
