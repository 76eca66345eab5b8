// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Configuration module

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Log level
    pub log_level: String,

    /// Tick cadences for the session timers
    pub timing: TimingConfig,

    /// Simulated detector configuration
    pub detection: DetectionConfig,

    /// Action dispatch configuration
    pub actions: ActionConfig,

    /// Metrics sampler configuration
    pub metrics: MetricsConfig,

    /// Change stream configuration
    pub events: EventConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("gestureos"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Reject values the coordinator cannot run with
    pub fn validate(&self) -> Result<()> {
        let t = &self.timing;
        if t.detection_interval_ms == 0
            || t.countdown_interval_ms == 0
            || t.capture_interval_ms == 0
            || t.metrics_interval_ms == 0
        {
            bail!("timer intervals must be non-zero");
        }
        if !(t.capture_step > 0.0 && t.capture_step.is_finite()) {
            bail!("capture_step must be a positive number, got {}", t.capture_step);
        }

        let d = &self.detection;
        if !(d.none_weight >= 0.0 && d.none_weight.is_finite()) {
            bail!("none_weight must be non-negative, got {}", d.none_weight);
        }
        if !(0.0..=100.0).contains(&d.min_confidence)
            || !(0.0..=100.0).contains(&d.max_confidence)
            || d.min_confidence > d.max_confidence
        {
            bail!(
                "confidence range [{}, {}] must lie within [0, 100]",
                d.min_confidence,
                d.max_confidence
            );
        }

        if !(0.0..=100.0).contains(&self.actions.min_confidence) {
            bail!("actions.min_confidence must lie within [0, 100]");
        }

        if self.events.metrics_backlog == 0 {
            bail!("events.metrics_backlog must be non-zero");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "GestureOS".to_string(),
            log_level: "info".to_string(),
            timing: TimingConfig::default(),
            detection: DetectionConfig::default(),
            actions: ActionConfig::default(),
            metrics: MetricsConfig::default(),
            events: EventConfig::default(),
        }
    }
}

/// Timer cadences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Detection tick while tracking
    pub detection_interval_ms: u64,

    /// Training countdown tick
    pub countdown_interval_ms: u64,

    /// Training capture tick
    pub capture_interval_ms: u64,

    /// Progress added per capture tick, in percent
    pub capture_step: f64,

    /// Metrics sampler tick
    pub metrics_interval_ms: u64,
}

impl TimingConfig {
    pub fn detection_interval(&self) -> Duration {
        Duration::from_millis(self.detection_interval_ms)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_interval_ms)
    }

    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(self.capture_interval_ms)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            detection_interval_ms: 2000,
            countdown_interval_ms: 1000,
            capture_interval_ms: 100,
            capture_step: 2.0,
            metrics_interval_ms: 2000,
        }
    }
}

/// Simulated detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Relative weight of "no gesture" against 1.0 per catalog gesture
    pub none_weight: f64,

    /// Lower bound of simulated confidence
    pub min_confidence: f64,

    /// Upper bound of simulated confidence
    pub max_confidence: f64,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            none_weight: 1.0,
            min_confidence: 60.0,
            max_confidence: 100.0,
            seed: None,
        }
    }
}

/// Action dispatch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Hand detected gestures to the action executor
    pub dispatch_enabled: bool,

    /// Minimum confidence required to trigger an action
    pub min_confidence: f64,

    /// Gestures that are still detected and counted but never trigger their action
    pub disabled_gestures: BTreeSet<String>,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            dispatch_enabled: true,
            min_confidence: 80.0,
            // Lock Screen and Minimize Window are opt-in
            disabled_gestures: ["thumbs-up", "pinch"].into_iter().map(String::from).collect(),
        }
    }
}

/// Metrics sampler configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

/// Change stream configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Unread metrics updates kept per subscriber; newer ones are skipped
    /// until it catches up. Session changes are never skipped.
    pub metrics_backlog: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { metrics_backlog: 256 }
    }
}
