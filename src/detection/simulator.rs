// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Simulated gesture detector for demo/testing

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::Uniform;

use super::{DetectionEvent, DetectorSource};
use crate::catalog::GestureCatalog;
use crate::config::DetectionConfig;

/// Picks a catalog gesture (each weight 1.0) or "no gesture" (`none_weight`)
/// on every poll, with confidence drawn uniformly from the configured range.
pub struct SimulatedDetector {
    rng: StdRng,
    none_weight: f64,
    confidence: Uniform<f64>,
}

impl SimulatedDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            none_weight: config.none_weight.max(0.0),
            confidence: Uniform::new_inclusive(config.min_confidence, config.max_confidence),
        }
    }
}

impl DetectorSource for SimulatedDetector {
    fn name(&self) -> &str {
        "simulated"
    }

    fn detect(&mut self, catalog: &GestureCatalog) -> DetectionEvent {
        let weights = std::iter::repeat(1.0)
            .take(catalog.len())
            .chain(std::iter::once(self.none_weight));

        // All-zero weights (empty catalog, none_weight 0) fall back to no gesture
        let Ok(dist) = WeightedIndex::new(weights) else {
            return DetectionEvent::none();
        };

        let pick = dist.sample(&mut self.rng);
        match catalog.iter().nth(pick) {
            Some(gesture) => {
                let confidence = self.confidence.sample(&mut self.rng);
                DetectionEvent::gesture(&gesture.id, confidence)
            }
            None => DetectionEvent::none(),
        }
    }
}
