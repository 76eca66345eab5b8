// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Gesture catalog - the static registry of known gestures

use std::collections::HashMap;
use std::sync::Arc;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// How hard a gesture is to perform consistently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A known gesture and the desktop action it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub mapped_action: String,
    pub difficulty: Difficulty,
    pub required_samples: u32,
}

impl GestureDefinition {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        mapped_action: &str,
        difficulty: Difficulty,
        required_samples: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mapped_action: mapped_action.to_string(),
            difficulty,
            required_samples,
        }
    }
}

/// Read-only gesture registry, cheap to clone and share
#[derive(Debug, Clone)]
pub struct GestureCatalog {
    gestures: Arc<[GestureDefinition]>,
    index: Arc<HashMap<String, usize>>,
}

impl GestureCatalog {
    /// Build a catalog, rejecting duplicate ids and zero sample counts
    pub fn new(gestures: Vec<GestureDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(gestures.len());

        for (i, gesture) in gestures.iter().enumerate() {
            if gesture.required_samples == 0 {
                bail!("gesture '{}' must require at least one sample", gesture.id);
            }
            if index.insert(gesture.id.clone(), i).is_some() {
                bail!("duplicate gesture id '{}'", gesture.id);
            }
        }

        Ok(Self {
            gestures: gestures.into(),
            index: Arc::new(index),
        })
    }

    /// The six gestures shipped with the dashboard
    pub fn builtin() -> Self {
        let gestures: Vec<GestureDefinition> = vec![
            GestureDefinition::new("open-palm", "Open Palm", "Hold your hand open with fingers spread", "Play/Pause Media", Difficulty::Easy, 25),
            GestureDefinition::new("closed-fist", "Closed Fist", "Make a tight fist with all fingers closed", "Mute/Unmute Audio", Difficulty::Easy, 25),
            GestureDefinition::new("peace-sign", "Peace Sign", "Show two fingers in a V shape", "Take Screenshot", Difficulty::Medium, 30),
            GestureDefinition::new("thumbs-up", "Thumbs Up", "Point your thumb upward", "Lock Screen", Difficulty::Easy, 25),
            GestureDefinition::new("pinch", "Pinch Gesture", "Bring thumb and index finger together", "Minimize Window", Difficulty::Hard, 40),
            GestureDefinition::new("swipe-left", "Swipe Left", "Move your hand from right to left", "Previous Window", Difficulty::Medium, 35),
        ];

        let index = gestures
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id.clone(), i))
            .collect();

        Self {
            gestures: gestures.into(),
            index: Arc::new(index),
        }
    }

    pub fn get(&self, id: &str) -> Option<&GestureDefinition> {
        self.index.get(id).map(|&i| &self.gestures[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureDefinition> {
        self.gestures.iter()
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }
}

impl Default for GestureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
