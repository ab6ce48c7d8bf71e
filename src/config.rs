use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FLOOR_SIZE;

/// Floor generation parameters supplied by the host.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Side length of the square room grid
    pub floor_size: usize,
    /// Run seed; each floor derives its own hash from this
    pub seed: u64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            floor_size: DEFAULT_FLOOR_SIZE,
            seed: 42,
        }
    }
}

impl FloorConfig {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}
