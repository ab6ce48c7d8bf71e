//! Procedural floor generation.
//!
//! A floor is a square grid of room ids grown blob-by-blob from random seed
//! cells, then expanded into a tile grid whose wall/door/floor types are
//! derived from room adjacency. Everything is deterministic per
//! (run seed, floor number).

pub mod obstacles;
pub mod room_grid;
pub mod room_growth;
pub mod tiles;
pub mod walls;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use thiserror::Error;

use crate::constants::{MAX_ROOM_CELLS, SINGLE_CELL_ROOMS};

/// Run seed — the root of all per-floor randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSeed {
    pub seed: u64,
}

impl Default for FloorSeed {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl FloorSeed {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Deterministic per-floor hash from run seed and floor number
    pub fn floor_hash(&self, floor_number: u32) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(floor_number.to_le_bytes());
        let result = hasher.finalize();
        u64::from_le_bytes(result[0..8].try_into().unwrap())
    }
}

/// Unrecoverable failures while generating a floor.
///
/// A malformed floor would corrupt every downstream consumer (minimap, enemy
/// placement, exits), so these are surfaced immediately and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No empty cell adjacent to the placed rooms remained to seed the next one
    #[error("room origin frontier exhausted after {placed} of {required} rooms")]
    FrontierExhausted { placed: i32, required: i32 },

    /// Grid too small to hold the spawn and boss rooms
    #[error("floor size {0} cannot hold the spawn and boss rooms")]
    FloorTooSmall(usize),
}

/// Highest room id on a floor of the given size; also the boss room's id.
///
/// Reserves one cell each for the spawn and boss rooms and divides the rest
/// of the grid between rooms of up to `MAX_ROOM_CELLS` cells.
pub fn max_room_id_for(floor_size: usize) -> i32 {
    ((floor_size * floor_size - SINGLE_CELL_ROOMS) / MAX_ROOM_CELLS + SINGLE_CELL_ROOMS) as i32
}
