//! Interior obstacle layouts.
//!
//! Room interiors are stamped from keyed templates: arrays of 0/1/2
//! (floor/ledge/hole) laid out row-major over the 11x7 interior of a tile
//! block. Templates come from JSON documents supplied by the resource
//! loader and are merged over the built-in set.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::constants::{ROOM_TILE_HEIGHT, ROOM_TILE_WIDTH};
use crate::generation::tiles::TileType;

/// Interior width of a tile block (the ring is classified separately)
pub const INTERIOR_WIDTH: usize = ROOM_TILE_WIDTH - 2;

/// Interior height of a tile block
pub const INTERIOR_HEIGHT: usize = ROOM_TILE_HEIGHT - 2;

/// Layout key for an obstacle-free interior (spawn and boss rooms)
pub const OPEN_LAYOUT: &str = "open";

const CELL_FLOOR: u8 = 0;
const CELL_LEDGE: u8 = 1;
const CELL_HOLE: u8 = 2;

/// Errors loading or validating layout documents
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout file")]
    Io(#[from] std::io::Error),

    #[error("malformed layout document")]
    Json(#[from] serde_json::Error),

    #[error("layout '{name}' has {got} cells, expected {expected}")]
    WrongLength {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("layout '{name}' contains cell value {value}, expected 0..=2")]
    BadValue { name: String, value: u8 },
}

/// One interior template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleLayout {
    pub name: String,
    cells: Vec<u8>,
}

impl ObstacleLayout {
    fn validated(name: String, cells: Vec<u8>) -> Result<Self, LayoutError> {
        let expected = INTERIOR_WIDTH * INTERIOR_HEIGHT;
        if cells.len() != expected {
            return Err(LayoutError::WrongLength {
                name,
                expected,
                got: cells.len(),
            });
        }
        if let Some(&value) = cells.iter().find(|&&value| value > CELL_HOLE) {
            return Err(LayoutError::BadValue { name, value });
        }
        Ok(Self { name, cells })
    }

    /// Tile type for the interior cell at (x, y), row-major from the
    /// bottom-left interior corner
    pub fn tile_at(&self, x: usize, y: usize) -> TileType {
        match self.cells[y * INTERIOR_WIDTH + x] {
            CELL_LEDGE => TileType::FloorLedge,
            CELL_HOLE => TileType::FloorHole,
            _ => TileType::Floor,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LayoutDocument {
    layouts: HashMap<String, Vec<u8>>,
}

/// All known interior templates, keyed by name.
#[derive(Resource, Debug, Clone)]
pub struct ObstacleLayouts {
    layouts: HashMap<String, ObstacleLayout>,
}

impl Default for ObstacleLayouts {
    fn default() -> Self {
        let mut layouts = HashMap::new();
        for (name, cells) in builtin_layouts() {
            layouts.insert(
                name.to_string(),
                ObstacleLayout {
                    name: name.to_string(),
                    cells,
                },
            );
        }
        Self { layouts }
    }
}

impl ObstacleLayouts {
    /// Parse a layout document and merge it over the built-in set,
    /// validating every template
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let document: LayoutDocument = serde_json::from_str(json)?;
        let mut base = Self::default();
        for (name, cells) in document.layouts {
            let layout = ObstacleLayout::validated(name.clone(), cells)?;
            base.layouts.insert(name, layout);
        }
        Ok(base)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Merge another set over this one; same-named templates are replaced
    pub fn merge(&mut self, other: ObstacleLayouts) {
        self.layouts.extend(other.layouts);
    }

    pub fn get(&self, name: &str) -> Option<&ObstacleLayout> {
        self.layouts.get(name)
    }

    /// The obstacle-free template
    pub fn open(&self) -> &ObstacleLayout {
        // every constructor starts from the defaults, which include "open";
        // documents can replace it but not remove it
        self.layouts
            .get(OPEN_LAYOUT)
            .unwrap_or_else(|| panic!("built-in '{OPEN_LAYOUT}' layout missing"))
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Uniformly-random template name for a regular room's interior
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &str {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable(); // stable pick order regardless of map iteration
        names[rng.gen_range(0..names.len())]
    }
}

/// Built-in templates; a resource pack normally replaces these.
fn builtin_layouts() -> Vec<(&'static str, Vec<u8>)> {
    let open = vec![0; INTERIOR_WIDTH * INTERIOR_HEIGHT];

    // Four ledge pillars, one per quadrant
    let mut pillars = open.clone();
    for &y in &[1, 5] {
        for &x in &[2, 8] {
            pillars[y * INTERIOR_WIDTH + x] = CELL_LEDGE;
        }
    }

    // Horizontal trench of holes across the middle, with a gap at center
    let mut trench = open.clone();
    for x in 0..INTERIOR_WIDTH {
        if x != INTERIOR_WIDTH / 2 {
            trench[(INTERIOR_HEIGHT / 2) * INTERIOR_WIDTH + x] = CELL_HOLE;
        }
    }

    // Ledge ring around the center cell
    let mut ring = open.clone();
    let (cx, cy) = (INTERIOR_WIDTH / 2, INTERIOR_HEIGHT / 2);
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let x = (cx as i32 + dx) as usize;
            let y = (cy as i32 + dy) as usize;
            ring[y * INTERIOR_WIDTH + x] = CELL_LEDGE;
        }
    }

    vec![
        (OPEN_LAYOUT, open),
        ("pillars", pillars),
        ("trench", trench),
        ("ring", ring),
    ]
}
