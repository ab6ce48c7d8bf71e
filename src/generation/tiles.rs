//! Tile records and the floor-wide tile grid.

use bevy::math::IVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{EMPTY_CELL, ROOM_TILE_HEIGHT, ROOM_TILE_WIDTH};

/// Everything a tile can be after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    WallCorner,
    WallCornerInner,
    LeftDoorWall,
    RightDoorWall,
    Door,
    Floor,
    FloorLedge,
    FloorHole,
    NextFloor,
    None,
}

impl TileType {
    pub fn is_none(&self) -> bool {
        matches!(self, TileType::None)
    }

    /// Tile types that close off a room edge
    pub fn is_wall_like(&self) -> bool {
        matches!(
            self,
            TileType::Wall
                | TileType::WallCorner
                | TileType::WallCornerInner
                | TileType::LeftDoorWall
                | TileType::RightDoorWall
        )
    }

    pub fn is_door(&self) -> bool {
        matches!(self, TileType::Door)
    }

    /// Debug-map glyph
    pub fn glyph(&self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::WallCorner => '+',
            TileType::WallCornerInner => '*',
            TileType::LeftDoorWall => '[',
            TileType::RightDoorWall => ']',
            TileType::Door => 'D',
            TileType::Floor => '.',
            TileType::FloorLedge => '=',
            TileType::FloorHole => 'o',
            TileType::NextFloor => '>',
            TileType::None => ' ',
        }
    }
}

/// Quarter-turn tile rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// The corner case where only the straight neighbor matches takes the
    /// previous edge's orientation.
    pub fn minus_90(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R270,
            Rotation::R90 => Rotation::R0,
            Rotation::R180 => Rotation::R90,
            Rotation::R270 => Rotation::R180,
        }
    }

    pub fn degrees(self) -> f32 {
        match self {
            Rotation::R0 => 0.0,
            Rotation::R90 => 90.0,
            Rotation::R180 => 180.0,
            Rotation::R270 => 270.0,
        }
    }
}

/// One classified tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileType,
    pub rotation: Rotation,
    pub room: i32,
}

impl Tile {
    pub const NONE: Tile = Tile {
        kind: TileType::None,
        rotation: Rotation::R0,
        room: EMPTY_CELL,
    };

    pub fn new(kind: TileType, rotation: Rotation, room: i32) -> Self {
        Self { kind, rotation, room }
    }
}

/// Floor-wide tile buffer, `floor_size` blocks of 13x9 tiles per side
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(floor_size: usize) -> Self {
        let width = floor_size * ROOM_TILE_WIDTH;
        let height = floor_size * ROOM_TILE_HEIGHT;
        Self {
            width,
            height,
            tiles: vec![Tile::NONE; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, coord: IVec2) -> Option<&Tile> {
        if coord.x < 0
            || coord.y < 0
            || coord.x as usize >= self.width
            || coord.y as usize >= self.height
        {
            return None;
        }
        Some(&self.tiles[coord.y as usize * self.width + coord.x as usize])
    }

    pub fn set(&mut self, coord: IVec2, tile: Tile) {
        debug_assert!(
            coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < self.width
                && (coord.y as usize) < self.height,
            "tile coordinate {coord} outside {}x{} grid",
            self.width,
            self.height
        );
        self.tiles[coord.y as usize * self.width + coord.x as usize] = tile;
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &Tile)> + '_ {
        let width = self.width;
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            (IVec2::new((i % width) as i32, (i / width) as i32), tile)
        })
    }
}
