//! Centralized constants for the floor core.
//!
//! The room-count budget formula in `generation` assumes `MAX_ROOM_CELLS`
//! and `SINGLE_CELL_ROOMS` move in lockstep with it; the coupling is pinned
//! by tests rather than duplicated here.

// =====================================================
// Room grid
// =====================================================

/// Default side length of the square room grid
pub const DEFAULT_FLOOR_SIZE: usize = 6;

/// Largest number of grid cells a regular room may claim
pub const MAX_ROOM_CELLS: usize = 4;

/// Rooms that always occupy exactly one cell (spawn + boss)
pub const SINGLE_CELL_ROOMS: usize = 2;

/// Id of the room the player starts in; ids count up from here
pub const SPAWN_ROOM_ID: i32 = 1;

/// Grid cell value meaning "no room has claimed this cell"
pub const EMPTY_CELL: i32 = 0;

/// Sentinel returned by room queries that fall outside the floor
pub const NO_ROOM: i32 = -1;

// =====================================================
// Tile blocks
// =====================================================

/// Tiles per room-grid cell, horizontally
pub const ROOM_TILE_WIDTH: usize = 13;

/// Tiles per room-grid cell, vertically
pub const ROOM_TILE_HEIGHT: usize = 9;

/// World units covered by one tile
pub const TILE_WORLD_SIZE: f32 = 2.0;

/// World units covered by one tile block, horizontally
pub const BLOCK_WORLD_WIDTH: f32 = ROOM_TILE_WIDTH as f32 * TILE_WORLD_SIZE;

/// World units covered by one tile block, vertically
pub const BLOCK_WORLD_HEIGHT: f32 = ROOM_TILE_HEIGHT as f32 * TILE_WORLD_SIZE;
