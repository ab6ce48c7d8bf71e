//! World/tile/room-cell coordinate conversions.
//!
//! Pure functions over the fixed tile scale in `constants`. All divisions are
//! floor divisions, so positions just left/below a boundary land in the lower
//! cell instead of rounding across it.

use bevy::math::{IVec2, Vec2};

use crate::constants::{BLOCK_WORLD_HEIGHT, BLOCK_WORLD_WIDTH, TILE_WORLD_SIZE};

/// Room-grid cell containing a world position.
/// Positions outside the floor yield out-of-range cells; the grid lookup
/// turns those into the no-room sentinel.
pub fn cell_at_position(position: Vec2) -> IVec2 {
    IVec2::new(
        (position.x / BLOCK_WORLD_WIDTH).floor() as i32,
        (position.y / BLOCK_WORLD_HEIGHT).floor() as i32,
    )
}

/// Discrete tile coordinate containing a world position
pub fn tile_coordinates(position: Vec2) -> IVec2 {
    IVec2::new(
        (position.x / TILE_WORLD_SIZE).floor() as i32,
        (position.y / TILE_WORLD_SIZE).floor() as i32,
    )
}

/// World position of a tile's center (half-tile offset from its corner)
pub fn tile_position(tile: IVec2) -> Vec2 {
    Vec2::new(
        (tile.x as f32 + 0.5) * TILE_WORLD_SIZE,
        (tile.y as f32 + 0.5) * TILE_WORLD_SIZE,
    )
}

/// World position of the center of a room-grid cell's tile block
pub fn block_center(cell: IVec2) -> Vec2 {
    Vec2::new(
        (cell.x as f32 + 0.5) * BLOCK_WORLD_WIDTH,
        (cell.y as f32 + 0.5) * BLOCK_WORLD_HEIGHT,
    )
}

/// Tile coordinate of a block's bottom-left tile
pub fn block_origin_tile(cell: IVec2) -> IVec2 {
    IVec2::new(
        cell.x * crate::constants::ROOM_TILE_WIDTH as i32,
        cell.y * crate::constants::ROOM_TILE_HEIGHT as i32,
    )
}
