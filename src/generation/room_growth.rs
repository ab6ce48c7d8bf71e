//! Randomized region growth for a single room.

use bevy::math::{IVec2, Vec2};
use rand::Rng;
use tracing::trace;

use crate::constants::EMPTY_CELL;
use crate::coords;
use crate::generation::room_grid::{orthogonal_neighbors, CellSet, RoomGrid};

/// A placed room: a connected blob of grid cells sharing one id.
///
/// `origin`/`bounds` are the world-space centers of the bounding box's
/// min/max tile blocks. Rooms are never resized after growth.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: i32,
    pub cells: Vec<IVec2>,
    pub min_cell: IVec2,
    pub max_cell: IVec2,
    pub origin: Vec2,
    pub bounds: Vec2,
    /// Interior obstacle template key
    pub layout: String,
}

impl Room {
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Grow one room from `origin` up to `max_cells` cells.
///
/// Claims the origin, then repeatedly claims a uniformly-random cell from the
/// room-local frontier until the budget is spent or no growable cell remains
/// (smaller rooms are normal, not an error). Claiming a cell also feeds every
/// empty orthogonal neighbor into the floor-wide `origins` set, which is
/// where later rooms are seeded from.
pub fn grow_room<R: Rng>(
    grid: &mut RoomGrid,
    origins: &mut CellSet,
    rng: &mut R,
    origin: IVec2,
    room_id: i32,
    max_cells: usize,
) -> Room {
    let mut frontier = CellSet::default();
    let mut cells = Vec::with_capacity(max_cells);

    claim(grid, &mut frontier, origins, &mut cells, origin, room_id);
    while cells.len() < max_cells {
        let Some(next) = frontier.pick(rng) else {
            trace!(room = room_id, "frontier empty, room stops growing");
            break;
        };
        claim(grid, &mut frontier, origins, &mut cells, next, room_id);
    }

    let mut min_cell = origin;
    let mut max_cell = origin;
    for &cell in &cells {
        min_cell = min_cell.min(cell);
        max_cell = max_cell.max(cell);
    }

    Room {
        id: room_id,
        cells,
        min_cell,
        max_cell,
        origin: coords::block_center(min_cell),
        bounds: coords::block_center(max_cell),
        layout: String::new(),
    }
}

/// Claim a cell for a room and refresh both frontiers.
///
/// The cell leaves the frontier and the floor-wide origin set the moment it
/// stops being empty; its empty neighbors enter both.
fn claim(
    grid: &mut RoomGrid,
    frontier: &mut CellSet,
    origins: &mut CellSet,
    cells: &mut Vec<IVec2>,
    cell: IVec2,
    room_id: i32,
) {
    grid.set(cell, room_id);
    frontier.remove(cell);
    origins.remove(cell);
    cells.push(cell);

    for neighbor in orthogonal_neighbors(cell) {
        if grid.get(neighbor) == Some(EMPTY_CELL) {
            frontier.insert(neighbor);
            origins.insert(neighbor);
        }
    }
}
