//! Room-id grid and the random-pickable cell sets used during growth.

use bevy::math::IVec2;
use rand::Rng;
use std::collections::HashMap;

use crate::constants::{EMPTY_CELL, NO_ROOM};

/// Square grid of room ids; `EMPTY_CELL` (0) marks unclaimed cells.
#[derive(Debug, Clone)]
pub struct RoomGrid {
    size: usize,
    cells: Vec<i32>,
}

impl RoomGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![EMPTY_CELL; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.size && (cell.y as usize) < self.size
    }

    /// Room id at a cell, `None` outside the grid
    pub fn get(&self, cell: IVec2) -> Option<i32> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(self.cells[cell.y as usize * self.size + cell.x as usize])
    }

    /// Room id at a cell, `NO_ROOM` (-1) outside the grid.
    /// Callers probing near the floor edge get the sentinel, never a panic.
    pub fn room_at(&self, x: i32, y: i32) -> i32 {
        self.get(IVec2::new(x, y)).unwrap_or(NO_ROOM)
    }

    /// Room id at a cell, treating out-of-bounds as empty.
    /// The wall classifier uses this so the floor border reads as "no neighbor".
    pub fn neighbor_or_empty(&self, cell: IVec2) -> i32 {
        self.get(cell).unwrap_or(EMPTY_CELL)
    }

    pub fn set(&mut self, cell: IVec2, room: i32) {
        debug_assert!(self.in_bounds(cell), "cell {cell} outside {0}x{0} grid", self.size);
        self.cells[cell.y as usize * self.size + cell.x as usize] = room;
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, i32)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(i, &room)| {
            (IVec2::new((i % size) as i32, (i / size) as i32), room)
        })
    }
}

/// The four orthogonal neighbors of a cell
pub fn orthogonal_neighbors(cell: IVec2) -> [IVec2; 4] {
    [
        cell + IVec2::new(0, -1),
        cell + IVec2::new(-1, 0),
        cell + IVec2::new(0, 1),
        cell + IVec2::new(1, 0),
    ]
}

/// Set of grid cells with O(1) membership and uniform random pick.
///
/// Backs both the per-room growth frontier and the floor-wide possible-origin
/// set. A cell is present iff it is empty and adjacent to the claimed region;
/// it is removed the instant it is claimed.
#[derive(Debug, Clone, Default)]
pub struct CellSet {
    cells: Vec<IVec2>,
    index: HashMap<IVec2, usize>,
}

impl CellSet {
    /// Add a cell; returns false if it was already present
    pub fn insert(&mut self, cell: IVec2) -> bool {
        if self.index.contains_key(&cell) {
            return false;
        }
        self.index.insert(cell, self.cells.len());
        self.cells.push(cell);
        true
    }

    /// Remove a cell; returns false if it was not present
    pub fn remove(&mut self, cell: IVec2) -> bool {
        let Some(slot) = self.index.remove(&cell) else {
            return false;
        };
        self.cells.swap_remove(slot);
        if let Some(&moved) = self.cells.get(slot) {
            self.index.insert(moved, slot);
        }
        true
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        self.index.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Uniformly-random member, `None` when empty
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<IVec2> {
        if self.cells.is_empty() {
            return None;
        }
        Some(self.cells[rng.gen_range(0..self.cells.len())])
    }

    pub fn iter(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells.iter().copied()
    }
}
