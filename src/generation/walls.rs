//! Wall, door, and floor classification for every tile of every room block.
//!
//! Each occupied room-grid cell owns a 13x9 tile block. Interior tiles come
//! from the room's obstacle template; the boundary ring is classified edge by
//! edge from the ids of the neighboring cells. The four edges run as four
//! explicit passes in a fixed order (bottom, left, top, right), each with its
//! own (straight, clockwise, rotation, inverted) tuple — the tuples are easy
//! to get subtly wrong, so they stay spelled out rather than generalized.

use bevy::math::IVec2;
use std::collections::HashMap;
use tracing::trace;

use crate::constants::{EMPTY_CELL, ROOM_TILE_HEIGHT, ROOM_TILE_WIDTH};
use crate::coords::block_origin_tile;
use crate::generation::obstacles::{ObstacleLayout, ObstacleLayouts};
use crate::generation::room_grid::RoomGrid;
use crate::generation::room_growth::Room;
use crate::generation::tiles::{Rotation, Tile, TileGrid, TileType};

/// Classify one boundary tile of a room block edge.
///
/// `coordinate` indexes along the edge; the corner owned by this edge sits at
/// index 0, or at the last index when `inverted`. `straight` is the room id
/// across this edge, `clockwise` the id across the next edge clockwise (the
/// two cells touching the owned corner).
pub fn generate_wall_tile(
    coordinate: usize,
    dimension: usize,
    room: i32,
    straight: i32,
    clockwise: i32,
    rotation: Rotation,
    inverted: bool,
) -> Tile {
    let corner_index = if inverted { dimension - 1 } else { 0 };
    if coordinate == corner_index {
        return if straight == room && clockwise == room {
            Tile::new(TileType::WallCornerInner, rotation, room)
        } else if straight == room {
            // the opening continues across this edge; the corner tile carries
            // the previous edge's wall
            Tile::new(TileType::Wall, rotation.minus_90(), room)
        } else if clockwise == room {
            Tile::new(TileType::Wall, rotation, room)
        } else {
            Tile::new(TileType::WallCorner, rotation, room)
        };
    }

    if straight == room {
        // two cells of the same room share this border: open floor
        return Tile::new(TileType::Floor, Rotation::R0, room);
    }

    if straight > EMPTY_CELL {
        // shared border with another room: carve the door passage
        let center = dimension / 2;
        if coordinate == center {
            return Tile::new(TileType::Door, rotation, room);
        }
        if coordinate + 1 == center {
            let kind = if inverted {
                TileType::RightDoorWall
            } else {
                TileType::LeftDoorWall
            };
            return Tile::new(kind, rotation, room);
        }
        if coordinate == center + 1 {
            let kind = if inverted {
                TileType::LeftDoorWall
            } else {
                TileType::RightDoorWall
            };
            return Tile::new(kind, rotation, room);
        }
        return Tile::new(TileType::Wall, rotation, room);
    }

    // empty or out-of-bounds neighbor
    Tile::new(TileType::Wall, rotation, room)
}

/// Classify every tile of every occupied cell's block.
///
/// The boss room's block center becomes the floor exit.
pub fn classify_tiles(
    grid: &RoomGrid,
    tiles: &mut TileGrid,
    rooms: &HashMap<i32, Room>,
    layouts: &ObstacleLayouts,
    boss_room: i32,
) {
    for (cell, room) in grid.iter() {
        if room == EMPTY_CELL {
            continue;
        }
        let layout = rooms
            .get(&room)
            .and_then(|r| layouts.get(&r.layout))
            .unwrap_or_else(|| layouts.open());
        classify_block(grid, tiles, cell, room, layout, room == boss_room);
    }
}

/// Classify the 13x9 block owned by one room-grid cell.
fn classify_block(
    grid: &RoomGrid,
    tiles: &mut TileGrid,
    cell: IVec2,
    room: i32,
    layout: &ObstacleLayout,
    is_boss: bool,
) {
    const W: usize = ROOM_TILE_WIDTH;
    const H: usize = ROOM_TILE_HEIGHT;
    let base = block_origin_tile(cell);

    // interior first: obstacle template, then the boss exit on top
    for y in 1..H - 1 {
        for x in 1..W - 1 {
            let kind = layout.tile_at(x - 1, y - 1);
            tiles.set(
                base + IVec2::new(x as i32, y as i32),
                Tile::new(kind, Rotation::R0, room),
            );
        }
    }
    if is_boss {
        tiles.set(
            base + IVec2::new(W as i32 / 2, H as i32 / 2),
            Tile::new(TileType::NextFloor, Rotation::R0, room),
        );
        trace!(room, "placed floor exit");
    }

    let south = grid.neighbor_or_empty(cell + IVec2::new(0, -1));
    let west = grid.neighbor_or_empty(cell + IVec2::new(-1, 0));
    let north = grid.neighbor_or_empty(cell + IVec2::new(0, 1));
    let east = grid.neighbor_or_empty(cell + IVec2::new(1, 0));

    // Boundary ring as four explicit edge passes. Each edge writes its own
    // corner end and stops short of the far end, which belongs to the next
    // edge; together they cover the ring exactly once.
    // Order: bottom, left, top, right.

    // bottom: owns the bottom-left corner (south/west meet there)
    for c in 0..W - 1 {
        let tile = generate_wall_tile(c, W, room, south, west, Rotation::R0, false);
        tiles.set(base + IVec2::new(c as i32, 0), tile);
    }
    // left: owns the top-left corner (west/north)
    for c in 1..H {
        let tile = generate_wall_tile(c, H, room, west, north, Rotation::R270, true);
        tiles.set(base + IVec2::new(0, c as i32), tile);
    }
    // top: owns the top-right corner (north/east)
    for c in 1..W {
        let tile = generate_wall_tile(c, W, room, north, east, Rotation::R180, true);
        tiles.set(base + IVec2::new(c as i32, H as i32 - 1), tile);
    }
    // right: owns the bottom-right corner (east/south)
    for c in 0..H - 1 {
        let tile = generate_wall_tile(c, H, room, east, south, Rotation::R90, false);
        tiles.set(base + IVec2::new(W as i32 - 1, c as i32), tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::obstacles::OPEN_LAYOUT;

    const W: usize = ROOM_TILE_WIDTH;
    const H: usize = ROOM_TILE_HEIGHT;

    // ---- generate_wall_tile decision table ----

    #[test]
    fn test_corner_both_neighbors_match() {
        let tile = generate_wall_tile(0, W, 1, 1, 1, Rotation::R0, false);
        assert_eq!(tile.kind, TileType::WallCornerInner);
    }

    #[test]
    fn test_corner_straight_match_rotates_back() {
        let tile = generate_wall_tile(0, W, 1, 1, 2, Rotation::R0, false);
        assert_eq!(tile.kind, TileType::Wall);
        assert_eq!(tile.rotation, Rotation::R270);
    }

    #[test]
    fn test_corner_clockwise_match_keeps_rotation() {
        let tile = generate_wall_tile(0, W, 1, 2, 1, Rotation::R0, false);
        assert_eq!(tile.kind, TileType::Wall);
        assert_eq!(tile.rotation, Rotation::R0);
    }

    #[test]
    fn test_corner_no_match_is_outer_corner() {
        let tile = generate_wall_tile(0, W, 1, 0, 2, Rotation::R90, false);
        assert_eq!(tile.kind, TileType::WallCorner);
        assert_eq!(tile.rotation, Rotation::R90);
    }

    #[test]
    fn test_inverted_corner_is_last_index() {
        let tile = generate_wall_tile(W - 1, W, 1, 0, 0, Rotation::R180, true);
        assert_eq!(tile.kind, TileType::WallCorner);
        // index 0 is mid-edge when inverted
        let tile = generate_wall_tile(0, W, 1, 0, 0, Rotation::R180, true);
        assert_eq!(tile.kind, TileType::Wall);
    }

    #[test]
    fn test_same_room_border_is_open_floor() {
        let tile = generate_wall_tile(4, W, 1, 1, 0, Rotation::R0, false);
        assert_eq!(tile.kind, TileType::Floor);
    }

    #[test]
    fn test_other_room_border_carves_door() {
        let center = W / 2;
        let door = generate_wall_tile(center, W, 1, 2, 0, Rotation::R0, false);
        assert_eq!(door.kind, TileType::Door);
        let left = generate_wall_tile(center - 1, W, 1, 2, 0, Rotation::R0, false);
        assert_eq!(left.kind, TileType::LeftDoorWall);
        let right = generate_wall_tile(center + 1, W, 1, 2, 0, Rotation::R0, false);
        assert_eq!(right.kind, TileType::RightDoorWall);
        let wall = generate_wall_tile(1, W, 1, 2, 0, Rotation::R0, false);
        assert_eq!(wall.kind, TileType::Wall);
    }

    #[test]
    fn test_inverted_swaps_door_walls() {
        let center = W / 2;
        let before = generate_wall_tile(center - 1, W, 1, 2, 0, Rotation::R180, true);
        assert_eq!(before.kind, TileType::RightDoorWall);
        let after = generate_wall_tile(center + 1, W, 1, 2, 0, Rotation::R180, true);
        assert_eq!(after.kind, TileType::LeftDoorWall);
    }

    #[test]
    fn test_empty_neighbor_is_plain_wall() {
        let tile = generate_wall_tile(3, H, 1, 0, 0, Rotation::R90, false);
        assert_eq!(tile.kind, TileType::Wall);
        assert_eq!(tile.rotation, Rotation::R90);
    }

    // ---- per-edge passes over a lone one-cell room ----

    fn lone_room_tiles() -> TileGrid {
        let mut grid = RoomGrid::new(3);
        grid.set(IVec2::new(1, 1), 1);
        let mut rooms = HashMap::new();
        rooms.insert(
            1,
            Room {
                id: 1,
                cells: vec![IVec2::new(1, 1)],
                min_cell: IVec2::new(1, 1),
                max_cell: IVec2::new(1, 1),
                origin: crate::coords::block_center(IVec2::new(1, 1)),
                bounds: crate::coords::block_center(IVec2::new(1, 1)),
                layout: OPEN_LAYOUT.to_string(),
            },
        );
        let mut tiles = TileGrid::new(3);
        classify_tiles(&grid, &mut tiles, &rooms, &ObstacleLayouts::default(), 99);
        tiles
    }

    #[test]
    fn test_lone_room_ring_is_walls_and_corners() {
        let tiles = lone_room_tiles();
        let base = block_origin_tile(IVec2::new(1, 1));

        // all four corners are outer corners
        for (x, y) in [(0, 0), (0, H - 1), (W - 1, 0), (W - 1, H - 1)] {
            let tile = tiles.get(base + IVec2::new(x as i32, y as i32)).unwrap();
            assert_eq!(tile.kind, TileType::WallCorner, "corner ({x},{y})");
        }
        // mid-edges are plain walls with the edge rotation
        let bottom = tiles.get(base + IVec2::new(3, 0)).unwrap();
        assert_eq!((bottom.kind, bottom.rotation), (TileType::Wall, Rotation::R0));
        let left = tiles.get(base + IVec2::new(0, 3)).unwrap();
        assert_eq!((left.kind, left.rotation), (TileType::Wall, Rotation::R270));
        let top = tiles.get(base + IVec2::new(3, H as i32 - 1)).unwrap();
        assert_eq!((top.kind, top.rotation), (TileType::Wall, Rotation::R180));
        let right = tiles.get(base + IVec2::new(W as i32 - 1, 3)).unwrap();
        assert_eq!((right.kind, right.rotation), (TileType::Wall, Rotation::R90));
    }

    #[test]
    fn test_lone_room_interior_is_floor_and_owned() {
        let tiles = lone_room_tiles();
        let base = block_origin_tile(IVec2::new(1, 1));
        for y in 1..H - 1 {
            for x in 1..W - 1 {
                let tile = tiles.get(base + IVec2::new(x as i32, y as i32)).unwrap();
                assert_eq!(tile.kind, TileType::Floor);
                assert_eq!(tile.room, 1);
            }
        }
    }

    #[test]
    fn test_outside_footprint_stays_none() {
        let tiles = lone_room_tiles();
        // block (0,0) belongs to no room
        let tile = tiles.get(IVec2::new(2, 2)).unwrap();
        assert_eq!(tile.kind, TileType::None);
        assert_eq!(tile.room, EMPTY_CELL);
    }

    // ---- two-room adjacency ----

    fn two_room_tiles() -> TileGrid {
        // room 1 at (0,0), room 2 at (1,0): vertical shared border
        let mut grid = RoomGrid::new(2);
        grid.set(IVec2::new(0, 0), 1);
        grid.set(IVec2::new(1, 0), 2);
        let mut rooms = HashMap::new();
        for (id, x) in [(1, 0), (2, 1)] {
            rooms.insert(
                id,
                Room {
                    id,
                    cells: vec![IVec2::new(x, 0)],
                    min_cell: IVec2::new(x, 0),
                    max_cell: IVec2::new(x, 0),
                    origin: crate::coords::block_center(IVec2::new(x, 0)),
                    bounds: crate::coords::block_center(IVec2::new(x, 0)),
                    layout: OPEN_LAYOUT.to_string(),
                },
            );
        }
        let mut tiles = TileGrid::new(2);
        classify_tiles(&grid, &mut tiles, &rooms, &ObstacleLayouts::default(), 99);
        tiles
    }

    #[test]
    fn test_shared_border_has_facing_doors() {
        let tiles = two_room_tiles();
        let center_y = H as i32 / 2;

        // room 1's right edge column and room 2's left edge column
        let room1_edge = W as i32 - 1;
        let room2_edge = W as i32;
        for (x, room) in [(room1_edge, 1), (room2_edge, 2)] {
            let mut doors = 0;
            let mut lefts = 0;
            let mut rights = 0;
            for y in 0..H as i32 {
                let tile = tiles.get(IVec2::new(x, y)).unwrap();
                assert_eq!(tile.room, room);
                match tile.kind {
                    TileType::Door => doors += 1,
                    TileType::LeftDoorWall => lefts += 1,
                    TileType::RightDoorWall => rights += 1,
                    _ => {}
                }
            }
            assert_eq!(doors, 1, "room {room} edge doors");
            assert_eq!(lefts, 1, "room {room} edge left door walls");
            assert_eq!(rights, 1, "room {room} edge right door walls");
        }

        // the doors face each other at the edge center
        assert_eq!(
            tiles.get(IVec2::new(room1_edge, center_y)).unwrap().kind,
            TileType::Door
        );
        assert_eq!(
            tiles.get(IVec2::new(room2_edge, center_y)).unwrap().kind,
            TileType::Door
        );
    }

    #[test]
    fn test_same_room_spanning_two_cells_is_open() {
        // one room over two cells: no wall or door on the shared border
        let mut grid = RoomGrid::new(2);
        grid.set(IVec2::new(0, 0), 1);
        grid.set(IVec2::new(1, 0), 1);
        let mut rooms = HashMap::new();
        rooms.insert(
            1,
            Room {
                id: 1,
                cells: vec![IVec2::new(0, 0), IVec2::new(1, 0)],
                min_cell: IVec2::new(0, 0),
                max_cell: IVec2::new(1, 0),
                origin: crate::coords::block_center(IVec2::new(0, 0)),
                bounds: crate::coords::block_center(IVec2::new(1, 0)),
                layout: OPEN_LAYOUT.to_string(),
            },
        );
        let mut tiles = TileGrid::new(2);
        classify_tiles(&grid, &mut tiles, &rooms, &ObstacleLayouts::default(), 99);

        for x in [W as i32 - 1, W as i32] {
            for y in 1..H as i32 - 1 {
                let tile = tiles.get(IVec2::new(x, y)).unwrap();
                assert!(
                    !tile.kind.is_wall_like() && !tile.kind.is_door(),
                    "unexpected {:?} at ({x},{y}) on an open border",
                    tile.kind
                );
            }
        }
    }

    #[test]
    fn test_boss_room_gets_floor_exit() {
        let mut grid = RoomGrid::new(2);
        grid.set(IVec2::new(0, 1), 5);
        let mut rooms = HashMap::new();
        rooms.insert(
            5,
            Room {
                id: 5,
                cells: vec![IVec2::new(0, 1)],
                min_cell: IVec2::new(0, 1),
                max_cell: IVec2::new(0, 1),
                origin: crate::coords::block_center(IVec2::new(0, 1)),
                bounds: crate::coords::block_center(IVec2::new(0, 1)),
                layout: OPEN_LAYOUT.to_string(),
            },
        );
        let mut tiles = TileGrid::new(2);
        classify_tiles(&grid, &mut tiles, &rooms, &ObstacleLayouts::default(), 5);

        let base = block_origin_tile(IVec2::new(0, 1));
        let exit = base + IVec2::new(W as i32 / 2, H as i32 / 2);
        assert_eq!(tiles.get(exit).unwrap().kind, TileType::NextFloor);
        // exactly one exit tile in the whole grid
        let exits = tiles
            .iter()
            .filter(|(_, t)| t.kind == TileType::NextFloor)
            .count();
        assert_eq!(exits, 1);
    }
}
