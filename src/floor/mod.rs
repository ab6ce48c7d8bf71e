//! Floor lifecycle and orchestration.
//!
//! Two states: absent (no current floor) and generated. Generation allocates
//! the grids, grows the spawn room, grows regular rooms until the budget is
//! spent, grows the single-cell boss room last, classifies every tile, and
//! notifies the registered floor-generated handlers. Teardown drops the
//! grids, clears the tracking tables, and unhooks the floor's own
//! room-change handler; externally registered handlers survive.

use bevy::prelude::*;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::HashMap;

use crate::config::FloorConfig;
use crate::constants::{EMPTY_CELL, MAX_ROOM_CELLS, NO_ROOM, SPAWN_ROOM_ID};
use crate::coords;
use crate::generation::obstacles::{ObstacleLayouts, OPEN_LAYOUT};
use crate::generation::room_grid::{CellSet, RoomGrid};
use crate::generation::room_growth::{grow_room, Room};
use crate::generation::tiles::{Tile, TileGrid};
use crate::generation::walls::classify_tiles;
use crate::generation::{max_room_id_for, FloorSeed, GenerationError};
use crate::logging::TimingSpan;
use crate::tracking::{
    apply_room_lock_events, process_enemy_defeats, EnemyDefeatedEvent, RoomBound, RoomTracker,
    SetRoomLockedEvent,
};

/// Registry id of the floor's own auto-lock room-change handler
pub const AUTO_LOCK_HANDLER: &str = "floor/auto-lock";

pub struct FloorPlugin;

impl Plugin for FloorPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(FloorConfig::default())
            .insert_resource(ObstacleLayouts::default())
            .insert_resource(FloorManager::default())
            .insert_resource(RoomTracker::default())
            .insert_resource(RoomChangeService::default())
            .insert_resource(CurrentRoom::default())
            .add_event::<GenerateFloorEvent>()
            .add_event::<DestroyFloorEvent>()
            .add_event::<FloorGeneratedEvent>()
            .add_event::<FloorDestroyedEvent>()
            .add_event::<RoomChangeEvent>()
            .add_event::<EnemyDefeatedEvent>()
            .add_event::<SetRoomLockedEvent>()
            .add_systems(
                Update,
                (
                    handle_generate_requests,
                    handle_destroy_requests,
                    dispatch_room_changes,
                    process_enemy_defeats,
                    apply_room_lock_events,
                    update_room_activation,
                )
                    .chain(),
            );
    }
}

// =====================================================
// Events & shared resources
// =====================================================

/// Request a new floor
#[derive(Event, Debug, Clone, Copy)]
pub struct GenerateFloorEvent {
    pub floor_number: u32,
}

/// Request teardown of the current floor
#[derive(Event, Debug, Clone, Copy)]
pub struct DestroyFloorEvent;

/// A floor finished generating
#[derive(Event, Debug, Clone, Copy)]
pub struct FloorGeneratedEvent {
    pub floor_number: u32,
    pub max_room_id: i32,
    pub spawn_room: i32,
    pub spawn_position: Vec2,
}

/// The current floor was torn down
#[derive(Event, Debug, Clone, Copy)]
pub struct FloorDestroyedEvent;

/// The player crossed into another room.
/// Written by the host's movement systems, consumed here.
#[derive(Event, Debug, Clone, Copy)]
pub struct RoomChangeEvent {
    pub previous: i32,
    pub current: i32,
}

/// Room the player is currently in (`NO_ROOM` while no floor exists)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentRoom {
    pub room: i32,
}

impl Default for CurrentRoom {
    fn default() -> Self {
        Self { room: NO_ROOM }
    }
}

/// Room-change subscriber callback; runs with full world access
pub type RoomChangeHandler = Box<dyn FnMut(&RoomChangeEvent, &mut World) + Send + Sync>;

/// String-keyed room-change notification service.
/// Registering an id that is already present replaces the previous handler.
#[derive(Resource, Default)]
pub struct RoomChangeService {
    handlers: HashMap<String, RoomChangeHandler>,
}

impl RoomChangeService {
    /// Returns true when an existing handler with the same id was replaced
    pub fn register(&mut self, id: impl Into<String>, handler: RoomChangeHandler) -> bool {
        let id = id.into();
        let replaced = self.handlers.insert(id.clone(), handler).is_some();
        if replaced {
            debug!(handler = id.as_str(), "room-change handler replaced");
        }
        replaced
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        self.handlers.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// =====================================================
// The floor itself
// =====================================================

/// One generated floor: grids, rooms, and the room adjacency graph.
#[derive(Debug)]
pub struct Floor {
    floor_number: u32,
    room_grid: RoomGrid,
    tile_grid: TileGrid,
    rooms: HashMap<i32, Room>,
    /// Empty cells still adjacent to the placed rooms after generation
    origin_frontier: CellSet,
    spawn_cell: IVec2,
    spawn_position: Vec2,
    max_room_id: i32,
    room_graph: UnGraph<i32, ()>,
    room_nodes: HashMap<i32, NodeIndex>,
}

impl Floor {
    /// Generate a complete floor. Deterministic per (config.seed, floor_number).
    pub fn generate(
        config: &FloorConfig,
        layouts: &ObstacleLayouts,
        floor_number: u32,
    ) -> Result<Self, GenerationError> {
        let size = config.floor_size;
        if size < 2 {
            return Err(GenerationError::FloorTooSmall(size));
        }

        let hash = FloorSeed::new(config.seed).floor_hash(floor_number);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(hash);

        let mut grid = RoomGrid::new(size);
        let mut origins = CellSet::default();
        let mut rooms = HashMap::new();
        let max_room_id = max_room_id_for(size);

        let spawn_cell = IVec2::new(
            rng.gen_range(0..size as i32),
            rng.gen_range(0..size as i32),
        );
        let mut spawn_room = grow_room(&mut grid, &mut origins, &mut rng, spawn_cell, SPAWN_ROOM_ID, 1);
        spawn_room.layout = OPEN_LAYOUT.to_string();
        rooms.insert(SPAWN_ROOM_ID, spawn_room);

        for id in (SPAWN_ROOM_ID + 1)..=max_room_id {
            // every later room is seeded from a cell adjacent to the region
            // placed so far, which keeps the floor connected
            let origin = origins.pick(&mut rng).ok_or(GenerationError::FrontierExhausted {
                placed: id - 1,
                required: max_room_id,
            })?;
            let is_boss = id == max_room_id;
            let max_cells = if is_boss { 1 } else { MAX_ROOM_CELLS };
            let mut room = grow_room(&mut grid, &mut origins, &mut rng, origin, id, max_cells);
            room.layout = if is_boss {
                OPEN_LAYOUT.to_string()
            } else {
                layouts.pick(&mut rng).to_string()
            };
            debug!(room = id, cells = room.cell_count(), "room grown");
            rooms.insert(id, room);
        }

        let mut tile_grid = TileGrid::new(size);
        classify_tiles(&grid, &mut tile_grid, &rooms, layouts, max_room_id);

        let (room_graph, room_nodes) = build_room_graph(&grid);

        info!(
            floor = floor_number,
            rooms = rooms.len(),
            "generated {size}x{size} floor"
        );

        Ok(Self {
            floor_number,
            room_grid: grid,
            tile_grid,
            rooms,
            origin_frontier: origins,
            spawn_cell,
            spawn_position: coords::block_center(spawn_cell),
            max_room_id,
            room_graph,
            room_nodes,
        })
    }

    pub fn floor_number(&self) -> u32 {
        self.floor_number
    }

    pub fn floor_size(&self) -> usize {
        self.room_grid.size()
    }

    pub fn max_room_id(&self) -> i32 {
        self.max_room_id
    }

    pub fn spawn_cell(&self) -> IVec2 {
        self.spawn_cell
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_position
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, id: i32) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Room id at a grid cell; `NO_ROOM` outside the floor
    pub fn room_at_cell(&self, x: i32, y: i32) -> i32 {
        self.room_grid.room_at(x, y)
    }

    /// Room id at a world position; `NO_ROOM` outside the floor
    pub fn room_at_position(&self, position: Vec2) -> i32 {
        let cell = coords::cell_at_position(position);
        self.room_grid.room_at(cell.x, cell.y)
    }

    pub fn tile_at(&self, coord: IVec2) -> Option<&Tile> {
        self.tile_grid.get(coord)
    }

    pub fn tile_at_position(&self, position: Vec2) -> Option<&Tile> {
        self.tile_grid.get(coords::tile_coordinates(position))
    }

    /// Cells still available as room origins (empty, adjacent to a room)
    pub fn origin_frontier(&self) -> &CellSet {
        &self.origin_frontier
    }

    /// Rooms reachable through one door from `room`, ascending
    pub fn adjacent_rooms(&self, room: i32) -> Vec<i32> {
        let Some(&node) = self.room_nodes.get(&room) else {
            return Vec::new();
        };
        let mut rooms: Vec<i32> = self
            .room_graph
            .neighbors(node)
            .map(|n| self.room_graph[n])
            .collect();
        rooms.sort_unstable();
        rooms
    }

    /// Every room reachable from every other through doors
    pub fn is_fully_connected(&self) -> bool {
        self.rooms.len() <= 1 || connected_components(&self.room_graph) == 1
    }

    pub fn for_each_cell(&self, mut visit: impl FnMut(IVec2, i32)) {
        for (cell, room) in self.room_grid.iter() {
            visit(cell, room);
        }
    }

    pub fn for_each_tile(&self, mut visit: impl FnMut(IVec2, &Tile)) {
        for (coord, tile) in self.tile_grid.iter() {
            visit(coord, tile);
        }
    }

    /// Glyph-per-tile debug rendering, top row first
    pub fn ascii_map(&self) -> String {
        let width = self.tile_grid.width();
        let height = self.tile_grid.height();
        let mut out = String::with_capacity((width + 1) * height);
        for y in (0..height as i32).rev() {
            for x in 0..width as i32 {
                if let Some(tile) = self.tile_grid.get(IVec2::new(x, y)) {
                    out.push(tile.kind.glyph());
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Adjacency graph over room ids; an edge per shared (door) border
fn build_room_graph(grid: &RoomGrid) -> (UnGraph<i32, ()>, HashMap<i32, NodeIndex>) {
    let mut graph: UnGraph<i32, ()> = UnGraph::new_undirected();
    let mut nodes: HashMap<i32, NodeIndex> = HashMap::new();
    for (_, room) in grid.iter() {
        if room != EMPTY_CELL {
            nodes.entry(room).or_insert_with(|| graph.add_node(room));
        }
    }
    for (cell, room) in grid.iter() {
        if room == EMPTY_CELL {
            continue;
        }
        for neighbor in [cell + IVec2::new(1, 0), cell + IVec2::new(0, 1)] {
            let other = grid.neighbor_or_empty(neighbor);
            if other == EMPTY_CELL || other == room {
                continue;
            }
            if let (Some(&a), Some(&b)) = (nodes.get(&room), nodes.get(&other)) {
                graph.update_edge(a, b, ());
            }
        }
    }
    (graph, nodes)
}

// =====================================================
// Manager & lifecycle
// =====================================================

/// Floor-generated subscriber callback
pub type FloorGeneratedHandler = Box<dyn Fn(&Floor) + Send + Sync>;

/// Owns the current floor and the floor-generated handler registry.
#[derive(Resource, Default)]
pub struct FloorManager {
    floor: Option<Floor>,
    generated_handlers: HashMap<String, FloorGeneratedHandler>,
}

impl FloorManager {
    pub fn floor(&self) -> Option<&Floor> {
        self.floor.as_ref()
    }

    /// Register a floor-generated handler; same id replaces the previous one
    pub fn add_generated_handler(
        &mut self,
        id: impl Into<String>,
        handler: FloorGeneratedHandler,
    ) -> bool {
        let id = id.into();
        let replaced = self.generated_handlers.insert(id.clone(), handler).is_some();
        if replaced {
            debug!(handler = id.as_str(), "floor-generated handler replaced");
        }
        replaced
    }

    pub fn remove_generated_handler(&mut self, id: &str) -> bool {
        self.generated_handlers.remove(id).is_some()
    }

    pub fn has_generated_handler(&self, id: &str) -> bool {
        self.generated_handlers.contains_key(id)
    }

    /// Generate and store a floor, notifying every registered handler.
    /// Notification order is unspecified.
    pub fn generate_floor(
        &mut self,
        config: &FloorConfig,
        layouts: &ObstacleLayouts,
        floor_number: u32,
    ) -> Result<&Floor, GenerationError> {
        let _timing = TimingSpan::new("generate_floor");
        let floor = Floor::generate(config, layouts, floor_number)?;
        for (id, handler) in &self.generated_handlers {
            debug!(handler = id.as_str(), "notifying floor-generated handler");
            handler(&floor);
        }
        Ok(self.floor.insert(floor))
    }

    /// Drop the current floor; returns false when already absent
    pub fn destroy_floor(&mut self) -> bool {
        match self.floor.take() {
            Some(floor) => {
                info!(floor = floor.floor_number(), "floor destroyed");
                true
            }
            None => false,
        }
    }
}

/// Generate a floor and wire up the lifecycle's own bookkeeping.
/// Any floor still live is torn down first.
pub fn generate_floor(world: &mut World, floor_number: u32) {
    destroy_floor(world);

    let config = world.resource::<FloorConfig>().clone();
    let layouts = world.resource::<ObstacleLayouts>().clone();
    let announce = {
        let mut manager = world.resource_mut::<FloorManager>();
        match manager.generate_floor(&config, &layouts, floor_number) {
            Ok(floor) => FloorGeneratedEvent {
                floor_number,
                max_room_id: floor.max_room_id(),
                spawn_room: SPAWN_ROOM_ID,
                spawn_position: floor.spawn_position(),
            },
            Err(err) => {
                // a malformed floor would corrupt every downstream consumer
                error!("floor generation failed: {err}");
                panic!("unrecoverable floor generation failure: {err}");
            }
        }
    };

    world
        .resource_mut::<RoomChangeService>()
        .register(AUTO_LOCK_HANDLER, Box::new(auto_lock_on_entry));
    world.resource_mut::<CurrentRoom>().room = SPAWN_ROOM_ID;
    world.send_event(announce);
}

/// Tear down the current floor and its bookkeeping. No-op when absent.
pub fn destroy_floor(world: &mut World) {
    if !world.resource_mut::<FloorManager>().destroy_floor() {
        return;
    }
    world.resource_mut::<RoomTracker>().clear();
    world
        .resource_mut::<RoomChangeService>()
        .unregister(AUTO_LOCK_HANDLER);
    world.resource_mut::<CurrentRoom>().room = NO_ROOM;
    world.send_event(FloorDestroyedEvent);
}

/// The floor's own room-change handler: entering a contested room locks it.
fn auto_lock_on_entry(change: &RoomChangeEvent, world: &mut World) {
    let contested = world
        .resource::<RoomTracker>()
        .has_enemies(change.current);
    if contested {
        world.send_event(SetRoomLockedEvent {
            room: change.current,
            locked: true,
        });
    }
}

pub fn handle_generate_requests(world: &mut World) {
    let requests: Vec<GenerateFloorEvent> = world
        .resource_mut::<Events<GenerateFloorEvent>>()
        .drain()
        .collect();
    for request in requests {
        generate_floor(world, request.floor_number);
    }
}

pub fn handle_destroy_requests(world: &mut World) {
    let requests = world
        .resource_mut::<Events<DestroyFloorEvent>>()
        .drain()
        .count();
    for _ in 0..requests {
        destroy_floor(world);
    }
}

/// Fan room-change events out to every registered handler
pub fn dispatch_room_changes(world: &mut World) {
    let changes: Vec<RoomChangeEvent> = world
        .resource_mut::<Events<RoomChangeEvent>>()
        .drain()
        .collect();
    for change in changes {
        debug!(from = change.previous, to = change.current, "room change");
        world.resource_mut::<CurrentRoom>().room = change.current;
        let Some(mut service) = world.remove_resource::<RoomChangeService>() else {
            break;
        };
        for handler in service.handlers.values_mut() {
            handler(&change, world);
        }
        world.insert_resource(service);
    }
}

/// Show only entities bound to the current room or a door-adjacent one
pub fn update_room_activation(
    current: Res<CurrentRoom>,
    manager: Res<FloorManager>,
    mut entities: Query<(&RoomBound, &mut Visibility)>,
) {
    if !current.is_changed() {
        return;
    }
    let Some(floor) = manager.floor() else {
        return;
    };
    let mut active = floor.adjacent_rooms(current.room);
    active.push(current.room);
    for (bound, mut visibility) in &mut entities {
        *visibility = if active.contains(&bound.room) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
