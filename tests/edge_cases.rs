//! Edge case & boundary tests.
//!
//! Behavior at system boundaries:
//! - Minimum and invalid floor sizes
//! - Out-of-range coordinate and room queries -> sentinels, never panics
//! - Tracking-table misuse -> reported usage errors, no crashes
//! - Lifecycle transitions (destroy without generate, regenerate in place)
//! - Handler registry replace/remove semantics

use bevy::math::{IVec2, Vec2};
use bevy::prelude::Entity;

use floor_core::config::FloorConfig;
use floor_core::constants::{
    MAX_ROOM_CELLS, NO_ROOM, SINGLE_CELL_ROOMS, SPAWN_ROOM_ID,
};
use floor_core::floor::{Floor, FloorManager};
use floor_core::generation::obstacles::ObstacleLayouts;
use floor_core::generation::{max_room_id_for, GenerationError};
use floor_core::tracking::{RoomTracker, TrackingError};

fn generate(floor_size: usize, seed: u64) -> Floor {
    let config = FloorConfig { floor_size, seed };
    Floor::generate(&config, &ObstacleLayouts::default(), 1).unwrap()
}

// ============================================================
// Floor sizes
// ============================================================

#[test]
fn zero_floor_size_is_rejected() {
    let config = FloorConfig {
        floor_size: 0,
        seed: 42,
    };
    let err = Floor::generate(&config, &ObstacleLayouts::default(), 1).unwrap_err();
    assert_eq!(err, GenerationError::FloorTooSmall(0));
}

#[test]
fn one_cell_floor_is_rejected() {
    let config = FloorConfig {
        floor_size: 1,
        seed: 42,
    };
    assert!(Floor::generate(&config, &ObstacleLayouts::default(), 1).is_err());
}

#[test]
fn minimal_floor_holds_spawn_and_boss_only() {
    let floor = generate(2, 11);
    assert_eq!(floor.max_room_id(), SINGLE_CELL_ROOMS as i32);
    assert_eq!(floor.room_count(), 2);
}

#[test]
fn budget_formula_matches_room_constants() {
    // ((6*6 - 2) / 4) + 2 = 10
    assert_eq!(max_room_id_for(6), 10);
    // the formula must follow the constants, not a second hardcoded copy
    for n in 2..=16usize {
        assert_eq!(
            max_room_id_for(n),
            ((n * n - SINGLE_CELL_ROOMS) / MAX_ROOM_CELLS + SINGLE_CELL_ROOMS) as i32
        );
    }
}

#[test]
fn large_floor_generates() {
    let floor = generate(16, 3);
    assert!(floor.is_fully_connected());
    assert_eq!(floor.max_room_id(), max_room_id_for(16));
}

// ============================================================
// Query boundaries
// ============================================================

#[test]
fn far_out_of_range_queries_return_sentinel() {
    let floor = generate(6, 42);
    assert_eq!(floor.room_at_cell(i32::MIN, 0), NO_ROOM);
    assert_eq!(floor.room_at_cell(0, i32::MAX), NO_ROOM);
    assert_eq!(
        floor.room_at_position(Vec2::new(f32::MAX / 2.0, 0.0)),
        NO_ROOM
    );
    assert_eq!(
        floor.room_at_position(Vec2::new(-1e9, -1e9)),
        NO_ROOM
    );
    assert!(floor.tile_at(IVec2::new(i32::MIN, i32::MIN)).is_none());
    assert!(floor
        .tile_at_position(Vec2::new(-1e9, 1e9))
        .is_none());
}

#[test]
fn just_past_the_border_is_no_room() {
    let floor = generate(4, 7);
    let size = floor.floor_size() as i32;
    assert_eq!(floor.room_at_cell(size, 0), NO_ROOM);
    assert_eq!(floor.room_at_cell(-1, 0), NO_ROOM);
    // one world unit left of the floor
    assert_eq!(floor.room_at_position(Vec2::new(-1.0, 1.0)), NO_ROOM);
}

#[test]
fn unknown_room_queries_are_empty() {
    let floor = generate(4, 7);
    assert!(floor.room(999).is_none());
    assert!(floor.adjacent_rooms(999).is_empty());
    assert!(floor.room(NO_ROOM).is_none());
}

// ============================================================
// Tracking-table misuse
// ============================================================

#[test]
fn remove_of_never_added_enemy_reports_error() {
    let mut tracker = RoomTracker::default();
    let ghost = Entity::from_raw(123);
    let err = tracker.remove_enemy(5, ghost).unwrap_err();
    assert_eq!(
        err,
        TrackingError::EnemyNotTracked {
            room: 5,
            entity: ghost
        }
    );
}

#[test]
fn remove_from_wrong_room_reports_error() {
    let mut tracker = RoomTracker::default();
    let enemy = Entity::from_raw(1);
    tracker.add_enemy(2, enemy).unwrap();
    assert!(tracker.remove_enemy(3, enemy).is_err());
    // still tracked where it was added
    assert_eq!(tracker.get_enemy_room(enemy), Ok(2));
}

#[test]
fn double_add_reports_error_and_keeps_one_entry() {
    let mut tracker = RoomTracker::default();
    let enemy = Entity::from_raw(8);
    tracker.add_enemy(4, enemy).unwrap();
    assert!(tracker.add_enemy(4, enemy).is_err());
    tracker.remove_enemy(4, enemy).unwrap();
    assert!(!tracker.has_enemies(4));
}

#[test]
fn same_entity_may_be_tracked_in_two_rooms() {
    // two rooms can reference one entity; per-room uniqueness is the rule
    let mut tracker = RoomTracker::default();
    let enemy = Entity::from_raw(9);
    tracker.add_enemy(1, enemy).unwrap();
    tracker.add_enemy(2, enemy).unwrap();
    assert_eq!(tracker.enemy_count(1), 1);
    assert_eq!(tracker.enemy_count(2), 1);
}

// ============================================================
// Lifecycle transitions
// ============================================================

#[test]
fn destroy_without_generate_is_noop() {
    let mut manager = FloorManager::default();
    assert!(!manager.destroy_floor());
    assert!(manager.floor().is_none());
}

#[test]
fn regenerate_replaces_the_floor() {
    let mut manager = FloorManager::default();
    let config = FloorConfig::default();
    let layouts = ObstacleLayouts::default();

    manager.generate_floor(&config, &layouts, 1).unwrap();
    let second_spawn = manager
        .generate_floor(&config, &layouts, 2)
        .unwrap()
        .spawn_cell();

    let floor = manager.floor().unwrap();
    assert_eq!(floor.floor_number(), 2);
    assert_eq!(floor.spawn_cell(), second_spawn);
}

#[test]
fn spawn_room_always_queryable_after_generate() {
    for seed in 0..20 {
        let floor = generate(6, seed);
        let spawn = floor.spawn_cell();
        assert_eq!(floor.room_at_cell(spawn.x, spawn.y), SPAWN_ROOM_ID);
        assert_eq!(floor.room_at_position(floor.spawn_position()), SPAWN_ROOM_ID);
    }
}

// ============================================================
// Handler registry
// ============================================================

#[test]
fn remove_of_unknown_handler_reports_false() {
    let mut manager = FloorManager::default();
    assert!(!manager.remove_generated_handler("nobody"));
    manager.add_generated_handler("minimap", Box::new(|_| {}));
    assert!(manager.remove_generated_handler("minimap"));
    assert!(!manager.remove_generated_handler("minimap"));
}

#[test]
fn handler_ids_are_distinct() {
    let mut manager = FloorManager::default();
    manager.add_generated_handler("minimap", Box::new(|_| {}));
    manager.add_generated_handler("spawner", Box::new(|_| {}));
    assert!(manager.has_generated_handler("minimap"));
    assert!(manager.has_generated_handler("spawner"));
    manager.remove_generated_handler("minimap");
    assert!(manager.has_generated_handler("spawner"));
}
