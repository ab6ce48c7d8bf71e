//! Room-indexed entity tracking.
//!
//! Maps room ids to the enemies alive in them and the exits leading out of
//! them, so exits lock while a room is contested and unlock when it clears.
//! Double-adds and removes of untracked entities are caller bugs and are
//! surfaced as errors, never masked — a silently skipped update would
//! desynchronize these tables from the real entity population.

use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Marks an entity as an enemy bound to a room
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy {
    pub room: i32,
}

/// A lockable exit (door or floor exit) belonging to a room
#[derive(Component, Debug, Clone, Copy)]
pub struct ExitDoor {
    pub room: i32,
    pub locked: bool,
}

/// An entity that only matters while its room (or a neighbor) is active
#[derive(Component, Debug, Clone, Copy)]
pub struct RoomBound {
    pub room: i32,
}

/// An enemy died or despawned; its room's bookkeeping must update
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDefeatedEvent {
    pub room: i32,
    pub entity: Entity,
}

/// Lock or unlock every exit of a room.
/// The single entry point for exit-lock state changes.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetRoomLockedEvent {
    pub room: i32,
    pub locked: bool,
}

/// Usage errors from the tracking tables — caller bugs, not runtime states
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    #[error("entity {entity:?} is already a tracked enemy of room {room}")]
    EnemyAlreadyTracked { room: i32, entity: Entity },

    #[error("entity {entity:?} is not a tracked enemy of room {room}")]
    EnemyNotTracked { room: i32, entity: Entity },

    #[error("entity {entity:?} is already a tracked exit of room {room}")]
    ExitAlreadyTracked { room: i32, entity: Entity },

    #[error("entity {entity:?} is not tracked as an enemy of any room")]
    UntrackedEntity { entity: Entity },
}

/// Room id -> enemies and exits
#[derive(Resource, Debug, Default)]
pub struct RoomTracker {
    enemies: HashMap<i32, Vec<Entity>>,
    exits: HashMap<i32, Vec<Entity>>,
}

impl RoomTracker {
    /// Track an enemy in a room; each entity at most once per room
    pub fn add_enemy(&mut self, room: i32, entity: Entity) -> Result<(), TrackingError> {
        let list = self.enemies.entry(room).or_default();
        if list.contains(&entity) {
            return Err(TrackingError::EnemyAlreadyTracked { room, entity });
        }
        list.push(entity);
        Ok(())
    }

    /// Stop tracking an enemy; returns true when the room just became clear
    pub fn remove_enemy(&mut self, room: i32, entity: Entity) -> Result<bool, TrackingError> {
        let list = self
            .enemies
            .get_mut(&room)
            .ok_or(TrackingError::EnemyNotTracked { room, entity })?;
        let slot = list
            .iter()
            .position(|&e| e == entity)
            .ok_or(TrackingError::EnemyNotTracked { room, entity })?;
        list.remove(slot);
        Ok(list.is_empty())
    }

    /// Track an exit belonging to a room
    pub fn add_exit(&mut self, room: i32, entity: Entity) -> Result<(), TrackingError> {
        let list = self.exits.entry(room).or_default();
        if list.contains(&entity) {
            return Err(TrackingError::ExitAlreadyTracked { room, entity });
        }
        list.push(entity);
        Ok(())
    }

    /// Exits tracked for a room (empty slice for unknown rooms)
    pub fn exits(&self, room: i32) -> &[Entity] {
        self.exits.get(&room).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn enemy_count(&self, room: i32) -> usize {
        self.enemies.get(&room).map(Vec::len).unwrap_or(0)
    }

    pub fn has_enemies(&self, room: i32) -> bool {
        self.enemy_count(room) > 0
    }

    /// Room an enemy is tracked in. Linear scan; a miss is an internal
    /// consistency failure, not an expected runtime path.
    pub fn get_enemy_room(&self, entity: Entity) -> Result<i32, TrackingError> {
        self.enemies
            .iter()
            .find(|(_, list)| list.contains(&entity))
            .map(|(&room, _)| room)
            .ok_or(TrackingError::UntrackedEntity { entity })
    }

    /// Drop all bookkeeping (floor teardown)
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.exits.clear();
    }
}

/// Consume defeat events; a room's last enemy unlocks its exits.
pub fn process_enemy_defeats(
    mut defeats: EventReader<EnemyDefeatedEvent>,
    mut tracker: ResMut<RoomTracker>,
    mut locks: EventWriter<SetRoomLockedEvent>,
) {
    for defeat in defeats.read() {
        match tracker.remove_enemy(defeat.room, defeat.entity) {
            Ok(true) => {
                info!(room = defeat.room, "room cleared, unlocking exits");
                locks.send(SetRoomLockedEvent {
                    room: defeat.room,
                    locked: false,
                });
            }
            Ok(false) => {}
            Err(err) => error!("enemy defeat bookkeeping failed: {err}"),
        }
    }
}

/// Apply lock/unlock requests to every tracked exit of the room.
pub fn apply_room_lock_events(
    mut requests: EventReader<SetRoomLockedEvent>,
    tracker: Res<RoomTracker>,
    mut doors: Query<&mut ExitDoor>,
) {
    for request in requests.read() {
        for &exit in tracker.exits(request.room) {
            match doors.get_mut(exit) {
                Ok(mut door) => door.locked = request.locked,
                Err(_) => warn!(
                    room = request.room,
                    "tracked exit {exit:?} no longer has an ExitDoor component"
                ),
            }
        }
        debug!(
            room = request.room,
            locked = request.locked,
            exits = tracker.exits(request.room).len(),
            "room lock state applied"
        );
    }
}
