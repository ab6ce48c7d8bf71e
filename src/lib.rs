//! Dungeon Floor Core
//!
//! Deterministic procedural floor generation and the per-room bookkeeping
//! built on top of it:
//! - Room growth (randomized region growth over a square grid)
//! - Wall/door/floor tile classification from room adjacency
//! - World/tile/room coordinate conversions
//! - Room-indexed enemy and exit tracking with lock/unlock flow
//! - Floor lifecycle (generate/destroy, handler registries, room changes)

pub mod config;
pub mod constants;
pub mod coords;
pub mod floor;
pub mod generation;
pub mod logging;
pub mod tracking;
