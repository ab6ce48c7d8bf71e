//! Demo binary: generate one floor and print it.
//!
//! Usage: `cargo run -- [floor_size] [seed] [floor_number]`

use anyhow::{Context, Result};

use floor_core::config::FloorConfig;
use floor_core::floor::Floor;
use floor_core::generation::obstacles::ObstacleLayouts;
use floor_core::logging;

fn main() -> Result<()> {
    logging::init_tracing_default();

    let mut args = std::env::args().skip(1);
    let floor_size = match args.next() {
        Some(raw) => raw.parse().context("floor_size must be an integer")?,
        None => FloorConfig::default().floor_size,
    };
    let seed = match args.next() {
        Some(raw) => raw.parse().context("seed must be an integer")?,
        None => FloorConfig::default().seed,
    };
    let floor_number = match args.next() {
        Some(raw) => raw.parse().context("floor_number must be an integer")?,
        None => 1,
    };

    let config = FloorConfig { floor_size, seed };
    let layouts = ObstacleLayouts::default();
    let floor = Floor::generate(&config, &layouts, floor_number)?;

    println!("{}", floor.ascii_map());
    println!(
        "floor {} | {}x{} cells | rooms 1..={} | spawn cell {} | connected: {}",
        floor.floor_number(),
        floor.floor_size(),
        floor.floor_size(),
        floor.max_room_id(),
        floor.spawn_cell(),
        floor.is_fully_connected(),
    );
    for room in 1..=floor.max_room_id() {
        let adjacent = floor.adjacent_rooms(room);
        println!("room {room:>2} -> doors to {adjacent:?}");
    }

    Ok(())
}
