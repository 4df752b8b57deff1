//! Random room placement
//!
//! One candidate is drawn per requested room. A candidate that leaves the
//! grid or comes within `ROOM_BUFFER` cells of an accepted room is dropped
//! without a retry, so fewer rooms than requested is a normal outcome.

use super::cell::CellType;
use super::grid::Grid2D;
use super::room::Room;
use crate::config::GeneratorConfig;
use crate::consts::ROOM_BUFFER;
use crate::geom::{Point, Size};
use crate::rng::DungeonRng;

/// Draw one candidate room: position first, then size
fn candidate(config: &GeneratorConfig, rng: &mut DungeonRng) -> Room {
    let position = Point::new(
        rng.rn2(config.width as u32) as i32,
        rng.rn2(config.height as u32) as i32,
    );
    let size = Size::new(
        rng.range_inclusive(config.room_min_size.width, config.room_max_size.width),
        rng.range_inclusive(config.room_min_size.height, config.room_max_size.height),
    );
    Room::new(position, size)
}

/// Whether `room` may join the already accepted `rooms`
pub fn can_place(room: &Room, rooms: &[Room], extent: Size) -> bool {
    room.fits_within(extent) && !rooms.iter().any(|other| room.overlaps(other, ROOM_BUFFER))
}

/// Place up to `config.room_count` rooms and mark their cells in `grid`
pub fn place_rooms(
    config: &GeneratorConfig,
    grid: &mut Grid2D<CellType>,
    rng: &mut DungeonRng,
) -> Vec<Room> {
    let extent = config.grid_size();
    let mut rooms: Vec<Room> = Vec::new();

    for attempt in 0..config.room_count {
        let room = candidate(config, rng);
        if !can_place(&room, &rooms, extent) {
            log::trace!("room attempt {} rejected at {}", attempt, room.position);
            continue;
        }
        for cell in room.cells() {
            grid.set(cell, CellType::Room);
        }
        rooms.push(room);
    }

    if rooms.len() < config.room_count as usize {
        log::warn!(
            "placed {} of {} requested rooms",
            rooms.len(),
            config.room_count
        );
    }
    rooms
}
