//! Post-hoc connectivity checks
//!
//! Hallway connectivity is best effort: an edge the pathfinder could not
//! resolve is skipped. These helpers flood-fill the finished grid so callers
//! can verify what actually got connected.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::dungeon::{CarveReport, CellType, ConnectivityTracker, Grid2D, Room};
use crate::geom::Point;

/// Which rooms the first room can walk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConnectivity {
    /// Indexed like the room list
    pub reachable: Vec<bool>,
}

impl RoomConnectivity {
    pub fn all_connected(&self) -> bool {
        self.reachable.iter().all(|r| *r)
    }

    /// Indices of rooms cut off from the first room
    pub fn unreachable(&self) -> Vec<usize> {
        self.reachable
            .iter()
            .enumerate()
            .filter(|(_, r)| !**r)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Floor cells reachable from `start` through 4-connected floor
pub fn flood_floor(grid: &Grid2D<CellType>, start: Point) -> HashSet<Point> {
    let mut seen = HashSet::new();
    if !grid.try_get(start).is_some_and(CellType::is_floor) {
        return seen;
    }

    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(p) = queue.pop_front() {
        for next in p.cardinal_neighbors() {
            if grid.try_get(next).is_some_and(CellType::is_floor) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Flood-fill from the first room over Room/Hallway cells
pub fn connected_rooms(grid: &Grid2D<CellType>, rooms: &[Room]) -> RoomConnectivity {
    let Some(first) = rooms.first() else {
        return RoomConnectivity {
            reachable: Vec::new(),
        };
    };
    let reached = flood_floor(grid, first.position);
    RoomConnectivity {
        reachable: rooms
            .iter()
            .map(|room| reached.contains(&room.position))
            .collect(),
    }
}

/// Room classes joined by the hallways that were actually carved
pub fn carved_components(room_count: usize, report: &CarveReport) -> ConnectivityTracker {
    let mut tracker = ConnectivityTracker::new(room_count);
    for hallway in &report.hallways {
        tracker.merge(hallway.rooms.0, hallway.rooms.1);
    }
    tracker
}
