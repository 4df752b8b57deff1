//! Dungeon layout
//!
//! Contains the cell grid, rooms, and the graph and search algorithms that
//! connect them with hallways.

mod cell;
mod delaunay;
mod graph;
mod grid;
mod hallway;
mod pathfinder;
mod placement;
mod room;

pub use cell::CellType;
pub use delaunay::{Delaunay, Edge, Triangle, Vertex};
pub use graph::{
    minimum_spanning_tree, select_loop_edges, total_weight, ConnectivityGraph,
    ConnectivityTracker,
};
pub use grid::Grid2D;
pub use hallway::{
    carve_edge, carve_hallways, hallway_step_cost, terrain_penalty, CarveReport, Hallway,
};
pub use pathfinder::{Path, PathCost, Pathfinder};
pub use placement::{can_place, place_rooms};
pub use room::Room;
