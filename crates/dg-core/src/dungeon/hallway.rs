//! Hallway carving along the connectivity graph
//!
//! Each graph edge is resolved to a path between the two rooms' center
//! cells. Stepping onto a cell costs its distance to the goal plus a terrain
//! penalty, and the search orders its frontier by that accumulated cost
//! alone. Paths prefer existing hallways, then open rock, and avoid cutting
//! through rooms. Only `None` cells along a path become `Hallway`.

use serde::{Deserialize, Serialize};

use super::cell::CellType;
use super::delaunay::Edge;
use super::graph::ConnectivityGraph;
use super::grid::Grid2D;
use super::pathfinder::{Path, PathCost, Pathfinder};
use super::room::Room;
use crate::consts::{EMPTY_PENALTY, HALLWAY_PENALTY, ROOM_PENALTY};
use crate::geom::Point;

/// Terrain penalty for stepping onto a cell of the given kind
pub fn terrain_penalty(cell: CellType) -> f64 {
    match cell {
        CellType::Room => ROOM_PENALTY,
        CellType::None => EMPTY_PENALTY,
        CellType::Hallway => HALLWAY_PENALTY,
    }
}

/// Cost of stepping onto `next` (holding `cell`) on the way to `goal`
pub fn hallway_step_cost(next: Point, cell: CellType, goal: Point) -> PathCost {
    PathCost::new(next.distance(goal) + terrain_penalty(cell))
}

/// One resolved graph edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hallway {
    /// Room indices joined by this hallway
    pub rooms: (usize, usize),
    pub path: Path,
    /// Cells switched from `None` to `Hallway` by this carve
    pub carved: Vec<Point>,
}

/// Outcome of carving every graph edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarveReport {
    pub hallways: Vec<Hallway>,
    /// Edges the pathfinder could not resolve
    pub skipped: Vec<(usize, usize)>,
}

impl CarveReport {
    /// Total number of cells turned into hallway
    pub fn carved_cells(&self) -> usize {
        self.hallways.iter().map(|h| h.carved.len()).sum()
    }
}

/// Resolve a single edge and write its hallway cells into `grid`
pub fn carve_edge(grid: &mut Grid2D<CellType>, rooms: &[Room], edge: &Edge) -> Option<Hallway> {
    let (from, to) = (rooms.get(edge.u.id)?, rooms.get(edge.v.id)?);
    let finder = Pathfinder::new(grid.min(), grid.max()).with_heuristic_weight(0.0);
    let goal = to.center_cell();

    let path = {
        let grid = &*grid;
        finder.find_path(from.center_cell(), goal, |_, next| {
            grid.try_get(next)
                .map_or(PathCost::blocked(), |cell| hallway_step_cost(next, *cell, goal))
        })?
    };

    let mut carved = Vec::new();
    for &cell in &path.cells {
        if grid.get(cell) == CellType::None {
            grid.set(cell, CellType::Hallway);
            carved.push(cell);
        }
    }

    Some(Hallway {
        rooms: (edge.u.id, edge.v.id),
        path,
        carved,
    })
}

/// Carve every edge of `graph`, tree edges first
///
/// Later searches see hallways carved by earlier ones and tend to reuse them.
pub fn carve_hallways(
    grid: &mut Grid2D<CellType>,
    rooms: &[Room],
    graph: &ConnectivityGraph,
) -> CarveReport {
    let mut report = CarveReport::default();
    for edge in graph.edges() {
        match carve_edge(grid, rooms, edge) {
            Some(hallway) => report.hallways.push(hallway),
            None => {
                log::warn!(
                    "no hallway between rooms {} and {}, skipping edge",
                    edge.u.id,
                    edge.v.id
                );
                report.skipped.push(edge.key());
            }
        }
    }
    report
}
