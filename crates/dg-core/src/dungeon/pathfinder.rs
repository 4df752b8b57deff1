//! A* search over a bounded grid
//!
//! 4-connected. The caller prices each step through a closure; the search
//! adds the Euclidean distance to the goal, scaled by a weight, as its
//! heuristic. Equal estimates are expanded in the order they were discovered.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Price of stepping onto a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathCost {
    pub cost: f64,
    pub traversable: bool,
}

impl PathCost {
    pub const fn new(cost: f64) -> Self {
        Self {
            cost,
            traversable: true,
        }
    }

    pub const fn blocked() -> Self {
        Self {
            cost: 0.0,
            traversable: false,
        }
    }
}

/// Open-set entry
#[derive(Debug, Clone, Copy)]
struct PathNode {
    pos: Point,
    /// Accumulated step cost from the start
    g: f64,
    /// g plus the weighted heuristic
    f: f64,
    /// Discovery order; breaks ties in `f`
    seq: usize,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A resolved path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Cells from start to goal, both inclusive
    pub cells: Vec<Point>,
    /// Accumulated cost on arrival at each cell; starts at 0
    pub cumulative_costs: Vec<f64>,
}

impl Path {
    pub fn start(&self) -> Option<Point> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Point> {
        self.cells.last().copied()
    }

    pub fn total_cost(&self) -> f64 {
        self.cumulative_costs.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A* searcher confined to an inclusive rectangle
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder {
    min: Point,
    max: Point,
    heuristic_weight: f64,
}

impl Pathfinder {
    /// Search within `min..=max` on both axes
    pub fn new(min: Point, max: Point) -> Self {
        Self {
            min,
            max,
            heuristic_weight: 1.0,
        }
    }

    /// Scale the distance-to-goal estimate; 0 orders the open set by
    /// accumulated cost alone
    pub fn with_heuristic_weight(mut self, weight: f64) -> Self {
        self.heuristic_weight = weight.max(0.0);
        self
    }

    fn estimate(&self, g: f64, from: Point, goal: Point) -> f64 {
        g + self.heuristic_weight * from.distance(goal)
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Cheapest path from `start` to `goal`
    ///
    /// `step_cost(from, to)` prices moving between two adjacent cells. Returns
    /// `None` when either endpoint lies outside the bounds or no traversable
    /// route exists. Step costs are expected to be non-negative.
    pub fn find_path<F>(&self, start: Point, goal: Point, mut step_cost: F) -> Option<Path>
    where
        F: FnMut(Point, Point) -> PathCost,
    {
        if !self.in_bounds(start) || !self.in_bounds(goal) {
            return None;
        }

        let mut open = BinaryHeap::new();
        let mut closed: HashSet<Point> = HashSet::new();
        let mut best_g: HashMap<Point, f64> = HashMap::new();
        let mut came_from: HashMap<Point, Point> = HashMap::new();
        let mut seq = 0;

        best_g.insert(start, 0.0);
        open.push(PathNode {
            pos: start,
            g: 0.0,
            f: self.estimate(0.0, start, goal),
            seq,
        });

        while let Some(current) = open.pop() {
            if current.pos == goal {
                return Some(reconstruct(&came_from, &best_g, start, goal));
            }
            if !closed.insert(current.pos) {
                continue;
            }

            for next in current.pos.cardinal_neighbors() {
                if !self.in_bounds(next) || closed.contains(&next) {
                    continue;
                }
                let step = step_cost(current.pos, next);
                if !step.traversable {
                    continue;
                }

                let g = current.g + step.cost;
                if best_g.get(&next).is_some_and(|&known| known <= g) {
                    continue;
                }
                best_g.insert(next, g);
                came_from.insert(next, current.pos);
                seq += 1;
                open.push(PathNode {
                    pos: next,
                    g,
                    f: self.estimate(g, next, goal),
                    seq,
                });
            }
        }

        None
    }
}

fn reconstruct(
    came_from: &HashMap<Point, Point>,
    best_g: &HashMap<Point, f64>,
    start: Point,
    goal: Point,
) -> Path {
    let mut cells = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                cells.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    cells.reverse();

    let cumulative_costs = cells
        .iter()
        .map(|p| best_g.get(p).copied().unwrap_or(0.0))
        .collect();
    Path {
        cells,
        cumulative_costs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder() -> Pathfinder {
        Pathfinder::new(Point::new(0, 0), Point::new(9, 9))
    }

    #[test]
    fn test_straight_line() {
        let path = finder()
            .find_path(Point::new(1, 1), Point::new(5, 1), |_, _| PathCost::new(1.0))
            .unwrap();
        assert_eq!(path.start(), Some(Point::new(1, 1)));
        assert_eq!(path.goal(), Some(Point::new(5, 1)));
        assert_eq!(path.len(), 5);
        assert_eq!(path.total_cost(), 4.0);
    }

    #[test]
    fn test_start_equals_goal() {
        let p = Point::new(3, 3);
        let path = finder().find_path(p, p, |_, _| PathCost::new(1.0)).unwrap();
        assert_eq!(path.cells, vec![p]);
        assert_eq!(path.total_cost(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_endpoint() {
        let result = finder().find_path(Point::new(0, 0), Point::new(10, 0), |_, _| {
            PathCost::new(1.0)
        });
        assert!(result.is_none());
    }

    #[test]
    fn test_blocked_goal_unreachable() {
        let goal = Point::new(5, 5);
        let result = finder().find_path(Point::new(0, 0), goal, |_, to| {
            if to == goal {
                PathCost::blocked()
            } else {
                PathCost::new(1.0)
            }
        });
        assert!(result.is_none());
    }

    #[test]
    fn test_routes_around_wall() {
        // Vertical wall at x=4 with a gap at y=8
        let path = finder()
            .find_path(Point::new(2, 2), Point::new(6, 2), |_, to| {
                if to.x == 4 && to.y != 8 {
                    PathCost::blocked()
                } else {
                    PathCost::new(1.0)
                }
            })
            .unwrap();
        assert!(path.cells.contains(&Point::new(4, 8)));
        assert_eq!(path.total_cost(), 16.0);
    }

    #[test]
    fn test_prefers_cheap_cells() {
        // Row y=4 is cheap; a detour through it beats the direct expensive row
        let path = finder()
            .find_path(Point::new(0, 3), Point::new(9, 3), |_, to| {
                PathCost::new(if to.y == 4 { 1.0 } else { 5.0 })
            })
            .unwrap();
        assert_eq!(path.cells.iter().filter(|p| p.y == 4).count(), 10);
        // up 1, across 9, down onto the goal 5
        assert_eq!(path.total_cost(), 15.0);
    }

    #[test]
    fn test_costs_non_decreasing_and_adjacent() {
        let path = finder()
            .find_path(Point::new(0, 0), Point::new(9, 9), |_, to| {
                PathCost::new(if (to.x + to.y) % 3 == 0 { 10.0 } else { 1.0 })
            })
            .unwrap();
        assert_eq!(path.cells.len(), path.cumulative_costs.len());
        for pair in path.cumulative_costs.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        for pair in path.cells.windows(2) {
            let d = pair[1] - pair[0];
            assert_eq!(d.x.abs() + d.y.abs(), 1);
        }
    }

    #[test]
    fn test_deterministic_ties() {
        let run = || {
            finder()
                .find_path(Point::new(0, 0), Point::new(6, 6), |_, _| PathCost::new(1.0))
                .unwrap()
        };
        let first = run();
        for _ in 0..5 {
            assert_eq!(run(), first);
        }
    }

    #[test]
    fn test_first_discovered_wins_ties() {
        // (0, 1) and (1, 0) both reach f = 2; TOP is discovered before RIGHT
        let path = finder()
            .find_path(Point::new(0, 0), Point::new(1, 1), |_, _| PathCost::new(1.0))
            .unwrap();
        assert_eq!(
            path.cells,
            vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 1)]
        );

        // mirrored goal: BOTTOM is discovered before RIGHT
        let path = finder()
            .find_path(Point::new(0, 9), Point::new(1, 8), |_, _| PathCost::new(1.0))
            .unwrap();
        assert_eq!(
            path.cells,
            vec![Point::new(0, 9), Point::new(0, 8), Point::new(1, 8)]
        );
    }

    #[test]
    fn test_zero_weight_orders_by_cost() {
        let path = finder()
            .with_heuristic_weight(0.0)
            .find_path(Point::new(0, 3), Point::new(9, 3), |_, to| {
                PathCost::new(if to.y == 4 { 1.0 } else { 5.0 })
            })
            .unwrap();
        assert_eq!(path.total_cost(), 15.0);
    }
}
