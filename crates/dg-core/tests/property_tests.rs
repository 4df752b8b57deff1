use std::collections::BTreeSet;

use proptest::prelude::*;

use dg_core::consts::ROOM_BUFFER;
use dg_core::dungeon::{
    minimum_spanning_tree, total_weight, CellType, ConnectivityTracker, Delaunay, Edge, Grid2D,
    PathCost, Pathfinder, Vertex,
};
use dg_core::geom::{Point, Size, Vec2};
use dg_core::validate::connected_rooms;
use dg_core::{GeneratorConfig, SceneLedger, generate};

fn vertices(points: &BTreeSet<(i32, i32)>) -> Vec<Vertex> {
    points
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| Vertex::new(id, Vec2::new(x as f64, y as f64)))
        .collect()
}

/// Cheapest spanning tree weight by trying every (n-1)-edge subset
fn brute_force_mst_weight(n: usize, edges: &[Edge]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for mask in 0u32..(1 << edges.len()) {
        if mask.count_ones() as usize != n - 1 {
            continue;
        }
        let mut tracker = ConnectivityTracker::new(n);
        let mut weight = 0.0;
        for (i, edge) in edges.iter().enumerate() {
            if mask & (1 << i) != 0 {
                tracker.merge(edge.u.id, edge.v.id);
                weight += edge.length();
            }
        }
        if tracker.all_connected() && best.is_none_or(|b| weight < b) {
            best = Some(weight);
        }
    }
    best
}

/// Can a circle pass through points `i` and `j` with no other point strictly
/// inside it (`strict = false`), or with no other point on or inside it
/// (`strict = true`)
fn has_empty_circle(points: &[(f64, f64)], i: usize, j: usize, strict: bool) -> bool {
    let dist2 = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2);
    let (pi, pj) = (points[i], points[j]);
    let mid = ((pi.0 + pj.0) / 2.0, (pi.1 + pj.1) / 2.0);
    let normal = (pi.1 - pj.1, pj.0 - pi.0);

    // With the center at mid + t * normal, point k stays outside while
    // a * t + b >= 0
    let mut lower = Vec::new();
    let mut upper = Vec::new();
    for (k, &pk) in points.iter().enumerate() {
        if k == i || k == j {
            continue;
        }
        let a = 2.0 * (normal.0 * (pi.0 - pk.0) + normal.1 * (pi.1 - pk.1));
        let b = dist2(mid, pk) - dist2(mid, pi);
        if a > 0.0 {
            lower.push((a, b));
        } else if a < 0.0 {
            upper.push((a, b));
        } else if b < 0.0 || (strict && b == 0.0) {
            return false;
        }
    }

    lower.iter().all(|&(a1, b1)| {
        upper.iter().all(|&(a2, b2)| {
            let slack = b2 * a1 - b1 * a2;
            if strict { slack > 0.0 } else { slack >= 0.0 }
        })
    })
}

fn empty_circle_pairs(points: &[(f64, f64)], strict: bool) -> BTreeSet<(usize, usize)> {
    let mut pairs = BTreeSet::new();
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            if has_empty_circle(points, i, j, strict) {
                pairs.insert((i, j));
            }
        }
    }
    pairs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_triangulation_matches_empty_circle_reference(
        cells in prop::collection::btree_set((0..80i32, 0..80i32), 3..13)
    ) {
        // half-cell coordinates, like room centers
        let points: Vec<(f64, f64)> = cells
            .iter()
            .map(|&(x, y)| (x as f64 / 2.0, y as f64 / 2.0))
            .collect();
        let verts: Vec<Vertex> = points
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| Vertex::new(id, Vec2::new(x, y)))
            .collect();
        let edges: BTreeSet<(usize, usize)> = Delaunay::triangulate(verts)
            .into_edges()
            .iter()
            .map(Edge::key)
            .collect();

        // every edge forced by an empty closed circle is present, and no
        // edge has a point strictly inside every circle through it
        let required = empty_circle_pairs(&points, true);
        let allowed = empty_circle_pairs(&points, false);
        let missing: Vec<_> = required.difference(&edges).collect();
        let extra: Vec<_> = edges.difference(&allowed).collect();
        prop_assert!(missing.is_empty(), "missing {:?}", missing);
        prop_assert!(extra.is_empty(), "extra {:?}", extra);
    }

    #[test]
    fn test_mst_is_minimal(points in prop::collection::btree_set((0..30i32, 0..30i32), 2..7)) {
        let verts = vertices(&points);
        let n = verts.len();
        let edges = Delaunay::triangulate(verts.clone()).into_edges();
        let tree = minimum_spanning_tree(&edges, verts[0]);

        prop_assert_eq!(tree.len(), n - 1);
        let mut tracker = ConnectivityTracker::new(n);
        for edge in &tree {
            prop_assert!(tracker.merge(edge.u.id, edge.v.id), "tree has a cycle");
        }
        prop_assert!(tracker.all_connected());

        let best = brute_force_mst_weight(n, &edges).unwrap();
        prop_assert!(total_weight(&tree) <= best + 1e-9);
    }

    #[test]
    fn test_triangulation_connects_every_vertex(
        points in prop::collection::btree_set((0..50i32, 0..50i32), 2..20)
    ) {
        let verts = vertices(&points);
        let n = verts.len();
        let edges = Delaunay::triangulate(verts).into_edges();
        let mut tracker = ConnectivityTracker::new(n);
        for edge in &edges {
            prop_assert_ne!(edge.u.id, edge.v.id);
            tracker.merge(edge.u.id, edge.v.id);
        }
        prop_assert!(tracker.all_connected());
    }

    #[test]
    fn test_path_costs_monotonic(
        costs in prop::collection::vec(1u8..12, 100),
        start in (0..10i32, 0..10i32),
        goal in (0..10i32, 0..10i32),
    ) {
        let mut grid: Grid2D<u8> = Grid2D::new(Size::new(10, 10), Point::default());
        for (p, cost) in grid.points().collect::<Vec<_>>().into_iter().zip(costs) {
            grid.set(p, cost);
        }
        let (start, goal) = (Point::new(start.0, start.1), Point::new(goal.0, goal.1));
        let finder = Pathfinder::new(grid.min(), grid.max());
        let path = finder
            .find_path(start, goal, |_, to| PathCost::new(f64::from(grid.get(to))))
            .unwrap();

        prop_assert_eq!(path.start(), Some(start));
        prop_assert_eq!(path.goal(), Some(goal));
        prop_assert_eq!(path.cells.len(), path.cumulative_costs.len());
        for pair in path.cumulative_costs.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_rooms_valid_and_connected(seed in any::<u64>(), rooms in 1u32..15) {
        let config = GeneratorConfig {
            width: 32,
            height: 24,
            room_count: rooms,
            ..GeneratorConfig::default()
        }
        .with_seed(seed);
        let mut scene = SceneLedger::new();
        let result = generate(&config, &mut scene).unwrap();

        prop_assert!(result.rooms.len() <= rooms as usize);
        for (i, a) in result.rooms.iter().enumerate() {
            prop_assert!(a.fits_within(config.grid_size()));
            for b in &result.rooms[i + 1..] {
                prop_assert!(!a.overlaps(b, ROOM_BUFFER));
            }
        }
        prop_assert!(result.hallways.skipped.is_empty());
        prop_assert!(connected_rooms(&result.grid, &result.rooms).all_connected());
        for hallway in &result.hallways.hallways {
            for cell in &hallway.carved {
                prop_assert_eq!(result.grid.get(*cell), CellType::Hallway);
            }
        }
    }
}
