//! Connectivity graph: Prim's minimum spanning tree plus loop edges
//!
//! The tree guarantees every room reachable through the triangulation is
//! connected with minimal total hallway length. Remaining triangulation edges
//! are each kept with a fixed chance to add alternate routes.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::delaunay::{Edge, Vertex};
use crate::rng::DungeonRng;

/// Tracks vertex connectivity using equivalence classes
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    /// Each vertex's equivalence class (vertices in same class are connected)
    classes: Vec<usize>,
}

impl ConnectivityTracker {
    /// Create a new tracker where every vertex is its own class
    pub fn new(num_vertices: usize) -> Self {
        Self {
            classes: (0..num_vertices).collect(),
        }
    }

    /// Check if two vertices are connected (in same equivalence class)
    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        if a >= self.classes.len() || b >= self.classes.len() {
            return false;
        }
        self.classes[a] == self.classes[b]
    }

    /// Merge equivalence classes; returns false if already connected
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        if a >= self.classes.len() || b >= self.classes.len() || self.are_connected(a, b) {
            return false;
        }

        let old_class = self.classes[b];
        let new_class = self.classes[a];
        for class in &mut self.classes {
            if *class == old_class {
                *class = new_class;
            }
        }
        true
    }

    /// Check if all vertices are connected
    pub fn all_connected(&self) -> bool {
        match self.classes.first() {
            Some(&first) => self.classes.iter().all(|&c| c == first),
            None => true,
        }
    }

    /// Number of connected components
    pub fn component_count(&self) -> usize {
        self.classes.iter().collect::<HashSet<_>>().len()
    }
}

/// Frontier entry for Prim's heap
#[derive(Debug, Clone, Copy)]
struct Frontier {
    weight: f64,
    /// Insertion sequence; equal weights pop first-pushed first
    seq: usize,
    edge: usize,
    to: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Sum of edge lengths
pub fn total_weight(edges: &[Edge]) -> f64 {
    edges.iter().map(Edge::length).sum()
}

/// Prim's algorithm over `edges`, weighted by Euclidean length
///
/// Grows from `start`; if `start` is not an endpoint of any edge, the first
/// vertex in edge order is used. When a component is exhausted the search
/// restarts from the next unvisited vertex in edge order, so a disconnected
/// input yields one tree per component.
pub fn minimum_spanning_tree(edges: &[Edge], start: Vertex) -> Vec<Edge> {
    let mut order: Vec<usize> = Vec::new();
    let mut incident: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        for id in [edge.u.id, edge.v.id] {
            incident
                .entry(id)
                .or_insert_with(|| {
                    order.push(id);
                    Vec::new()
                })
                .push(idx);
        }
    }

    let Some(&first) = order.first() else {
        return Vec::new();
    };
    let start = if incident.contains_key(&start.id) {
        start.id
    } else {
        log::debug!("MST start vertex {} has no edges, using {}", start.id, first);
        first
    };

    let mut visited: HashSet<usize> = HashSet::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0;
    let mut tree = Vec::new();

    let mut visit = |id: usize, visited: &mut HashSet<usize>, heap: &mut BinaryHeap<Frontier>| {
        visited.insert(id);
        for &idx in &incident[&id] {
            let edge = &edges[idx];
            let to = if edge.u.id == id { edge.v.id } else { edge.u.id };
            if !visited.contains(&to) {
                heap.push(Frontier {
                    weight: edge.length(),
                    seq,
                    edge: idx,
                    to,
                });
                seq += 1;
            }
        }
    };

    visit(start, &mut visited, &mut heap);
    loop {
        while let Some(next) = heap.pop() {
            if visited.contains(&next.to) {
                continue;
            }
            tree.push(edges[next.edge]);
            visit(next.to, &mut visited, &mut heap);
        }

        match order.iter().find(|id| !visited.contains(*id)) {
            Some(&restart) => visit(restart, &mut visited, &mut heap),
            None => break,
        }
    }

    tree
}

/// Keep each edge of `edges` that is not in `tree` with probability `chance`
///
/// Draws exactly one random number per non-tree edge, in edge order.
pub fn select_loop_edges(
    edges: &[Edge],
    tree: &[Edge],
    chance: f64,
    rng: &mut DungeonRng,
) -> Vec<Edge> {
    let in_tree: HashSet<Edge> = tree.iter().copied().collect();
    let mut seen = HashSet::new();
    edges
        .iter()
        .filter(|edge| !in_tree.contains(*edge) && seen.insert(**edge))
        .filter(|_| rng.chance(chance))
        .copied()
        .collect()
}

/// The edges hallways are carved along
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectivityGraph {
    /// Minimum spanning tree (or forest)
    pub tree: Vec<Edge>,
    /// Non-tree edges kept to form loops
    pub loops: Vec<Edge>,
}

impl ConnectivityGraph {
    /// Build the tree from `edges` starting at the first edge's `u`, then
    /// select loop edges
    pub fn build(edges: &[Edge], loop_chance: f64, rng: &mut DungeonRng) -> Self {
        let Some(first) = edges.first() else {
            return Self::default();
        };
        let tree = minimum_spanning_tree(edges, first.u);
        let loops = select_loop_edges(edges, &tree, loop_chance, rng);
        Self { tree, loops }
    }

    /// Tree edges followed by loop edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.tree.iter().chain(self.loops.iter())
    }

    pub fn len(&self) -> usize {
        self.tree.len() + self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty() && self.loops.is_empty()
    }
}
