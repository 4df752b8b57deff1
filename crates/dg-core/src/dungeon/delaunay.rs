//! Delaunay triangulation of room centers
//!
//! The triangulation's edges are the candidate room-to-room connections.
//! Points are swept in lexicographic order; each one lies outside the hull
//! built so far and is fanned onto the hull edges it can see. Lawson edge
//! flips then make every interior edge locally Delaunay, which makes the
//! whole triangulation Delaunay, hull edges included.
//!
//! Degenerate inputs never fail:
//! - 0 or 1 vertex: no triangles, no edges
//! - 2 vertices or all vertices collinear: no triangles, and the edges are
//!   the chain of consecutive vertices along the line
//! - vertices sharing a position are triangulated once; each copy left
//!   without an edge is joined to its closest vertex

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::graph::ConnectivityTracker;
use crate::geom::Vec2;

/// Relative tolerance for `Triangle` circumcircle queries
const EPSILON: f64 = 1e-9;

/// Graph vertex: a room center tagged with the owning room's index
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    /// Index of the room this vertex stands for
    pub id: usize,
    pub position: Vec2,
}

impl Vertex {
    pub const fn new(id: usize, position: Vec2) -> Self {
        Self { id, position }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Undirected edge; `u-v` equals `v-u`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub u: Vertex,
    pub v: Vertex,
}

impl Edge {
    pub const fn new(u: Vertex, v: Vertex) -> Self {
        Self { u, v }
    }

    /// Euclidean length between the endpoints
    pub fn length(&self) -> f64 {
        self.u.position.distance(self.v.position)
    }

    /// Endpoint ids, smaller first
    pub fn key(&self) -> (usize, usize) {
        if self.u.id <= self.v.id {
            (self.u.id, self.v.id)
        } else {
            (self.v.id, self.u.id)
        }
    }

    pub fn touches(&self, id: usize) -> bool {
        self.u.id == id || self.v.id == id
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Triangle over input vertices
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
}

impl Triangle {
    /// Circumcenter and squared radius, or `None` for a degenerate triangle
    pub fn circumcircle(&self) -> Option<(Vec2, f64)> {
        circumcircle(self.a.position, self.b.position, self.c.position)
    }

    /// Is `p` strictly inside the circumcircle
    pub fn circumcircle_contains(&self, p: Vec2) -> bool {
        self.circumcircle()
            .is_some_and(|(center, r2)| strictly_inside(center, r2, p))
    }
}

/// Result of triangulating a vertex set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delaunay {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    edges: Vec<Edge>,
}

fn circumcircle(a: Vec2, b: Vec2, c: Vec2) -> Option<(Vec2, f64)> {
    let d = 2.0 * orient(a, b, c);
    let scale = (b.x - a.x).abs() + (b.y - a.y).abs() + (c.x - a.x).abs() + (c.y - a.y).abs();
    if d.abs() <= EPSILON * scale.max(1.0) * scale.max(1.0) {
        return None;
    }

    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let center = Vec2::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    Some((center, center.distance_squared(a)))
}

fn strictly_inside(center: Vec2, radius_sq: f64, p: Vec2) -> bool {
    center.distance_squared(p) < radius_sq - EPSILON * radius_sq.max(1.0)
}

/// Twice the signed area of `abc`; positive when counter-clockwise
fn orient(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Positive when `d` lies strictly inside the circle through the
/// counter-clockwise triangle `abc`, zero when the four are cocircular
fn in_circle(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> f64 {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);
    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;
    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

/// Counter-clockwise triangles over point indices, with a directed-edge
/// index: edge `(a, b)` maps to the triangle that walks `a -> b`
#[derive(Debug, Default)]
struct Mesh {
    triangles: Vec<[usize; 3]>,
    halfedges: HashMap<(usize, usize), usize>,
}

impl Mesh {
    fn directed([a, b, c]: [usize; 3]) -> [(usize, usize); 3] {
        [(a, b), (b, c), (c, a)]
    }

    fn push(&mut self, tri: [usize; 3]) {
        let idx = self.triangles.len();
        self.triangles.push(tri);
        for edge in Self::directed(tri) {
            self.halfedges.insert(edge, idx);
        }
    }

    fn replace(&mut self, idx: usize, tri: [usize; 3]) {
        for edge in Self::directed(self.triangles[idx]) {
            if self.halfedges.get(&edge) == Some(&idx) {
                self.halfedges.remove(&edge);
            }
        }
        self.triangles[idx] = tri;
        for edge in Self::directed(tri) {
            self.halfedges.insert(edge, idx);
        }
    }

    /// Corner of triangle `idx` that is not on edge `a-b`
    fn apex(&self, idx: usize, a: usize, b: usize) -> Option<usize> {
        self.triangles[idx]
            .into_iter()
            .find(|&corner| corner != a && corner != b)
    }

    /// Edges shared by two triangles, each listed once
    fn interior_edges(&self) -> Vec<(usize, usize)> {
        self.triangles
            .iter()
            .flat_map(|&tri| Self::directed(tri))
            .filter(|&(a, b)| a < b && self.halfedges.contains_key(&(b, a)))
            .collect()
    }
}

/// Sweep the points in lexicographic order, fanning each new point onto the
/// hull edges it sees. Returns `None` when the distinct points are collinear.
fn sweep_hull(points: &[Vec2]) -> Option<Mesh> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&i, &j| {
        points[i]
            .x
            .total_cmp(&points[j].x)
            .then(points[i].y.total_cmp(&points[j].y))
            .then(i.cmp(&j))
    });
    order.dedup_by(|later, earlier| points[*later] == points[*earlier]);
    if order.len() < 3 {
        return None;
    }

    let (p0, p1) = (points[order[0]], points[order[1]]);
    let k = (2..order.len()).find(|&k| orient(p0, p1, points[order[k]]) != 0.0)?;
    let apex = order[k];
    let line = &order[..k];

    let mut mesh = Mesh::default();
    let left = orient(p0, p1, points[apex]) > 0.0;
    for pair in line.windows(2) {
        if left {
            mesh.push([pair[0], pair[1], apex]);
        } else {
            mesh.push([pair[1], pair[0], apex]);
        }
    }
    let mut hull: Vec<usize> = if left {
        line.iter().copied().chain([apex]).collect()
    } else {
        line.iter().rev().copied().chain([apex]).collect()
    };

    for &idx in &order[k + 1..] {
        let p = points[idx];
        let m = hull.len();
        let visible: Vec<bool> = (0..m)
            .map(|i| orient(points[hull[i]], points[hull[(i + 1) % m]], p) < 0.0)
            .collect();
        let Some(first) = (0..m).find(|&i| visible[i] && !visible[(i + m - 1) % m]) else {
            log::debug!("point {} sees no hull edge, leaving it out", idx);
            continue;
        };

        let mut rotated = hull[first..].to_vec();
        rotated.extend_from_slice(&hull[..first]);
        let seen = (0..m).take_while(|&i| visible[(first + i) % m]).count();
        for i in 0..seen {
            mesh.push([rotated[(i + 1) % m], rotated[i], idx]);
        }

        hull = [rotated[0], idx]
            .into_iter()
            .chain(rotated[seen..].iter().copied())
            .collect();
    }

    Some(mesh)
}

/// Flip edges until every interior edge is locally Delaunay
fn legalize(mesh: &mut Mesh, points: &[Vec2]) {
    let mut pending = mesh.interior_edges();
    let mut budget = 16 * points.len() * points.len() + 64;

    while let Some((a, b)) = pending.pop() {
        let (Some(&t), Some(&u)) = (mesh.halfedges.get(&(a, b)), mesh.halfedges.get(&(b, a)))
        else {
            continue;
        };
        let (Some(p), Some(q)) = (mesh.apex(t, a, b), mesh.apex(u, b, a)) else {
            continue;
        };
        let (pa, pb, pp, pq) = (points[a], points[b], points[p], points[q]);
        if in_circle(pa, pb, pp, pq) <= 0.0 {
            continue;
        }
        if orient(pa, pq, pp) <= 0.0 || orient(pq, pb, pp) <= 0.0 {
            continue;
        }
        if budget == 0 {
            log::warn!("triangulation flip budget exhausted, result may not be Delaunay");
            return;
        }
        budget -= 1;

        mesh.replace(t, [a, q, p]);
        mesh.replace(u, [q, b, p]);
        pending.extend([(a, q), (q, b), (b, p), (p, a)]);
    }
}

impl Delaunay {
    /// Triangulate the given vertices
    pub fn triangulate(vertices: Vec<Vertex>) -> Self {
        let mut result = Self {
            vertices,
            triangles: Vec::new(),
            edges: Vec::new(),
        };

        if result.vertices.len() < 2 {
            return result;
        }

        let points: Vec<Vec2> = result.vertices.iter().map(|v| v.position).collect();
        if let Some(mut mesh) = sweep_hull(&points) {
            legalize(&mut mesh, &points);
            result.triangles = mesh
                .triangles
                .iter()
                .map(|&[a, b, c]| Triangle {
                    a: result.vertices[a],
                    b: result.vertices[b],
                    c: result.vertices[c],
                })
                .collect();
            result.collect_triangle_edges();
        } else {
            result.chain_along_line();
        }

        result.join_components();
        result
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Deduplicated edges in first-seen order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    fn push_edge(&mut self, seen: &mut HashSet<(usize, usize)>, edge: Edge) {
        if edge.u.id != edge.v.id && seen.insert(edge.key()) {
            self.edges.push(edge);
        }
    }

    fn collect_triangle_edges(&mut self) {
        let mut seen = HashSet::new();
        let triangles = self.triangles.clone();
        for t in &triangles {
            self.push_edge(&mut seen, Edge::new(t.a, t.b));
            self.push_edge(&mut seen, Edge::new(t.b, t.c));
            self.push_edge(&mut seen, Edge::new(t.c, t.a));
        }
    }

    fn chain_along_line(&mut self) {
        let mut sorted = self.vertices.clone();
        sorted.sort_by(|p, q| {
            p.position
                .x
                .total_cmp(&q.position.x)
                .then(p.position.y.total_cmp(&q.position.y))
                .then(p.id.cmp(&q.id))
        });

        let mut seen: HashSet<(usize, usize)> = self.edges.iter().map(Edge::key).collect();
        for pair in sorted.windows(2) {
            self.push_edge(&mut seen, Edge::new(pair[0], pair[1]));
        }
    }

    /// Link every component to the one holding the first vertex through its
    /// closest vertex pair
    fn join_components(&mut self) {
        let index: HashMap<usize, usize> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| (v.id, idx))
            .collect();
        let mut tracker = ConnectivityTracker::new(self.vertices.len());
        for edge in &self.edges {
            if let (Some(&a), Some(&b)) = (index.get(&edge.u.id), index.get(&edge.v.id)) {
                tracker.merge(a, b);
            }
        }

        let mut seen: HashSet<(usize, usize)> = self.edges.iter().map(Edge::key).collect();
        while !tracker.all_connected() {
            let mut closest: Option<(f64, usize, usize)> = None;
            for (a, u) in self.vertices.iter().enumerate() {
                if !tracker.are_connected(0, a) {
                    continue;
                }
                for (b, v) in self.vertices.iter().enumerate() {
                    if tracker.are_connected(0, b) {
                        continue;
                    }
                    let d = u.position.distance_squared(v.position);
                    if closest.is_none_or(|(best, _, _)| d < best) {
                        closest = Some((d, a, b));
                    }
                }
            }
            let Some((_, a, b)) = closest else {
                break;
            };
            let (u, v) = (self.vertices[a], self.vertices[b]);
            log::debug!("joining disconnected vertex {} to vertex {}", v.id, u.id);
            self.push_edge(&mut seen, Edge::new(u, v));
            tracker.merge(a, b);
        }
    }
}
