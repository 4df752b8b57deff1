//! Rooms
//!
//! A room is an immutable axis-aligned rectangle of grid cells. Bounds are
//! half-open: a room at (x, y) of size (w, h) covers x..x+w and y..y+h.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Size, Vec2};
use crate::rng::DungeonRng;

/// Rectangle of room cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Lower-left cell
    pub position: Point,
    /// Extent in cells
    pub size: Size,
}

impl Room {
    pub const fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    pub fn x_min(&self) -> i32 {
        self.position.x
    }

    /// Exclusive right edge
    pub fn x_max(&self) -> i32 {
        self.position.x + self.size.width
    }

    pub fn y_min(&self) -> i32 {
        self.position.y
    }

    /// Exclusive top edge
    pub fn y_max(&self) -> i32 {
        self.position.y + self.size.height
    }

    /// Real-valued center of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x as f64 + self.size.width as f64 / 2.0,
            self.position.y as f64 + self.size.height as f64 / 2.0,
        )
    }

    /// Cell containing the center; start/goal of hallway searches
    pub fn center_cell(&self) -> Point {
        self.center().to_cell()
    }

    /// Copy grown by `margin` cells on every side
    pub fn expanded(&self, margin: i32) -> Room {
        Room::new(
            Point::new(self.position.x - margin, self.position.y - margin),
            Size::new(self.size.width + 2 * margin, self.size.height + 2 * margin),
        )
    }

    /// Do the two rectangles share at least one cell
    pub fn intersects(&self, other: &Room) -> bool {
        !(self.x_min() >= other.x_max()
            || self.x_max() <= other.x_min()
            || self.y_min() >= other.y_max()
            || self.y_max() <= other.y_min())
    }

    /// Does `other` come within `buffer` cells of this room
    pub fn overlaps(&self, other: &Room, buffer: i32) -> bool {
        self.expanded(buffer).intersects(other)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min() && p.x < self.x_max() && p.y >= self.y_min() && p.y < self.y_max()
    }

    /// Lies inside a `width` x `height` grid without touching its far edges
    pub fn fits_within(&self, extent: Size) -> bool {
        self.x_min() >= 0
            && self.y_min() >= 0
            && self.x_max() < extent.width
            && self.y_max() < extent.height
    }

    /// Every cell of the room, row by row
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (self.y_min()..self.y_max())
            .flat_map(move |y| (self.x_min()..self.x_max()).map(move |x| Point::new(x, y)))
    }

    /// Uniformly random cell inside the room
    pub fn random_cell(&self, rng: &mut DungeonRng) -> Point {
        Point::new(
            self.position.x + rng.rn2(self.size.width as u32) as i32,
            self.position.y + rng.rn2(self.size.height as u32) as i32,
        )
    }

    pub fn area(&self) -> i64 {
        self.size.area()
    }

    /// Row of cells along the top wall
    pub fn top_row(&self) -> i32 {
        self.y_max() - 1
    }
}
