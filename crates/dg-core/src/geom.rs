//! Integer grid coordinates, extents and real-valued positions

use core::fmt;
use core::ops::Sub;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Integer grid coordinate
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor one step towards `side` (TOP is +y)
    pub fn step(self, side: Sides) -> Point {
        let (dx, dy) = side.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    /// The four cardinal neighbors in TOP, BOTTOM, LEFT, RIGHT order
    pub fn cardinal_neighbors(self) -> [Point; 4] {
        [
            self.step(Sides::TOP),
            self.step(Sides::BOTTOM),
            self.step(Sides::LEFT),
            self.step(Sides::RIGHT),
        ]
    }

    /// Center of this cell in world space
    pub fn cell_center(self) -> Vec2 {
        Vec2::new(self.x as f64 + 0.5, self.y as f64 + 0.5)
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f64, self.y as f64)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.as_vec2().distance(other.as_vec2())
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Integer 2D extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Real-valued 2D position (world space, one unit per cell)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Cell containing this position (truncates toward zero like an int cast)
    pub fn to_cell(self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

bitflags! {
    /// Sides of a cell. Used for wall placement and neighbor masks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sides: u8 {
        const TOP = 0x01;
        const BOTTOM = 0x02;
        const LEFT = 0x04;
        const RIGHT = 0x08;
    }
}

impl Sides {
    /// Single sides in the order walls are emitted
    pub const EACH: [Sides; 4] = [Sides::TOP, Sides::RIGHT, Sides::BOTTOM, Sides::LEFT];

    /// Grid offset of a single side
    pub fn delta(self) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if self.contains(Sides::TOP) {
            dy += 1;
        }
        if self.contains(Sides::BOTTOM) {
            dy -= 1;
        }
        if self.contains(Sides::LEFT) {
            dx -= 1;
        }
        if self.contains(Sides::RIGHT) {
            dx += 1;
        }
        (dx, dy)
    }

    /// Quarter turns that face a wall sprite towards this side
    pub fn quarter_turns(self) -> u8 {
        Sides::EACH
            .iter()
            .position(|side| *side == self)
            .map_or(0, |turns| turns as u8)
    }

    /// World position of the wall segment on this side of `cell`
    pub fn wall_position(self, cell: Point) -> Vec2 {
        let (dx, dy) = self.delta();
        let center = cell.cell_center();
        Vec2::new(center.x + dx as f64 * 0.5, center.y + dy as f64 * 0.5)
    }
}

// Manual serde impl for Sides
impl Serialize for Sides {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Sides {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Sides::from_bits_truncate(bits))
    }
}
