//! Bounded 2D grid
//!
//! Maps integer coordinates inside a fixed rectangle to cell values. The
//! rectangle may be offset so that it does not start at the origin. Access
//! outside the rectangle is a programming error and panics; use
//! `try_get`/`try_set` when a coordinate may legitimately fall outside.

use core::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Size};

/// Fixed-size grid addressed by `Point`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid2D<T> {
    size: Size,
    /// Added to a coordinate before indexing, so valid coordinates run
    /// from `-offset` to `size - offset - 1`
    offset: Point,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid2D<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(size: Size, offset: Point) -> Self {
        let cells = size.width.max(0) as usize * size.height.max(0) as usize;
        Self {
            size,
            offset,
            data: vec![T::default(); cells],
        }
    }
}

impl<T> Grid2D<T> {
    pub fn size(&self) -> Size {
        self.size
    }

    /// Smallest valid coordinate
    pub fn min(&self) -> Point {
        Point::new(-self.offset.x, -self.offset.y)
    }

    /// Largest valid coordinate
    pub fn max(&self) -> Point {
        Point::new(
            self.size.width - self.offset.x - 1,
            self.size.height - self.offset.y - 1,
        )
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        let x = p.x + self.offset.x;
        let y = p.y + self.offset.y;
        x >= 0 && y >= 0 && x < self.size.width && y < self.size.height
    }

    fn index_of(&self, p: Point) -> Option<usize> {
        if !self.in_bounds(p) {
            return None;
        }
        let x = (p.x + self.offset.x) as usize;
        let y = (p.y + self.offset.y) as usize;
        Some(y * self.size.width as usize + x)
    }

    #[track_caller]
    fn checked_index(&self, p: Point) -> usize {
        match self.index_of(p) {
            Some(idx) => idx,
            None => panic!(
                "grid access at {} outside bounds {}..={}",
                p,
                self.min(),
                self.max()
            ),
        }
    }

    pub fn try_get(&self, p: Point) -> Option<&T> {
        self.index_of(p).map(|idx| &self.data[idx])
    }

    /// Write `value` if `p` is in bounds, returning the previous value
    pub fn try_set(&mut self, p: Point, value: T) -> Option<T> {
        let idx = self.index_of(p)?;
        Some(core::mem::replace(&mut self.data[idx], value))
    }

    /// Write a cell. Panics if `p` is out of bounds.
    #[track_caller]
    pub fn set(&mut self, p: Point, value: T) {
        let idx = self.checked_index(p);
        self.data[idx] = value;
    }

    /// Every valid coordinate, row by row from the minimum corner
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let min = self.min();
        let (w, h) = (self.size.width, self.size.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Point::new(min.x + x, min.y + y)))
    }

    /// Coordinates paired with their values
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.points().zip(self.data.iter())
    }

    /// Number of cells satisfying `pred`
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.data.iter().filter(|v| pred(v)).count()
    }
}

impl<T: Copy> Grid2D<T> {
    /// Read a cell. Panics if `p` is out of bounds.
    #[track_caller]
    pub fn get(&self, p: Point) -> T {
        self.data[self.checked_index(p)]
    }
}

impl<T> Index<Point> for Grid2D<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, p: Point) -> &T {
        &self.data[self.checked_index(p)]
    }
}

impl<T> IndexMut<Point> for Grid2D<T> {
    #[track_caller]
    fn index_mut(&mut self, p: Point) -> &mut T {
        let idx = self.checked_index(p);
        &mut self.data[idx]
    }
}
