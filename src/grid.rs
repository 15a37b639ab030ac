//! Toroidal grid geometry: coordinates, wrapping and von Neumann neighbors.

use serde::{Deserialize, Serialize};

/// A cell coordinate, `x` is the column and `y` the row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Row-major linear index on a `size × size` grid
    #[inline]
    pub fn index(self, size: usize) -> usize {
        self.y * size + self.x
    }

    /// Inverse of [`Point::index`]
    #[inline]
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            x: index % size,
            y: index / size,
        }
    }
}

/// Wrap a coordinate that overflowed by at most one step.
///
/// `-1` maps to `n - 1` and `n` maps to `0`; anything in range is returned as is.
#[inline]
pub fn wrap(i: isize, n: usize) -> usize {
    if i < 0 {
        n - 1
    } else if i as usize >= n {
        0
    } else {
        i as usize
    }
}

/// The four adjacent cells in the order north, east, south, west.
///
/// On a 1×1 grid every neighbor is the cell itself.
#[inline]
pub fn neighbors4(p: Point, n: usize) -> [Point; 4] {
    let x = p.x as isize;
    let y = p.y as isize;
    [
        Point::new(p.x, wrap(y - 1, n)), // North
        Point::new(wrap(x + 1, n), p.y), // East
        Point::new(p.x, wrap(y + 1, n)), // South
        Point::new(wrap(x - 1, n), p.y), // West
    ]
}
