//! Steppers that compute generation N+1 from generation N.
//!
//! Both read the current [`World`](crate::World) only and write a fresh next buffer:
//! predators move first, then prey. [`step_sequential`] is single-threaded and serves as
//! the reference; [`step_parallel`] splits the rows among worker threads.

pub mod parallel;
pub mod sequential;

pub use parallel::{derive_worker_seed, split_rows, step_parallel};
pub use sequential::step_sequential;

use crate::grid::Point;
use rand::Rng;

/// Up to four movement targets collected from a cell's neighborhood
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidates {
    points: [Point; 4],
    len: usize,
}

impl Candidates {
    pub(crate) fn new() -> Self {
        Self {
            points: [Point::new(0, 0); 4],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, p: Point) {
        if self.len < self.points.len() {
            self.points[self.len] = p;
            self.len += 1;
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Uniform pick; draws from `rng` only when there is something to pick
    #[inline]
    pub(crate) fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point> {
        match self.len() {
            0 => None,
            len => Some(self.points[rng.gen_range(0..len)]),
        }
    }
}

impl FromIterator<Point> for Candidates {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut candidates = Candidates::new();
        for p in iter {
            candidates.push(p);
        }
        candidates
    }
}
