//! The Wa-Tor world: a square toroidal grid where each cell holds at most one agent.

use crate::cell::{Cell, CellKind, PredatorState, PreyState};
use crate::config::Rules;
use crate::error::WatorError;
use crate::grid::Point;
use crate::stats::Census;
use rand::seq::SliceRandom;
use rand::Rng;

/// The simulation world, addressed `grid[y][x]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    size: usize,
    grid: Vec<Vec<Cell>>,
}

impl World {
    /// Create an empty `size × size` world
    pub fn create(size: usize) -> Result<Self, WatorError> {
        if size == 0 {
            return Err(WatorError::invalid("size must be > 0"));
        }
        Ok(Self::empty(size))
    }

    /// Build a world from explicit rows; they must form a non-empty square
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, WatorError> {
        let size = rows.len();
        if size == 0 {
            return Err(WatorError::invalid("size must be > 0"));
        }
        if let Some(y) = rows.iter().position(|row| row.len() != size) {
            return Err(WatorError::invalid(format!(
                "row {} has {} cells, expected {}",
                y,
                rows[y].len(),
                size
            )));
        }
        Ok(Self { size, grid: rows })
    }

    /// Caller guarantees `size > 0`
    pub(crate) fn empty(size: usize) -> Self {
        Self {
            size,
            grid: vec![vec![Cell::Empty; size]; size],
        }
    }

    /// Adopt a buffer produced by a stepper
    pub(crate) fn from_grid(size: usize, grid: Vec<Vec<Cell>>) -> Self {
        debug_assert_eq!(grid.len(), size);
        Self { size, grid }
    }

    /// Randomly place prey and predators on distinct cells.
    ///
    /// All coordinates are shuffled; the first `prey` become fresh prey and the next
    /// `predators` fresh predators. Placement stops silently once the grid is full, so
    /// callers should run [`crate::config::check_capacity`] first. Returns what was
    /// actually placed.
    pub fn seed<R: Rng + ?Sized>(
        &mut self,
        prey: usize,
        predators: usize,
        rules: &Rules,
        rng: &mut R,
    ) -> Census {
        let total = self.size * self.size;
        let mut order: Vec<usize> = (0..total).collect();
        order.shuffle(rng);

        let placed_prey = prey.min(total);
        let placed_predators = predators.min(total - placed_prey);
        if placed_prey + placed_predators < prey + predators {
            log::warn!(
                "Seeding truncated at grid capacity {}: requested prey={} predators={}",
                total,
                prey,
                predators
            );
        }

        let (prey_slots, rest) = order.split_at(placed_prey);
        for &i in prey_slots {
            let p = Point::from_index(i, self.size);
            self.grid[p.y][p.x] = Cell::Prey(PreyState::default());
        }
        for &i in &rest[..placed_predators] {
            let p = Point::from_index(i, self.size);
            self.grid[p.y][p.x] = Cell::Predator(PredatorState::newborn(rules));
        }

        Census {
            prey: placed_prey,
            predators: placed_predators,
        }
    }

    /// Count prey and predators with a single scan
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for cell in self.grid.iter().flatten() {
            match cell {
                Cell::Prey(_) => census.prey += 1,
                Cell::Predator(_) => census.predators += 1,
                Cell::Empty => {}
            }
        }
        census
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `p`; panics if `p` is off the grid
    #[inline]
    pub fn get(&self, p: Point) -> &Cell {
        &self.grid[p.y][p.x]
    }

    #[inline]
    pub fn kind_at(&self, p: Point) -> CellKind {
        self.get(p).kind()
    }

    /// Overwrite the cell at `p`
    #[inline]
    pub fn set(&mut self, p: Point, cell: Cell) {
        self.grid[p.y][p.x] = cell;
    }

    /// Rows in order, for renderers that draw line by line
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    /// Every cell with its coordinate, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Point, &Cell)> + '_ {
        self.grid.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, cell)| (Point::new(x, y), cell))
        })
    }

    /// ASCII picture of the top-left `max × max` corner
    pub fn render(&self, max: usize) -> String {
        let n = self.size.min(max);
        let mut out = String::with_capacity(n * (n + 1));
        for row in self.grid.iter().take(n) {
            out.extend(row.iter().take(n).map(Cell::glyph));
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(self.size))
    }
}
