//! Multi-threaded stepper using spatial decomposition.
//!
//! The rows are split into contiguous ranges, one worker per range. Workers read the
//! shared current world and write into one next-generation buffer whose rows are each
//! behind their own mutex. Every emptiness probe and every write to `next` holds the
//! row lock for the whole check-and-write, so two workers can never both claim a cell.
//!
//! A step runs in two rounds on a pool built for this call: all workers move their
//! predators, then all workers move their prey.

use super::Candidates;
use crate::cell::{Cell, PredatorState, PreyState};
use crate::config::Rules;
use crate::error::WatorError;
use crate::grid::{neighbors4, Point};
use crate::world::World;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Odd 64-bit constant spreading worker seeds apart
const WORKER_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for worker `index` of the step seeded with `step_seed`
pub fn derive_worker_seed(step_seed: u64, index: usize) -> u64 {
    step_seed.wrapping_add((index as u64 + 1).wrapping_mul(WORKER_SEED_STRIDE))
}

/// Split `rows` into `min(workers, rows)` contiguous ranges.
///
/// Heights differ by at most one; the first `rows % workers` ranges are the taller ones.
pub fn split_rows(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, rows.max(1));
    let base = rows / workers;
    let mut rem = rows % workers;

    let mut segments = Vec::with_capacity(workers);
    let mut y = 0;
    for _ in 0..workers {
        let mut h = base;
        if rem > 0 {
            h += 1;
            rem -= 1;
        }
        segments.push(y..y + h);
        y += h;
    }
    segments
}

/// Next-generation buffer with one lock per row
struct LockedRows {
    rows: Vec<Mutex<Vec<Cell>>>,
}

impl LockedRows {
    fn new(size: usize) -> Self {
        Self {
            rows: (0..size).map(|_| Mutex::new(vec![Cell::Empty; size])).collect(),
        }
    }

    // Cells are plain data, so a poisoned row is still consistent
    #[inline]
    fn row(&self, y: usize) -> MutexGuard<'_, Vec<Cell>> {
        self.rows[y].lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn is_vacant(&self, p: Point) -> bool {
        self.row(p.y)[p.x].is_empty()
    }

    #[inline]
    fn holds_predator(&self, p: Point) -> bool {
        self.row(p.y)[p.x].is_predator()
    }

    /// Write `cell` at `p` if it is still empty; false if another agent got there first
    #[inline]
    fn claim(&self, p: Point, cell: Cell) -> bool {
        let mut row = self.row(p.y);
        if row[p.x].is_empty() {
            row[p.x] = cell;
            true
        } else {
            false
        }
    }

    fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
            .into_iter()
            .map(|row| row.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect()
    }
}

/// One worker: a row range, its shuffled visiting order and its own RNG
struct Worker {
    index: usize,
    order: Vec<Point>,
    rng: ChaCha8Rng,
}

impl Worker {
    fn new(index: usize, rows: Range<usize>, size: usize, step_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_worker_seed(step_seed, index));
        let mut order: Vec<Point> = rows
            .flat_map(|y| (0..size).map(move |x| Point::new(x, y)))
            .collect();
        order.shuffle(&mut rng);
        Self { index, order, rng }
    }

    fn run_predators(&mut self, cur: &World, next: &LockedRows, rules: &Rules) {
        log::trace!("worker {} predators over {} cells", self.index, self.order.len());
        let order = std::mem::take(&mut self.order);
        for &origin in &order {
            if let Cell::Predator(state) = *cur.get(origin) {
                self.step_predator(cur, next, origin, state, rules);
            }
        }
        self.order = order;
    }

    fn run_prey(&mut self, cur: &World, next: &LockedRows, rules: &Rules) {
        log::trace!("worker {} prey over {} cells", self.index, self.order.len());
        let order = std::mem::take(&mut self.order);
        for &origin in &order {
            if let Cell::Prey(state) = *cur.get(origin) {
                self.step_prey(cur, next, origin, state, rules);
            }
        }
        self.order = order;
    }

    fn step_predator(
        &mut self,
        cur: &World,
        next: &LockedRows,
        origin: Point,
        mut shark: PredatorState,
        rules: &Rules,
    ) {
        shark.energy = shark.energy.saturating_sub(rules.energy_loss());
        if shark.energy <= 0 {
            return; // starved
        }
        shark.breed_timer += 1;

        let neighbors = neighbors4(origin, cur.size());
        let prey: Candidates = neighbors
            .into_iter()
            .filter(|&p| cur.get(p).is_prey() && next.is_vacant(p))
            .collect();

        let (dest, fed) = match prey.choose(&mut self.rng) {
            Some(dst) => (Some(dst), true),
            None => {
                let empties: Candidates = neighbors
                    .into_iter()
                    .filter(|&p| cur.get(p).is_empty() && next.is_vacant(p))
                    .collect();
                (empties.choose(&mut self.rng), false)
            }
        };

        let Some(dst) = dest else {
            // No breeding without a move
            next.claim(origin, Cell::Predator(shark));
            return;
        };

        let breeding = shark.breed_timer >= rules.predator_breed_threshold;
        let mut mover = shark;
        if fed {
            mover.energy = mover.energy.saturating_add(rules.energy_gain());
        }
        if breeding {
            mover.breed_timer = 0;
        }

        if next.claim(dst, Cell::Predator(mover)) {
            if breeding {
                next.claim(origin, Cell::newborn_predator(rules));
            }
        } else {
            // Lost the race: hold the origin as if nothing happened
            next.claim(origin, Cell::Predator(shark));
        }
    }

    fn step_prey(
        &mut self,
        cur: &World,
        next: &LockedRows,
        origin: Point,
        mut fish: PreyState,
        rules: &Rules,
    ) {
        // Predators finished in the previous round, so this is stable
        if next.holds_predator(origin) {
            return; // eaten
        }
        fish.breed_timer += 1;

        let dest = neighbors4(origin, cur.size())
            .into_iter()
            .filter(|&p| cur.get(p).is_empty() && next.is_vacant(p))
            .collect::<Candidates>()
            .choose(&mut self.rng);

        let breeding = fish.breed_timer >= rules.prey_breed_threshold;
        match dest {
            Some(dst) => {
                let mover = if breeding { PreyState::default() } else { fish };
                if next.claim(dst, Cell::Prey(mover)) {
                    if breeding {
                        next.claim(origin, Cell::newborn_prey());
                    }
                } else {
                    next.claim(origin, Cell::Prey(fish));
                }
            }
            None => {
                let stay = if breeding {
                    Cell::newborn_prey()
                } else {
                    Cell::Prey(fish)
                };
                next.claim(origin, stay);
            }
        }
    }
}

/// Compute the next generation with `workers` threads.
///
/// Uses `min(workers, size)` workers, each seeded from `step_seed` and its index, and
/// blocks until the whole next generation is written. With one worker, or when no two
/// workers compete for a cell, the same inputs give the same output.
pub fn step_parallel(
    world: &World,
    rules: &Rules,
    workers: usize,
    step_seed: u64,
) -> Result<World, WatorError> {
    if workers == 0 {
        return Err(WatorError::invalid("workers must be >= 1"));
    }

    let n = world.size();
    let segments = split_rows(n, workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(segments.len())
        .thread_name(|i| format!("wator-worker-{}", i))
        .build()?;

    let mut crew: Vec<Worker> = segments
        .into_iter()
        .enumerate()
        .map(|(i, rows)| Worker::new(i, rows, n, step_seed))
        .collect();
    let next = LockedRows::new(n);

    {
        let next = &next;
        pool.scope(|s| {
            for worker in crew.iter_mut() {
                s.spawn(move |_| worker.run_predators(world, next, rules));
            }
        });
        pool.scope(|s| {
            for worker in crew.iter_mut() {
                s.spawn(move |_| worker.run_prey(world, next, rules));
            }
        });
    }

    Ok(World::from_grid(n, next.into_rows()))
}
