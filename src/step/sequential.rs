//! Single-threaded stepper: one row-major pass over predators, then one over prey.

use super::Candidates;
use crate::cell::{Cell, PredatorState, PreyState};
use crate::config::Rules;
use crate::grid::{neighbors4, Point};
use crate::world::World;
use rand::Rng;

/// Next-generation buffer owned by the sequential pass
struct NextGen {
    rows: Vec<Vec<Cell>>,
}

impl NextGen {
    fn new(size: usize) -> Self {
        Self {
            rows: vec![vec![Cell::Empty; size]; size],
        }
    }

    #[inline]
    fn get(&self, p: Point) -> &Cell {
        &self.rows[p.y][p.x]
    }

    #[inline]
    fn is_vacant(&self, p: Point) -> bool {
        self.get(p).is_empty()
    }

    /// Write `cell` at `p` only if nothing has claimed it yet
    #[inline]
    fn claim(&mut self, p: Point, cell: Cell) -> bool {
        let slot = &mut self.rows[p.y][p.x];
        if slot.is_empty() {
            *slot = cell;
            true
        } else {
            false
        }
    }

    #[inline]
    fn put(&mut self, p: Point, cell: Cell) {
        self.rows[p.y][p.x] = cell;
    }
}

/// Compute the next generation on the calling thread.
///
/// Predators act first in row-major order, then prey. The returned world replaces
/// `world`; `world` itself is left untouched.
pub fn step_sequential<R: Rng + ?Sized>(world: &World, rules: &Rules, rng: &mut R) -> World {
    let n = world.size();
    let mut next = NextGen::new(n);

    for y in 0..n {
        for x in 0..n {
            let origin = Point::new(x, y);
            if let Cell::Predator(state) = *world.get(origin) {
                step_predator(world, &mut next, origin, state, rules, rng);
            }
        }
    }

    for y in 0..n {
        for x in 0..n {
            let origin = Point::new(x, y);
            if let Cell::Prey(state) = *world.get(origin) {
                step_prey(world, &mut next, origin, state, rules, rng);
            }
        }
    }

    World::from_grid(n, next.rows)
}

fn step_predator<R: Rng + ?Sized>(
    cur: &World,
    next: &mut NextGen,
    origin: Point,
    mut shark: PredatorState,
    rules: &Rules,
    rng: &mut R,
) {
    shark.energy = shark.energy.saturating_sub(rules.energy_loss());
    if shark.energy <= 0 {
        return; // starved
    }
    shark.breed_timer += 1;

    let neighbors = neighbors4(origin, cur.size());

    // A prey whose slot is already taken was eaten earlier this chronon
    let prey: Candidates = neighbors
        .into_iter()
        .filter(|&p| cur.get(p).is_prey() && next.is_vacant(p))
        .collect();

    let dest = match prey.choose(rng) {
        Some(dst) => {
            shark.energy = shark.energy.saturating_add(rules.energy_gain());
            Some(dst)
        }
        None => neighbors
            .into_iter()
            .filter(|&p| cur.get(p).is_empty() && next.is_vacant(p))
            .collect::<Candidates>()
            .choose(rng),
    };

    let breeding = shark.breed_timer >= rules.predator_breed_threshold;
    match dest {
        Some(dst) => {
            if breeding {
                next.claim(origin, Cell::newborn_predator(rules));
                shark.breed_timer = 0;
            }
            next.put(dst, Cell::Predator(shark));
        }
        // Stuck at threshold: the origin gets the newborn and there is no room left
        None if breeding => {
            next.claim(origin, Cell::newborn_predator(rules));
        }
        None => {
            next.claim(origin, Cell::Predator(shark));
        }
    }
}

fn step_prey<R: Rng + ?Sized>(
    cur: &World,
    next: &mut NextGen,
    origin: Point,
    mut fish: PreyState,
    rules: &Rules,
    rng: &mut R,
) {
    if next.get(origin).is_predator() {
        return; // eaten
    }
    fish.breed_timer += 1;

    let dest = neighbors4(origin, cur.size())
        .into_iter()
        .filter(|&p| cur.get(p).is_empty() && next.is_vacant(p))
        .collect::<Candidates>()
        .choose(rng);

    let breeding = fish.breed_timer >= rules.prey_breed_threshold;
    match dest {
        Some(dst) => {
            if breeding {
                next.claim(origin, Cell::newborn_prey());
                fish.breed_timer = 0;
            }
            // First claim wins
            next.claim(dst, Cell::Prey(fish));
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
