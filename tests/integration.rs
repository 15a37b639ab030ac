//! Integration tests for the Wa-Tor steppers

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wator::{
    step_parallel, step_sequential, Cell, Census, Config, Point, PredatorState, PreyState, Rules,
    Simulation, StepMode, World,
};

fn shark(breed_timer: u32, energy: i32) -> Cell {
    Cell::Predator(PredatorState {
        breed_timer,
        energy,
    })
}

fn fish(breed_timer: u32) -> Cell {
    Cell::Prey(PreyState { breed_timer })
}

fn seeded_world(size: usize, prey: usize, predators: usize, seed: u64) -> World {
    let mut world = World::create(size).unwrap();
    world.seed(prey, predators, &Rules::default(), &mut ChaCha8Rng::seed_from_u64(seed));
    world
}

/// Every predator in `world` is alive and every cell agrees with the census
fn assert_consistent(world: &World) {
    let mut census = Census::default();
    for (_, cell) in world.cells() {
        match cell {
            Cell::Predator(s) => {
                assert!(s.energy > 0, "dead predator written to grid: {:?}", s);
                census.predators += 1;
            }
            Cell::Prey(_) => census.prey += 1,
            Cell::Empty => {}
        }
    }
    assert_eq!(world.census(), census);
    assert_eq!(world.rows().len(), world.size());
    assert!(world.rows().iter().all(|r| r.len() == world.size()));
}

/// Each agent leaves at most one offspring per chronon
fn assert_bounded(before: Census, after: Census) {
    assert!(after.predators <= 2 * before.predators);
    assert!(after.prey <= 2 * before.prey);
}

#[test]
fn test_occupancy_and_bounds_sequential() {
    let rules = Rules::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut world = seeded_world(40, 500, 120, 1);

    for _ in 0..60 {
        let before = world.census();
        world = step_sequential(&world, &rules, &mut rng);
        assert_consistent(&world);
        assert_bounded(before, world.census());
    }
}

#[test]
fn test_occupancy_and_bounds_parallel() {
    let rules = Rules::default();
    let mut world = seeded_world(40, 500, 120, 2);

    for step in 0..60u64 {
        let before = world.census();
        world = step_parallel(&world, &rules, 4, 1000 + step).unwrap();
        assert_consistent(&world);
        assert_bounded(before, world.census());
    }
}

/// Rules under which no agent breeds or starves within a few chronons
fn conserving_rules() -> Rules {
    Rules {
        prey_breed_threshold: u32::MAX,
        predator_breed_threshold: u32::MAX,
        predator_initial_energy: 1_000_000,
        ..Rules::default()
    }
}

fn conserving_world(size: usize, prey: usize, predators: usize, seed: u64) -> World {
    let mut world = World::create(size).unwrap();
    world.seed(prey, predators, &conserving_rules(), &mut ChaCha8Rng::seed_from_u64(seed));
    world
}

/// Prey cells of `before` that hold a predator in `after`
fn eaten(before: &World, after: &World) -> usize {
    after
        .cells()
        .filter(|(p, c)| c.is_predator() && before.get(*p).is_prey())
        .count()
}

#[test]
fn test_parallel_conserves_agents_under_contention() {
    let rules = conserving_rules();

    // One worker per row, so every move can race a neighbor's worker
    for seed in 0..100u64 {
        for (prey, predators) in [(30, 0), (0, 30), (20, 20)] {
            let mut world = conserving_world(8, prey, predators, seed);
            for step in 0..3u64 {
                let next = step_parallel(&world, &rules, 8, seed * 31 + step).unwrap();
                let before = world.census();
                let after = next.census();

                assert_eq!(after.predators, before.predators, "seed {} step {}", seed, step);
                assert_eq!(
                    after.prey,
                    before.prey - eaten(&world, &next),
                    "seed {} step {}",
                    seed,
                    step
                );
                assert_consistent(&next);
                world = next;
            }
        }
    }
}

#[test]
fn test_sequential_conserves_agents() {
    let rules = conserving_rules();
    let mut rng = ChaCha8Rng::seed_from_u64(15);
    let mut world = conserving_world(12, 60, 40, 15);

    for _ in 0..10 {
        let next = step_sequential(&world, &rules, &mut rng);
        assert_eq!(next.census().predators, world.census().predators);
        assert_eq!(next.census().prey, world.census().prey - eaten(&world, &next));
        world = next;
    }
}

#[test]
fn test_starvation_ignores_neighbors() {
    let rules = Rules::default();
    let mut rows = vec![vec![fish(0); 3]; 3];
    rows[1][1] = shark(0, rules.predator_energy_loss as i32);
    let world = World::from_rows(rows).unwrap();

    let seq = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(3));
    let par = step_parallel(&world, &rules, 3, 3).unwrap();

    for next in [seq, par] {
        assert_eq!(next.census().predators, 0);
        assert_eq!(next.census().prey, 8);
    }
}

#[test]
fn test_toroidal_wrap_north() {
    let rules = Rules::default();
    let mut world = World::create(5).unwrap();
    world.set(Point::new(0, 0), shark(0, 5));
    world.set(Point::new(0, 4), fish(0));

    let seq = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(4));
    let par = step_parallel(&world, &rules, 2, 4).unwrap();

    for next in [seq, par] {
        assert_eq!(*next.get(Point::new(0, 4)), shark(1, 6));
        assert_eq!(next.census(), Census { prey: 0, predators: 1 });
    }
}

#[test]
fn test_toroidal_wrap_west() {
    let rules = Rules::default();
    let mut world = World::create(5).unwrap();
    world.set(Point::new(0, 2), shark(0, 5));
    world.set(Point::new(4, 2), fish(0));

    let next = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(5));

    assert_eq!(*next.get(Point::new(4, 2)), shark(1, 6));
}

#[test]
fn test_single_cell_world_does_not_crash() {
    let rules = Rules::default();
    let world = World::from_rows(vec![vec![fish(0)]]).unwrap();

    let seq = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(6));
    let par = step_parallel(&world, &rules, 8, 6).unwrap();

    assert_eq!(*seq.get(Point::new(0, 0)), fish(1));
    assert_eq!(*par.get(Point::new(0, 0)), fish(1));
}

#[test]
fn test_breeding_threshold_exact() {
    let rules = Rules {
        prey_breed_threshold: 3,
        ..Rules::default()
    };
    let origin = Point::new(2, 2);
    let mut world = World::create(5).unwrap();
    world.set(origin, fish(2));

    let seq = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(7));
    let par = step_parallel(&world, &rules, 2, 7).unwrap();

    for next in [seq, par] {
        assert_eq!(*next.get(origin), fish(0));
        assert_eq!(next.census().prey, 2);
        // The mover's timer was reset too
        assert!(next.cells().all(|(_, c)| c.is_empty() || *c == fish(0)));
    }
}

#[test]
fn test_below_threshold_no_offspring() {
    let rules = Rules {
        prey_breed_threshold: 3,
        ..Rules::default()
    };
    let mut world = World::create(5).unwrap();
    world.set(Point::new(2, 2), fish(1));

    let next = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(8));

    assert_eq!(next.census().prey, 1);
    assert!(next.get(Point::new(2, 2)).is_empty());
    assert!(next.cells().any(|(_, c)| *c == fish(2)));
}

#[test]
fn test_parallel_deterministic_single_worker() {
    let rules = Rules::default();
    let world = seeded_world(30, 300, 60, 9);

    let a = step_parallel(&world, &rules, 1, 77).unwrap();
    let b = step_parallel(&world, &rules, 1, 77).unwrap();
    let c = step_parallel(&world, &rules, 1, 78).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_parallel_deterministic_without_contention() {
    // 16 rows, 4 workers of 4 rows each. Agents only on the two middle rows of each
    // range, so no move or probe ever crosses into another worker's rows.
    let rules = Rules::default();
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let mut world = World::create(16).unwrap();
    for band in 0..4 {
        for y in [4 * band + 1, 4 * band + 2] {
            for x in 0..16 {
                let cell = match rng.gen_range(0..4) {
                    0 => fish(rng.gen_range(0..3)),
                    1 => shark(rng.gen_range(0..8), rng.gen_range(1..6)),
                    _ => Cell::Empty,
                };
                world.set(Point::new(x, y), cell);
            }
        }
    }

    let a = step_parallel(&world, &rules, 4, 2024).unwrap();
    let b = step_parallel(&world, &rules, 4, 2024).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_single_worker_parity() {
    let rules = Rules::default();
    let mut world = World::create(3).unwrap();
    world.set(Point::new(1, 1), shark(0, 5));
    world.set(Point::new(1, 0), fish(0));

    let seq = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(11));
    let par = step_parallel(&world, &rules, 1, 11).unwrap();

    assert_eq!(seq, par);
    assert_eq!(*seq.get(Point::new(1, 0)), shark(1, 6));
}

#[test]
fn test_parallel_predator_breeding_requires_move() {
    let rules = Rules {
        predator_breed_threshold: 1,
        ..Rules::default()
    };
    // Predators on every cell: nobody can move
    let world = World::from_rows(vec![vec![shark(0, 5); 3]; 3]).unwrap();

    let seq = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(12));
    let par = step_parallel(&world, &rules, 3, 12).unwrap();

    // Sequential breeds in place, parallel does not breed at all
    assert!(seq.cells().all(|(_, c)| *c == Cell::newborn_predator(&rules)));
    assert!(par.cells().all(|(_, c)| *c == shark(1, 4)));
}

#[test]
fn test_scenario_lone_predator_starves() {
    let rules = Rules {
        predator_energy_loss: 1,
        ..Rules::default()
    };
    let mut world = World::create(3).unwrap();
    world.set(Point::new(0, 0), shark(0, 1));

    let next = step_sequential(&world, &rules, &mut ChaCha8Rng::seed_from_u64(13));

    assert!(next.cells().all(|(_, c)| c.is_empty()));
}

#[test]
fn test_scenario_prey_breeds_on_second_step() {
    let rules = Rules {
        prey_breed_threshold: 2,
        ..Rules::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(14);
    let mut world = World::create(3).unwrap();
    world.set(Point::new(1, 1), fish(0));

    world = step_sequential(&world, &rules, &mut rng);
    let (first, _) = world.cells().find(|(_, c)| c.is_prey()).unwrap();
    assert_eq!(*world.get(first), fish(1));
    assert_eq!(world.census().prey, 1);

    world = step_sequential(&world, &rules, &mut rng);
    assert_eq!(*world.get(first), fish(0));
    assert_eq!(world.census().prey, 2);
}

#[test]
fn test_full_simulation_cycle() {
    for mode in [StepMode::Sequential, StepMode::Parallel] {
        let mut config = Config::default();
        config.world.grid_size = 50;
        config.world.initial_prey = 600;
        config.world.initial_predators = 100;
        config.run.mode = mode;
        config.run.workers = 4;
        config.run.seed = Some(12345);

        let mut sim = Simulation::new(&config).unwrap();
        sim.run(100).unwrap();

        assert_eq!(sim.time, 100);
        assert_eq!(sim.world().census(), sim.census());
        assert_consistent(sim.world());
    }
}
