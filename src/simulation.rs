//! Simulation driver: owns the current world and advances it chronon by chronon.

use crate::config::{Config, Rules, StepMode};
use crate::error::WatorError;
use crate::stats::{Census, Stats, StatsHistory};
use crate::step::{step_parallel, step_sequential};
use crate::world::World;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// A running simulation
pub struct Simulation {
    world: World,
    rules: Rules,
    mode: StepMode,
    workers: usize,

    /// Chronons elapsed
    pub time: u64,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,

    // Seeds placement and drives the sequential stepper
    rng: ChaCha8Rng,
    seed: u64,
}

impl Simulation {
    /// Validate `config`, create the world and seed it
    pub fn new(config: &Config) -> Result<Self, WatorError> {
        config.validate()?;

        let seed = config.run.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut world = World::create(config.world.grid_size)?;
        let placed = world.seed(
            config.world.initial_prey,
            config.world.initial_predators,
            &config.rules,
            &mut rng,
        );
        log::info!(
            "World {}x{} seeded with {} prey and {} predators (seed {})",
            world.size(),
            world.size(),
            placed.prey,
            placed.predators,
            seed
        );

        let mut stats = Stats::new();
        stats.update(0, placed);
        let mut stats_history = StatsHistory::new(config.logging.stats_interval);
        if stats_history.is_due(0) {
            stats_history.record(stats.clone());
        }

        Ok(Self {
            world,
            rules: config.rules,
            mode: config.run.mode,
            workers: config.run.workers,
            time: 0,
            stats,
            stats_history,
            rng,
            seed,
        })
    }

    /// Advance one chronon with the configured stepper
    pub fn step(&mut self) -> Result<(), WatorError> {
        let next = match self.mode {
            StepMode::Sequential => step_sequential(&self.world, &self.rules, &mut self.rng),
            StepMode::Parallel => {
                let step_seed = self.seed.wrapping_add(self.time);
                step_parallel(&self.world, &self.rules, self.workers, step_seed)?
            }
        };
        self.world = next;
        self.time += 1;

        self.stats.update(self.time, self.world.census());
        log::debug!("{}", self.stats.summary());
        if self.stats_history.is_due(self.time) {
            self.stats_history.record(self.stats.clone());
        }
        Ok(())
    }

    /// Run for `steps` chronons
    pub fn run(&mut self, steps: u64) -> Result<(), WatorError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Run with a callback after every chronon
    pub fn run_with_callback<F>(&mut self, steps: u64, mut callback: F) -> Result<(), WatorError>
    where
        F: FnMut(&Simulation),
    {
        for _ in 0..steps {
            self.step()?;
            callback(self);
        }
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Census as of the last step
    pub fn census(&self) -> Census {
        self.stats.census()
    }

    /// True once both species are gone
    pub fn is_extinct(&self) -> bool {
        self.census().total() == 0
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
