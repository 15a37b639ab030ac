//! # Wa-Tor
//!
//! Predator–prey (shark/fish) simulation on a toroidal grid.
//!
//! ## Features
//!
//! - **Reference stepper**: single-threaded, fixed row-major order
//! - **Parallel stepper**: row-range workers with per-row locks on the next generation
//! - **Reproducible**: every random choice comes from an explicit, seeded RNG
//! - **Configurable**: YAML configuration files or CLI flags
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use wator::{step_parallel, step_sequential, Rules, World};
//!
//! let rules = Rules::default();
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let mut world = World::create(32).unwrap();
//! world.seed(200, 30, &rules, &mut rng);
//!
//! world = step_sequential(&world, &rules, &mut rng);
//! world = step_parallel(&world, &rules, 4, 1).unwrap();
//!
//! let census = world.census();
//! println!("prey={} predators={}", census.prey, census.predators);
//! ```
//!
//! ## Driving a run from a configuration
//!
//! ```rust
//! use wator::{Config, Simulation, StepMode};
//!
//! let mut config = Config::default();
//! config.world.grid_size = 40;
//! config.run.mode = StepMode::Parallel;
//! config.run.seed = Some(42);
//!
//! let mut sim = Simulation::new(&config).unwrap();
//! sim.run(50).unwrap();
//! println!("{}", sim.stats.summary());
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod stats;
pub mod step;
pub mod world;

// Re-export main types
pub use cell::{Cell, CellKind, PredatorState, PreyState};
pub use config::{Config, Rules, StepMode};
pub use error::WatorError;
pub use grid::{neighbors4, wrap, Point};
pub use simulation::Simulation;
pub use stats::Census;
pub use step::{step_parallel, step_sequential};
pub use world::World;

use std::time::Instant;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Time a headless run of `steps` chronons with `config`
pub fn benchmark(config: &Config, steps: u64) -> Result<BenchmarkResult, WatorError> {
    let mut sim = Simulation::new(config)?;
    let initial = sim.census();

    let start = Instant::now();
    sim.run(steps)?;
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        mode: sim.mode(),
        workers: sim.workers(),
        grid_size: config.world.grid_size,
        steps,
        initial,
        final_census: sim.census(),
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
    })
}

/// Time a sequential run, then a parallel run for each entry of `threads`.
///
/// Every run starts from the same seeded world; the sequential result comes first.
pub fn speedup_sweep(
    config: &Config,
    steps: u64,
    threads: &[usize],
) -> Result<Vec<BenchmarkResult>, WatorError> {
    let mut config = config.clone();
    if config.run.seed.is_none() {
        config.run.seed = Some(rand::random());
    }

    let mut results = Vec::with_capacity(threads.len() + 1);
    config.run.mode = StepMode::Sequential;
    results.push(benchmark(&config, steps)?);

    config.run.mode = StepMode::Parallel;
    for &workers in threads {
        config.run.workers = workers;
        let result = benchmark(&config, steps)?;
        log::info!(
            "par workers={} time={:.3}s ({:.1} steps/s)",
            workers,
            result.elapsed_secs,
            result.steps_per_second
        );
        results.push(result);
    }
    Ok(results)
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub mode: StepMode,
    pub workers: usize,
    pub grid_size: usize,
    pub steps: u64,
    pub initial: Census,
    pub final_census: Census,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
}

impl BenchmarkResult {
    /// Speedup of this run relative to `baseline`
    pub fn speedup_over(&self, baseline: &BenchmarkResult) -> f64 {
        baseline.elapsed_secs / self.elapsed_secs.max(f64::EPSILON)
    }
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Mode: {} (workers: {})", self.mode, self.workers)?;
        writeln!(f, "Grid: {}x{}", self.grid_size, self.grid_size)?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(
            f,
            "Prey: {} -> {}",
            self.initial.prey, self.final_census.prey
        )?;
        writeln!(
            f,
            "Predators: {} -> {}",
            self.initial.predators, self.final_census.predators
        )?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        Ok(())
    }
}
