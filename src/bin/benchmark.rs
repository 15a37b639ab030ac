//! Headless speedup runner: sequential vs parallel stepping at several worker counts.
//!
//! Usage: `benchmark [grid_size] [steps] [max_threads]`

use std::env;
use wator::{speedup_sweep, Config};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    let grid_size: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(500);

    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let max_threads: usize = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(wator::config::default_workers);

    // Powers of two up to max_threads, plus max_threads itself
    let mut threads: Vec<usize> = std::iter::successors(Some(1usize), |t| t.checked_mul(2))
        .take_while(|&t| t <= max_threads)
        .collect();
    if threads.last() != Some(&max_threads) {
        threads.push(max_threads);
    }

    log::info!("=== Wa-Tor Benchmark ===");
    log::info!("Grid size: {}", grid_size);
    log::info!("Steps: {}", steps);
    log::info!("Threads: {:?}", threads);

    let mut config = Config::default();
    config.world.grid_size = grid_size;

    // Scale population proportionally to grid area
    let base_grid = 150.0;
    let scale_factor = (grid_size as f64 * grid_size as f64) / (base_grid * base_grid);
    config.world.initial_prey = (800.0 * scale_factor) as usize;
    config.world.initial_predators = (150.0 * scale_factor) as usize;
    config.logging.stats_interval = 0;

    let results = match speedup_sweep(&config, steps, &threads) {
        Ok(results) => results,
        Err(e) => {
            log::error!("Benchmark failed: {}", e);
            std::process::exit(1);
        }
    };

    let Some((sequential, parallel)) = results.split_first() else {
        return;
    };
    log::info!(
        "seq time={:.3}s ({:.1} steps/s)",
        sequential.elapsed_secs,
        sequential.steps_per_second
    );

    if let Some(base) = parallel.first() {
        log::info!("=== Speedup (relative to 1 worker) ===");
        for result in parallel {
            log::info!(
                "workers={:<3} time={:.3}s speedup={:.2}x",
                result.workers,
                result.elapsed_secs,
                result.speedup_over(base)
            );
        }
    }
    log::info!(
        "Final census: prey={} predators={}",
        sequential.final_census.prey,
        sequential.final_census.predators
    );
}
