//! Wa-Tor - CLI Entry Point
//!
//! Runs the simulation headless in sequential or parallel mode.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use wator::config::default_workers;
use wator::{speedup_sweep, Config, Simulation, StepMode, WatorError};

#[derive(Parser)]
#[command(name = "wator")]
#[command(version)]
#[command(about = "Wa-Tor predator-prey simulation on a toroidal grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run(RunArgs),

    /// Compare sequential and parallel stepping speed
    Benchmark {
        /// Grid size (N x N)
        #[arg(long, default_value = "500")]
        size: usize,

        /// Number of steps per run
        #[arg(short, long, default_value = "100")]
        steps: u64,

        /// Worker counts to try, comma separated
        #[arg(short, long, value_delimiter = ',', default_value = "1,2,4,8")]
        threads: Vec<usize>,

        /// Random seed shared by every run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "wator.yaml")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Configuration file (YAML); flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid size (N x N)
    #[arg(long)]
    size: Option<usize>,

    /// Initial prey (fish) count
    #[arg(long)]
    prey: Option<usize>,

    /// Initial predator (shark) count
    #[arg(long)]
    predators: Option<usize>,

    /// Number of steps
    #[arg(short, long)]
    steps: Option<u64>,

    /// Stepper: seq or par
    #[arg(short, long)]
    mode: Option<StepMode>,

    /// Worker threads for par mode
    #[arg(short, long)]
    workers: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Print a census line every N steps (0 = never)
    #[arg(long)]
    stats_every: Option<u64>,

    /// Suppress console output
    #[arg(short, long)]
    quiet: bool,

    /// Write the recorded census history here as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the final grid, up to N x N cells
    #[arg(long, value_name = "N")]
    print_grid: Option<usize>,

    /// NumShark NumFish FishBreed SharkBreed Starve GridSize Threads
    #[arg(allow_negative_numbers = true, value_name = "POSITIONAL")]
    positional: Vec<i64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = build_config(&args)?;
            init_logging(&config.logging.log_level);
            run_simulation(args, config)
        }
        Commands::Benchmark {
            size,
            steps,
            threads,
            seed,
        } => {
            init_logging("info");
            run_benchmark(size, steps, threads, seed)
        }
        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }
    }
}

/// Initialize logging; RUST_LOG overrides `default_level`
fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Apply the seven positional values in their fixed order
fn apply_positional(config: &mut Config, values: &[i64]) -> Result<(), WatorError> {
    let [sharks, fish, fish_breed, shark_breed, starve, size, threads] = values else {
        return Err(WatorError::invalid(format!(
            "expected 7 positional values, got {}",
            values.len()
        )));
    };

    let count = |name: &str, v: i64| {
        usize::try_from(v).map_err(|_| WatorError::invalid(format!("{} must be >= 0, got {}", name, v)))
    };
    let positive = |name: &str, v: i64| match u32::try_from(v) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(WatorError::invalid(format!("{} must be > 0, got {}", name, v))),
    };

    config.world.initial_predators = count("sharks", *sharks)?;
    config.world.initial_prey = count("fish", *fish)?;
    config.rules.prey_breed_threshold = positive("FishBreed", *fish_breed)?;
    config.rules.predator_breed_threshold = positive("SharkBreed", *shark_breed)?;
    config.rules.predator_initial_energy = positive("Starve", *starve)?;
    config.world.grid_size = positive("GridSize", *size)? as usize;
    config.run.workers = positive("Threads", *threads)? as usize;
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<Config, WatorError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(size) = args.size {
        config.world.grid_size = size;
    }
    if let Some(prey) = args.prey {
        config.world.initial_prey = prey;
    }
    if let Some(predators) = args.predators {
        config.world.initial_predators = predators;
    }
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
    if let Some(mode) = args.mode {
        config.run.mode = mode;
    }
    if let Some(workers) = args.workers {
        config.run.workers = workers;
    }
    if args.seed.is_some() {
        config.run.seed = args.seed;
    }
    if let Some(every) = args.stats_every {
        config.logging.stats_interval = every;
    }

    // Positional values override the flags
    if !args.positional.is_empty() {
        apply_positional(&mut config, &args.positional)?;
    }

    config.validate()?;
    Ok(config)
}

fn run_simulation(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &args.config {
        log::info!("Loaded config from: {:?}", path);
    }
    let mut sim = Simulation::new(&config)?;
    let quiet = args.quiet;

    if !quiet {
        println!(
            "CFG sharks={} fish={} FB={} SB={} Starve={} size={} threads={} mode={} seed={}",
            config.world.initial_predators,
            config.world.initial_prey,
            config.rules.prey_breed_threshold,
            config.rules.predator_breed_threshold,
            config.rules.predator_initial_energy,
            config.world.grid_size,
            config.run.workers,
            config.run.mode,
            sim.seed()
        );
    }

    let start = Instant::now();
    sim.run_with_callback(config.run.steps, |s| {
        if !quiet && s.stats_history.is_due(s.time) {
            println!("{}", s.stats.summary());
        }
    })?;
    let elapsed = start.elapsed();

    if sim.is_extinct() {
        log::warn!("Both populations extinct at step {}", sim.time);
    }

    if !quiet {
        println!(
            "mode={} workers={} size={} steps={} time={:.3}s",
            config.run.mode,
            config.run.workers,
            config.world.grid_size,
            config.run.steps,
            elapsed.as_secs_f64()
        );
    }

    if let Some(max) = args.print_grid {
        print!("{}", sim.world().render(max));
    }

    if let Some(path) = args.output {
        sim.stats_history.save(&path)?;
        log::info!("Census history: {:?}", path);
    }

    Ok(())
}

fn run_benchmark(
    size: usize,
    steps: u64,
    threads: Vec<usize>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::default();
    config.world.grid_size = size;
    let (prey, predators) = scaled_population(size);
    config.world.initial_prey = prey;
    config.world.initial_predators = predators;
    config.run.seed = seed;
    config.run.workers = default_workers();
    config.logging.stats_interval = 0;

    println!("=== Wa-Tor Benchmark ===");
    println!("Grid: {}x{}", size, size);
    println!("Steps: {}", steps);
    println!();

    let results = speedup_sweep(&config, steps, &threads)?;
    let (sequential, parallel) = results.split_first().ok_or("no benchmark results")?;

    println!("seq            time={:8.3}s", sequential.elapsed_secs);
    if let Some(base) = parallel.first() {
        for result in parallel {
            println!(
                "par workers={:<3} time={:8.3}s  speedup={:.2}x",
                result.workers,
                result.elapsed_secs,
                result.speedup_over(base)
            );
        }
    }

    Ok(())
}

/// Prey and predators at the density of the default 150x150 world
fn scaled_population(size: usize) -> (usize, usize) {
    let area = (size as f64 * size as f64) / (150.0 * 150.0);
    ((800.0 * area) as usize, (150.0 * area) as usize)
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
