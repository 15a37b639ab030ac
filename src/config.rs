//! Configuration for Wa-Tor runs.
//!
//! [`Rules`] holds the ecological constants every stepper reads. It is built once
//! before stepping starts and passed by reference into each step call.
//! [`Config`] wraps it with world size, initial population and run settings, and
//! round-trips through YAML.

use crate::error::WatorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Grid size and initial population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Width and height of the square grid
    pub grid_size: usize,
    /// Prey (fish) placed at seeding time
    pub initial_prey: usize,
    /// Predators (sharks) placed at seeding time
    pub initial_predators: usize,
}

/// Ecological rule constants, immutable for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Chronons a prey must survive before it reproduces
    pub prey_breed_threshold: u32,
    /// Chronons a predator must survive before it reproduces
    pub predator_breed_threshold: u32,
    /// Energy of a seeded or newborn predator
    pub predator_initial_energy: u32,
    /// Energy gained per prey eaten
    pub predator_energy_gain: u32,
    /// Energy lost every chronon
    pub predator_energy_loss: u32,
}

/// Which stepper advances the world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepMode {
    #[default]
    #[serde(rename = "seq", alias = "sequential")]
    Sequential,
    #[serde(rename = "par", alias = "parallel")]
    Parallel,
}

impl FromStr for StepMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seq" | "sequential" => Ok(StepMode::Sequential),
            "par" | "parallel" => Ok(StepMode::Parallel),
            other => Err(format!("unknown mode '{}', expected seq or par", other)),
        }
    }
}

impl std::fmt::Display for StepMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepMode::Sequential => write!(f, "seq"),
            StepMode::Parallel => write!(f, "par"),
        }
    }
}

/// Run loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of chronons to simulate
    pub steps: u64,
    /// Sequential or parallel stepping
    pub mode: StepMode,
    /// Worker threads for parallel mode
    pub workers: usize,
    /// Random seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Chronons between recorded census snapshots (0 = never)
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 150,
            initial_prey: 800,
            initial_predators: 150,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            prey_breed_threshold: 3,
            predator_breed_threshold: 8,
            predator_initial_energy: 5,
            predator_energy_gain: 2,
            predator_energy_loss: 1,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            mode: StepMode::Sequential,
            workers: default_workers(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 10,
            log_level: "info".to_string(),
        }
    }
}

/// Number of hardware threads, or 1 if that cannot be determined
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Fail with `CapacityExceeded` if the agents do not fit on the grid
pub fn check_capacity(grid_size: usize, prey: usize, predators: usize) -> Result<(), WatorError> {
    let capacity = grid_size.saturating_mul(grid_size);
    let requested = prey.saturating_add(predators);
    if requested > capacity {
        return Err(WatorError::CapacityExceeded {
            requested,
            capacity,
        });
    }
    Ok(())
}

impl Rules {
    /// Every rule constant must be positive
    pub fn validate(&self) -> Result<(), WatorError> {
        let checks = [
            ("prey_breed_threshold", self.prey_breed_threshold),
            ("predator_breed_threshold", self.predator_breed_threshold),
            ("predator_initial_energy", self.predator_initial_energy),
            ("predator_energy_gain", self.predator_energy_gain),
            ("predator_energy_loss", self.predator_energy_loss),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(WatorError::invalid(format!("{} must be > 0", name)));
            }
        }
        let energies = [
            ("predator_initial_energy", self.predator_initial_energy),
            ("predator_energy_gain", self.predator_energy_gain),
            ("predator_energy_loss", self.predator_energy_loss),
        ];
        for (name, value) in energies {
            if i32::try_from(value).is_err() {
                return Err(WatorError::invalid(format!(
                    "{} must be <= {}, got {}",
                    name,
                    i32::MAX,
                    value
                )));
            }
        }
        Ok(())
    }

    /// Energy of a newborn predator, capped at `i32::MAX`
    #[inline]
    pub fn initial_energy(&self) -> i32 {
        i32::try_from(self.predator_initial_energy).unwrap_or(i32::MAX)
    }

    /// Energy gained per meal, capped at `i32::MAX`
    #[inline]
    pub fn energy_gain(&self) -> i32 {
        i32::try_from(self.predator_energy_gain).unwrap_or(i32::MAX)
    }

    /// Energy lost per chronon, capped at `i32::MAX`
    #[inline]
    pub fn energy_loss(&self) -> i32 {
        i32::try_from(self.predator_energy_loss).unwrap_or(i32::MAX)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WatorError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WatorError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), WatorError> {
        if self.world.grid_size == 0 {
            return Err(WatorError::invalid("grid_size must be > 0"));
        }
        if self.run.workers == 0 {
            return Err(WatorError::invalid("workers must be >= 1"));
        }
        if self.logging.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(WatorError::invalid(format!(
                "unknown log_level '{}'",
                self.logging.log_level
            )));
        }
        self.rules.validate()?;
        check_capacity(
            self.world.grid_size,
            self.world.initial_prey,
            self.world.initial_predators,
        )
    }
}
