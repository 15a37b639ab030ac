//! Census and statistics tracking for the simulation.

use crate::error::WatorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Live agents by kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub prey: usize,
    pub predators: usize,
}

impl Census {
    /// All live agents
    pub fn total(&self) -> usize {
        self.prey + self.predators
    }
}

/// Statistics snapshot for a simulation step
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Chronons elapsed
    pub time: u64,
    pub prey: usize,
    pub predators: usize,
    /// Change in prey since the previous chronon
    pub prey_delta: i64,
    /// Change in predators since the previous chronon
    pub predator_delta: i64,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from the census taken after a step
    pub fn update(&mut self, time: u64, census: Census) {
        self.prey_delta = census.prey as i64 - self.prey as i64;
        self.predator_delta = census.predators as i64 - self.predators as i64;
        self.time = time;
        self.prey = census.prey;
        self.predators = census.predators;
    }

    pub fn census(&self) -> Census {
        Census {
            prey: self.prey,
            predators: self.predators,
        }
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "step={:06}  prey={:6} ({:+})  predators={:6} ({:+})",
            self.time, self.prey, self.prey_delta, self.predators, self.predator_delta
        )
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Whether a snapshot is due at `time`
    pub fn is_due(&self, time: u64) -> bool {
        self.interval > 0 && time % self.interval == 0
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// Prey population over time
    pub fn prey_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.prey)).collect()
    }

    /// Predator population over time
    pub fn predator_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.predators)).collect()
    }

    /// Highest prey and predator counts seen
    pub fn peaks(&self) -> Census {
        Census {
            prey: self.snapshots.iter().map(|s| s.prey).max().unwrap_or(0),
            predators: self.snapshots.iter().map(|s| s.predators).max().unwrap_or(0),
        }
    }

    /// Save history to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WatorError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load history from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WatorError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
