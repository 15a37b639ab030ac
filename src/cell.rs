//! Grid cells and the per-kind agent state they carry.

use crate::config::Rules;
use serde::{Deserialize, Serialize};

/// What occupies a cell, without its state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Prey,
    Predator,
}

/// Prey (fish) state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreyState {
    /// Chronons survived since last reproduction
    pub breed_timer: u32,
}

/// Predator (shark) state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredatorState {
    /// Chronons survived since last reproduction
    pub breed_timer: u32,
    /// Remaining energy; the predator starves once this reaches zero
    pub energy: i32,
}

impl PredatorState {
    /// A freshly born predator
    pub fn newborn(rules: &Rules) -> Self {
        Self {
            breed_timer: 0,
            energy: rules.initial_energy(),
        }
    }
}

/// A single grid cell. Agent state only exists for the matching kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Prey(PreyState),
    Predator(PredatorState),
}

impl Cell {
    #[inline]
    pub fn newborn_prey() -> Self {
        Cell::Prey(PreyState::default())
    }

    #[inline]
    pub fn newborn_predator(rules: &Rules) -> Self {
        Cell::Predator(PredatorState::newborn(rules))
    }

    #[inline]
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Empty => CellKind::Empty,
            Cell::Prey(_) => CellKind::Prey,
            Cell::Predator(_) => CellKind::Predator,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[inline]
    pub fn is_prey(&self) -> bool {
        matches!(self, Cell::Prey(_))
    }

    #[inline]
    pub fn is_predator(&self) -> bool {
        matches!(self, Cell::Predator(_))
    }

    /// ASCII glyph used by [`crate::World::render`]
    pub fn glyph(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Prey(_) => 'F',
            Cell::Predator(_) => 'S',
        }
    }
}
