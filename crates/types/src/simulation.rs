//! Simulations.

use crate::factor::{join_names, Factor};
use serde::{Deserialize, Serialize};

/// A named set of changes applied to the base instruction files.
///
/// Order of `factors` is preserved; the engine applies them in sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    pub name: String,
    pub factors: Box<[Factor]>,
}

impl Simulation {
    pub fn new(name: impl Into<String>, factors: impl IntoIterator<Item = Factor>) -> Self {
        Self {
            name: name.into(),
            factors: factors.into_iter().collect(),
        }
    }

    /// Create a simulation named after its factors (joined with `_`).
    pub fn from_factors(factors: impl IntoIterator<Item = Factor>) -> Self {
        let factors: Box<[Factor]> = factors.into_iter().collect();
        Self {
            name: join_names(&factors),
            factors,
        }
    }

    /// Number of changes in this simulation.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True if this simulation runs the base instruction files unchanged.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
