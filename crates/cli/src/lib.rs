//! Operator tooling for the LPJ-GUESS bridge.
//!
//! Backs the `lpjguess-bridge` binary:
//!
//! - `detect` - print the runtime identifier for a (system, machine) pair
//! - `check` - verify the engine modules exist for this host
//! - `plan` - parse an [`ExperimentFile`] and print its [`PlanSummary`]

mod experiment;
mod plan;

pub use experiment::{ExperimentError, ExperimentFile, SimulationEntry};
pub use plan::{PlanSummary, PlannedSimulation};
