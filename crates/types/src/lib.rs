//! Experiment description types for the LPJ-GUESS runtime bridge.
//!
//! These are plain values: they describe an experiment (how to run it, which
//! simulations to generate, which instruction files and PFTs to use) and the
//! events an engine reports while running it. None of them carry behavior;
//! applying factors to instruction files is the engine's job.
//!
//! # Components
//!
//! - [`RunSettings`] - How the engine should run the jobs
//! - [`Factor`] - A single change to an instruction file
//! - [`Simulation`] - A named, ordered list of factors
//! - [`RunnerConfiguration`] - Everything submitted to the engine for one run
//! - [`ProgressEvent`] / [`OutputEvent`] - Events raised by engine workers
//! - [`ExperimentResult`] - Summary returned when a run completes

mod configuration;
mod events;
mod factor;
mod result;
mod settings;
mod simulation;

pub use configuration::RunnerConfiguration;
pub use events::{OutputEvent, OutputStream, ProgressEvent};
pub use factor::{BlockParameter, CompositeFactor, Factor, TopLevelParameter};
pub use result::ExperimentResult;
pub use settings::RunSettings;
pub use simulation::Simulation;
