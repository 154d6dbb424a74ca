//! Binding surface for the LPJ-GUESS engine.
//!
//! Callers describe an experiment with the types from `lpjguess-types`,
//! submit it through a [`Bridge`], and receive progress and output through
//! their own [`ProgressReporter`] and [`OutputHelper`] implementations.
//!
//! # Architecture
//!
//! ```text
//!  caller thread                              engine (scoped thread + its workers)
//!  ─────────────                              ────────────────────────────────────
//!  Bridge::run(settings, sims, ins, pfts)
//!    │ runtime.acquire()   (load once)
//!    │ runner_config(..)
//!    │ spawn ────────────────────────────────▶ Engine::run(&config, sink)
//!    │                                            │ worker 1 ──┐
//!    │ EventStream::pump ◀═══ channel ═══════════ │ worker 2 ──┼─ sink.progress / stdout / stderr
//!    │   └─ reporter.report_progress(..)          │ worker n ──┘
//!    │   └─ helper.report_output/error(..)        │
//!    │ join ◀─────────────────────────────────── Result<ExperimentResult, E::Error>
//!    ▼
//!  Ok(result) | Err(RunError::Engine(e)) | Err(RunError::Runtime(e))
//! ```
//!
//! Handlers are invoked serially on the caller's thread, so they may keep
//! plain mutable state. There is no cancellation: once `run` is called it
//! returns only when the engine finishes or fails.
//!
//! # Example
//!
//! ```ignore
//! use lpjguess_bridge::{simulation, Bridge, FnProgressReporter};
//! use lpjguess_types::{Factor, RunSettings};
//!
//! let bridge = Bridge::connect(runtime, |loaded| ExperimentRunner::new(loaded))?;
//!
//! let sims = [
//!     simulation("co2_low", [Factor::top_level("co2", "280")]),
//!     simulation("co2_high", [Factor::top_level("co2", "560")]),
//! ];
//! let mut progress = FnProgressReporter::new(|pct, _, done, total| {
//!     println!("{pct:.1}% ({done}/{total})");
//! });
//!
//! let result = bridge.run(
//!     RunSettings::new("out", "/opt/guess", "cru_ncep"),
//!     sims,
//!     ["global.ins"],
//!     ["TeBE", "C3G"],
//!     Some(&mut progress),
//!     None,
//! )?;
//! ```

mod builders;
mod dispatcher;
mod engine;
mod error;
mod events;
mod reporter;

pub use builders::{runner_config, simulation};
pub use dispatcher::Bridge;
pub use engine::Engine;
pub use error::RunError;
pub use events::{event_channel, EngineEvent, EventSink, EventStream, PumpStats};
pub use reporter::{
    console_reporters, format_hms, ConsoleLine, ConsoleOutputHelper, ConsoleProgressReporter,
    FnOutputHelper, FnProgressReporter, OutputHelper, ProgressReporter,
};
