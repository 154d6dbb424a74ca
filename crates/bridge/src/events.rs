//! Event channel between engine workers and the dispatching thread.
//!
//! ```text
//!  worker 1 ─┐
//!  worker 2 ─┼──▶ EventSink ══ unbounded channel ══▶ EventStream::pump ──▶ reporters
//!  worker n ─┘     (Clone + Send)                       (caller thread)
//! ```
//!
//! Each worker sends its own events in order, so lines from one job arrive in
//! the order they were written. Nothing orders events across jobs.

use crate::reporter::{OutputHelper, ProgressReporter};
use crossbeam::channel::{self, Receiver, Sender};
use lpjguess_types::{OutputEvent, OutputStream, ProgressEvent};
use std::time::Duration;
use tracing::{debug, warn};

/// An event raised by the engine during a run.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    Progress(ProgressEvent),
    Output(OutputEvent),
}

/// Engine-facing sending half. Clone one per worker thread.
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: Sender<EngineEvent>,
}

impl EventSink {
    /// Queue an event. Returns `false` if the run has already been torn down,
    /// in which case the event is dropped.
    pub fn send(&self, event: EngineEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(channel::SendError(event)) => {
                debug!(?event, "Dropping engine event after run finished");
                false
            }
        }
    }

    /// Report aggregate progress.
    pub fn progress(
        &self,
        percent: f64,
        elapsed: Duration,
        completed: usize,
        total: usize,
    ) -> bool {
        self.send(EngineEvent::Progress(ProgressEvent::new(
            percent, elapsed, completed, total,
        )))
    }

    /// Report a line a job wrote to stdout.
    pub fn stdout(&self, job_name: impl Into<String>, line: impl Into<String>) -> bool {
        self.send(EngineEvent::Output(OutputEvent::stdout(job_name, line)))
    }

    /// Report a line a job wrote to stderr.
    pub fn stderr(&self, job_name: impl Into<String>, line: impl Into<String>) -> bool {
        self.send(EngineEvent::Output(OutputEvent::stderr(job_name, line)))
    }
}

/// Counts of events delivered by [`EventStream::pump`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub progress_events: usize,
    pub output_events: usize,
    /// Progress events that broke the bounds or went backwards. They are
    /// still delivered.
    pub irregular_progress: usize,
}

/// Consumer half. Drained on a single thread.
#[derive(Debug)]
pub struct EventStream {
    rx: Receiver<EngineEvent>,
}

impl EventStream {
    /// Deliver events to the handlers until every [`EventSink`] clone has
    /// been dropped.
    pub fn pump(
        &self,
        progress: &mut dyn ProgressReporter,
        output: &mut dyn OutputHelper,
    ) -> PumpStats {
        let mut stats = PumpStats::default();
        let mut last_percent = f64::NEG_INFINITY;

        for event in self.rx.iter() {
            match event {
                EngineEvent::Progress(p) => {
                    if !p.is_well_formed() || p.percent < last_percent {
                        warn!(
                            percent = p.percent,
                            last_percent,
                            completed = p.completed_count,
                            total = p.total_count,
                            "Irregular progress event from engine"
                        );
                        stats.irregular_progress += 1;
                    }
                    last_percent = last_percent.max(p.percent);
                    stats.progress_events += 1;
                    progress.report_progress(p.percent, p.elapsed, p.completed_count, p.total_count);
                }
                EngineEvent::Output(o) => {
                    stats.output_events += 1;
                    match o.stream {
                        OutputStream::Stdout => output.report_output(&o.job_name, &o.line),
                        OutputStream::Stderr => output.report_error(&o.job_name, &o.line),
                    }
                }
            }
        }

        debug!(
            progress_events = stats.progress_events,
            output_events = stats.output_events,
            "Event stream drained"
        );
        stats
    }
}

/// Create a connected sink/stream pair.
pub fn event_channel() -> (EventSink, EventStream) {
    let (tx, rx) = channel::unbounded();
    (EventSink { tx }, EventStream { rx })
}
