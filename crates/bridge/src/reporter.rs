//! Caller-supplied handlers for progress and job output.
//!
//! The engine raises events on its own worker threads, but handlers never run
//! there: the dispatcher queues every event and invokes the handlers one at a
//! time on the thread that called `run`. Handlers therefore take `&mut self`
//! and need not be `Send` or `Sync`.

use lpjguess_types::ProgressEvent;
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Receives aggregate progress updates.
///
/// Called repeatedly during a run, at a cadence driven by job progress rather
/// than a fixed interval. Percentages never decrease within one run.
///
/// ```compile_fail
/// use lpjguess_bridge::ProgressReporter;
///
/// struct Silent;
///
/// impl ProgressReporter for Silent {}
/// ```
pub trait ProgressReporter {
    /// Report progress.
    ///
    /// # Arguments
    ///
    /// * `percent` - Overall progress, 0 to 100
    /// * `elapsed` - Wall time since the run started
    /// * `completed` - Jobs that have finished
    /// * `total` - Jobs in the run
    fn report_progress(&mut self, percent: f64, elapsed: Duration, completed: usize, total: usize);
}

/// Receives lines written by jobs.
///
/// Both methods must be provided; there is no silent default.
///
/// ```compile_fail
/// use lpjguess_bridge::OutputHelper;
///
/// struct OnlyStdout;
///
/// impl OutputHelper for OnlyStdout {
///     fn report_output(&mut self, _job_name: &str, _line: &str) {}
/// }
/// ```
pub trait OutputHelper {
    /// A line the job wrote to stdout.
    fn report_output(&mut self, job_name: &str, line: &str);

    /// A line the job wrote to stderr.
    fn report_error(&mut self, job_name: &str, line: &str);
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for &mut R {
    fn report_progress(&mut self, percent: f64, elapsed: Duration, completed: usize, total: usize) {
        (**self).report_progress(percent, elapsed, completed, total)
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for Box<R> {
    fn report_progress(&mut self, percent: f64, elapsed: Duration, completed: usize, total: usize) {
        (**self).report_progress(percent, elapsed, completed, total)
    }
}

impl<O: OutputHelper + ?Sized> OutputHelper for &mut O {
    fn report_output(&mut self, job_name: &str, line: &str) {
        (**self).report_output(job_name, line)
    }

    fn report_error(&mut self, job_name: &str, line: &str) {
        (**self).report_error(job_name, line)
    }
}

impl<O: OutputHelper + ?Sized> OutputHelper for Box<O> {
    fn report_output(&mut self, job_name: &str, line: &str) {
        (**self).report_output(job_name, line)
    }

    fn report_error(&mut self, job_name: &str, line: &str) {
        (**self).report_error(job_name, line)
    }
}

/// Progress reporter backed by a closure taking
/// `(percent, elapsed, completed, total)`.
pub struct FnProgressReporter<F> {
    callback: F,
}

impl<F> FnProgressReporter<F>
where
    F: FnMut(f64, Duration, usize, usize),
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for FnProgressReporter<F>
where
    F: FnMut(f64, Duration, usize, usize),
{
    fn report_progress(&mut self, percent: f64, elapsed: Duration, completed: usize, total: usize) {
        (self.callback)(percent, elapsed, completed, total)
    }
}

/// Output helper backed by two closures taking `(job_name, line)`.
pub struct FnOutputHelper<O, E> {
    on_output: O,
    on_error: E,
}

impl<O, E> FnOutputHelper<O, E>
where
    O: FnMut(&str, &str),
    E: FnMut(&str, &str),
{
    pub fn new(on_output: O, on_error: E) -> Self {
        Self {
            on_output,
            on_error,
        }
    }
}

impl<O, E> OutputHelper for FnOutputHelper<O, E>
where
    O: FnMut(&str, &str),
    E: FnMut(&str, &str),
{
    fn report_output(&mut self, job_name: &str, line: &str) {
        (self.on_output)(job_name, line)
    }

    fn report_error(&mut self, job_name: &str, line: &str) {
        (self.on_error)(job_name, line)
    }
}

/// Tracks whether a console progress line is waiting for its newline.
///
/// The progress reporter leaves its `\r` line open so the next update can
/// overwrite it. An output helper sharing the same `ConsoleLine` closes that
/// line before printing job output, so the two never end up on one line.
#[derive(Clone, Debug, Default)]
pub struct ConsoleLine(Rc<Cell<bool>>);

impl ConsoleLine {
    pub fn is_open(&self) -> bool {
        self.0.get()
    }

    fn set_open(&self, open: bool) {
        self.0.set(open);
    }

    /// Close the line if it is open. Returns whether it was.
    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Console reporters for stdout and stderr that share one [`ConsoleLine`].
///
/// These are what [`Bridge::run`](crate::Bridge::run) uses when no handler
/// is supplied.
pub fn console_reporters() -> (ConsoleProgressReporter, ConsoleOutputHelper) {
    let line = ConsoleLine::default();
    (
        ConsoleProgressReporter::stdout().with_line(line.clone()),
        ConsoleOutputHelper::stdio().with_line(line),
    )
}

/// Writes a single, continuously rewritten progress line.
///
/// ```text
/// 42.50% complete, 00:01:10 elapsed, 00:01:34 remaining (17/40 simulations complete)
/// ```
pub struct ConsoleProgressReporter<W = io::Stdout> {
    out: W,
    line: ConsoleLine,
}

impl ConsoleProgressReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: ConsoleLine::default(),
        }
    }

    pub fn with_line(mut self, line: ConsoleLine) -> Self {
        self.line = line;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressReporter for ConsoleProgressReporter<W> {
    fn report_progress(&mut self, percent: f64, elapsed: Duration, completed: usize, total: usize) {
        let event = ProgressEvent::new(percent, elapsed, completed, total);
        let result = match event.remaining() {
            None => write!(self.out, "\r{percent:.2}% complete"),
            Some(remaining) => write!(
                self.out,
                "\r{percent:.2}% complete, {} elapsed, {} remaining ({completed}/{total} simulations complete)",
                format_hms(elapsed),
                format_hms(remaining),
            ),
        };
        let result = result.and_then(|_| {
            if total > 0 && completed == total {
                writeln!(self.out)?;
                self.line.set_open(false);
            } else {
                self.line.set_open(true);
            }
            self.out.flush()
        });
        if let Err(e) = result {
            debug!(error = %e, "Failed to write progress");
        }
    }
}

/// Writes job stdout to one writer and job stderr to another, each line
/// prefixed with the job name.
///
/// When given the [`ConsoleLine`] of a progress reporter writing to the same
/// terminal, an open progress line is ended on `out` before any job line.
pub struct ConsoleOutputHelper<O = io::Stdout, E = io::Stderr> {
    out: O,
    err: E,
    line: ConsoleLine,
}

impl ConsoleOutputHelper<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleOutputHelper<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            line: ConsoleLine::default(),
        }
    }

    pub fn with_line(mut self, line: ConsoleLine) -> Self {
        self.line = line;
        self
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn close_progress_line(&mut self) -> io::Result<()> {
        if self.line.take() {
            writeln!(self.out)?;
            self.out.flush()?;
        }
        Ok(())
    }
}

impl<O: Write, E: Write> OutputHelper for ConsoleOutputHelper<O, E> {
    fn report_output(&mut self, job_name: &str, line: &str) {
        let result = self
            .close_progress_line()
            .and_then(|_| writeln!(self.out, "[{job_name}] {line}"));
        if let Err(e) = result {
            debug!(error = %e, job = job_name, "Failed to write job output");
        }
    }

    fn report_error(&mut self, job_name: &str, line: &str) {
        let result = self
            .close_progress_line()
            .and_then(|_| writeln!(self.err, "[{job_name}] {line}"));
        if let Err(e) = result {
            debug!(error = %e, job = job_name, "Failed to write job error output");
        }
    }
}

/// Format a duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
