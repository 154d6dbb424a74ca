//! Events raised by engine workers while a run is in progress.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Aggregate progress of a run.
///
/// Within a single run `percent` never decreases and
/// `completed_count <= total_count` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Overall progress, 0 to 100.
    pub percent: f64,
    /// Wall time since the run started.
    pub elapsed: Duration,
    /// Jobs that have finished.
    pub completed_count: usize,
    /// Jobs in the run.
    pub total_count: usize,
}

impl ProgressEvent {
    pub fn new(percent: f64, elapsed: Duration, completed_count: usize, total_count: usize) -> Self {
        Self {
            percent,
            elapsed,
            completed_count,
            total_count,
        }
    }

    /// Check the per-event bounds (percent in range, counts consistent).
    pub fn is_well_formed(&self) -> bool {
        (0.0..=100.0).contains(&self.percent) && self.completed_count <= self.total_count
    }

    /// Extrapolated time until completion, if enough progress has been made
    /// to estimate it.
    pub fn remaining(&self) -> Option<Duration> {
        let fraction = self.percent / 100.0;
        if fraction < 1e-3 {
            return None;
        }
        let total = self.elapsed.as_secs_f64() / fraction;
        Some(Duration::from_secs_f64(
            (total - self.elapsed.as_secs_f64()).max(0.0),
        ))
    }
}

/// Which stream a line of job output was written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStream::Stdout => f.write_str("stdout"),
            OutputStream::Stderr => f.write_str("stderr"),
        }
    }
}

/// One line written by a job.
///
/// Lines from the same job and stream arrive in the order they were written.
/// There is no ordering between different jobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputEvent {
    pub job_name: String,
    pub line: String,
    pub stream: OutputStream,
}

impl OutputEvent {
    pub fn stdout(job_name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            line: line.into(),
            stream: OutputStream::Stdout,
        }
    }

    pub fn stderr(job_name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            line: line.into(),
            stream: OutputStream::Stderr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_bounds() {
        assert!(ProgressEvent::new(0.0, Duration::ZERO, 0, 0).is_well_formed());
        assert!(ProgressEvent::new(100.0, Duration::ZERO, 4, 4).is_well_formed());
        assert!(!ProgressEvent::new(100.5, Duration::ZERO, 4, 4).is_well_formed());
        assert!(!ProgressEvent::new(50.0, Duration::ZERO, 5, 4).is_well_formed());
    }

    #[test]
    fn test_remaining_extrapolates() {
        let event = ProgressEvent::new(25.0, Duration::from_secs(60), 1, 4);
        assert_eq!(event.remaining(), Some(Duration::from_secs(180)));
    }

    #[test]
    fn test_remaining_unknown_at_start() {
        let event = ProgressEvent::new(0.0, Duration::from_secs(5), 0, 4);
        assert_eq!(event.remaining(), None);
    }
}
