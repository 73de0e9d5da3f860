//! Live progress line with throughput and time-to-completion estimate.
//!
//! The monitor only ever reads [`SearchProgress`]; nothing it does (including
//! failing to write) can slow down or stop the workers.

use crate::search::parallel::progress::{ProgressSnapshot, SearchProgress};
use log::debug;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Throughput and completion figures derived from one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub rate_per_sec: f64,
    pub ms_per_item: f64,
    /// Integer percentage, truncated.
    pub percent: u64,
    /// Remaining wall-clock time, unknown until some progress exists.
    pub remaining: Option<Duration>,
}

impl Estimate {
    /// Compute rate, per-item time, percent and ETA.
    ///
    /// With nothing processed yet (or no measurable elapsed time) every figure
    /// is zero and the ETA is unknown.
    pub fn compute(processed: u64, total: u64, elapsed: Duration) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (processed as u128 * 100 / total as u128) as u64
        };

        let secs = elapsed.as_secs_f64();
        if processed == 0 || secs <= 0.0 {
            return Self {
                rate_per_sec: 0.0,
                ms_per_item: 0.0,
                percent,
                remaining: None,
            };
        }

        let rate_per_sec = processed as f64 / secs;
        let ms_per_item = secs * 1000.0 / processed as f64;
        let left = total.saturating_sub(processed) as f64;
        let remaining = Duration::try_from_secs_f64(left / rate_per_sec).ok();

        Self {
            rate_per_sec,
            ms_per_item,
            percent,
            remaining,
        }
    }
}

/// Day/hour/minute breakdown of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl From<Duration> for Remaining {
    fn from(d: Duration) -> Self {
        let x = d.as_secs();
        Self {
            days: x / 86_400,
            hours: (x % 86_400) / 3_600,
            minutes: (x % 3_600) / 60,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}h{}m", self.days, self.hours, self.minutes)
    }
}

/// Format the status line for a snapshot; carriage return first so it overwrites.
pub fn status_line(snapshot: &ProgressSnapshot, estimate: &Estimate) -> String {
    let remaining = match estimate.remaining {
        Some(d) => Remaining::from(d).to_string(),
        None => "unknown".to_string(),
    };
    format!(
        "\r[ workers:{}, {}/{}, {}%, {:.0} ms, {:.2} /s, estimate remaining time: {} ]",
        snapshot.active_workers,
        snapshot.processed,
        snapshot.total,
        estimate.percent,
        estimate.ms_per_item,
        estimate.rate_per_sec,
        remaining
    )
}

/// Why the monitor loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    /// The terminate flag was raised.
    Terminated,
    /// Every candidate was processed.
    Completed,
    /// The coordinator closed the run.
    Closed,
}

pub struct ProgressMonitor {
    progress: Arc<SearchProgress>,
    interval: Duration,
    start: Instant,
}

impl ProgressMonitor {
    pub fn new(progress: Arc<SearchProgress>, interval: Duration) -> Self {
        Self {
            progress,
            interval,
            start: Instant::now(),
        }
    }

    /// Poll and render until the run reaches a terminal state.
    pub fn run<W: Write>(&mut self, out: &mut W) -> MonitorExit {
        loop {
            let snapshot = self.progress.snapshot();
            let now = Instant::now();

            // The clock restarts on every tick that still sees no progress
            if snapshot.processed == 0 {
                self.start = now;
            }
            let estimate = Estimate::compute(snapshot.processed, snapshot.total, now - self.start);
            self.render(out, &status_line(&snapshot, &estimate));

            if snapshot.terminated {
                return MonitorExit::Terminated;
            }
            if estimate.percent == 100 {
                return MonitorExit::Completed;
            }
            if self.progress.is_closed() {
                return MonitorExit::Closed;
            }

            std::thread::sleep(self.interval);
        }
    }

    fn render<W: Write>(&self, out: &mut W, line: &str) {
        if let Err(e) = out.write_all(line.as_bytes()).and_then(|_| out.flush()) {
            debug!("progress line not written: {}", e);
        }
    }
}
