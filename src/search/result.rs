//! Search result types and statistics

use crate::search::parallel::partition::IndexRange;
use std::time::Duration;

/// Result of a search run
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The accepted candidate, if any
    pub found: Option<FoundCandidate>,
    /// Statistics from the run
    pub statistics: SearchStatistics,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        self.found.is_some()
    }
}

/// A candidate the oracle accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundCandidate {
    /// Worker that tested it
    pub worker_id: usize,
    /// Index in the candidate space
    pub index: u64,
    /// Rendered candidate string
    pub candidate: String,
}

/// How a worker's loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerOutcome {
    /// Tested every index in its range
    #[default]
    Exhausted,
    /// The oracle accepted one of its candidates
    Found,
    /// Stopped because another worker raised the terminate flag
    Terminated,
}

/// Per-worker counters, sent to the coordinator when the worker exits
#[derive(Debug, Clone, Default)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub range: IndexRange,
    pub outcome: WorkerOutcome,
    /// Candidates submitted to the oracle
    pub tested: u64,
    /// Verdicts that were neither match nor no-match
    pub inconclusive: u64,
}

/// Statistics from a search run
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Size of the candidate space
    pub total: u64,
    /// Final value of the shared processed counter
    pub processed: u64,
    /// Sum of candidates tested across workers
    pub tested: u64,
    /// Sum of inconclusive verdicts across workers
    pub inconclusive: u64,
    /// Workers whose thread panicked before reporting
    pub failed_workers: usize,
    /// Whether the terminate flag was raised
    pub terminated: bool,
    /// Wall-clock duration of the run
    pub elapsed_time: Duration,
    /// Per-worker reports, ordered by worker id
    pub workers: Vec<WorkerReport>,
}

impl SearchStatistics {
    /// Fold in a worker's report
    pub fn record(&mut self, report: WorkerReport) {
        self.tested += report.tested;
        self.inconclusive += report.inconclusive;
        self.workers.push(report);
    }

    /// Get the average rate of candidates tested per second
    pub fn candidates_per_second(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.tested as f64 / secs
        }
    }
}
