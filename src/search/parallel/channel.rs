//! Outcome reporting from workers to the coordinator.
//!
//! Progress counting goes through [`SearchProgress`](super::progress::SearchProgress);
//! this channel only carries the rare, per-worker events the coordinator needs
//! to build the final result.

use crate::search::result::WorkerReport;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Message sent from workers to the coordinator.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// The oracle accepted a candidate.
    Found {
        worker_id: usize,
        index: u64,
        candidate: String,
        /// True if this worker's report raised the terminate flag.
        authoritative: bool,
    },
    /// Worker has left its loop.
    Finished { report: WorkerReport },
}

/// Create the worker-to-coordinator channel.
///
/// Unbounded so a worker never blocks on reporting.
pub fn create_channel() -> (Sender<WorkerMessage>, Receiver<WorkerMessage>) {
    unbounded()
}
