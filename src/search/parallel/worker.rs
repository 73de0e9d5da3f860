//! Search worker: tests one contiguous range of the candidate space.

use crate::oracle::{Oracle, Verdict};
use crate::search::candidate::CandidateSpace;
use crate::search::parallel::channel::WorkerMessage;
use crate::search::parallel::partition::IndexRange;
use crate::search::parallel::progress::{ProgressBatch, SearchProgress};
use crate::search::render::CandidateRenderer;
use crate::search::result::{WorkerOutcome, WorkerReport};
use crossbeam_channel::Sender;
use log::{debug, info, warn};

/// Read-only collaborators shared by every worker of a run.
#[derive(Clone, Copy)]
pub struct WorkerContext<'a> {
    pub space: &'a CandidateSpace,
    pub progress: &'a SearchProgress,
    pub oracle: &'a dyn Oracle,
    pub renderer: &'a dyn CandidateRenderer,
    pub batch_size: u64,
}

/// Lifecycle of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    /// Left the loop on its own: range exhausted or a match found.
    Finished,
    /// Stopped because the terminate flag was raised elsewhere.
    Terminated,
}

pub struct Worker<'a> {
    id: usize,
    range: IndexRange,
    ctx: WorkerContext<'a>,
    state: WorkerState,
}

impl<'a> Worker<'a> {
    pub fn new(id: usize, range: IndexRange, ctx: WorkerContext<'a>) -> Self {
        Self {
            id,
            range,
            ctx,
            state: WorkerState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Test every candidate in the range in increasing index order.
    ///
    /// Stops early when the terminate flag is seen before a candidate or when
    /// the oracle accepts one. Progress is reported to the shared counter every
    /// `batch_size` candidates and once more on exit.
    pub fn run(&mut self, tx: &Sender<WorkerMessage>) -> WorkerReport {
        let progress = self.ctx.progress;
        let active = progress.worker_started();
        self.state = WorkerState::Running;
        debug!(
            "worker {} started on {} ({} candidates)",
            self.id,
            self.range,
            self.range.len()
        );

        let mut report = WorkerReport {
            worker_id: self.id,
            range: self.range,
            ..Default::default()
        };
        let mut batch = ProgressBatch::new(progress, self.ctx.batch_size);

        for (index, tokens) in self.ctx.space.iter_range(self.range) {
            if progress.is_terminated() {
                report.outcome = WorkerOutcome::Terminated;
                break;
            }

            let candidate = self.ctx.renderer.render(&tokens);
            let verdict = self.ctx.oracle.verify(&candidate);
            report.tested += 1;
            batch.record();

            match verdict {
                Verdict::Match => {
                    batch.flush();
                    let authoritative = progress.mark_terminated();
                    if authoritative {
                        info!("worker {} found match at index {}: {}", self.id, index, candidate);
                    } else {
                        info!(
                            "worker {} also matched index {} after termination: {}",
                            self.id, index, candidate
                        );
                    }
                    report.outcome = WorkerOutcome::Found;
                    let _ = tx.send(WorkerMessage::Found {
                        worker_id: self.id,
                        index,
                        candidate,
                        authoritative,
                    });
                    break;
                }
                Verdict::NoMatch => {}
                Verdict::Inconclusive(reason) => {
                    report.inconclusive += 1;
                    warn!(
                        "worker {}: inconclusive verdict ({}) at index {}, command: {}",
                        self.id,
                        reason,
                        index,
                        self.ctx.oracle.describe(&candidate)
                    );
                }
            }
        }

        // Report the tail before deregistering
        drop(batch);
        drop(active);

        self.state = match report.outcome {
            WorkerOutcome::Terminated => WorkerState::Terminated,
            WorkerOutcome::Exhausted | WorkerOutcome::Found => WorkerState::Finished,
        };
        debug!(
            "worker {} exiting ({:?}): tested {}, inconclusive {}",
            self.id, self.state, report.tested, report.inconclusive
        );

        let _ = tx.send(WorkerMessage::Finished {
            report: report.clone(),
        });
        report
    }
}
