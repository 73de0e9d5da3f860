//! Parallel search coordinator that manages worker threads.

use crate::error::SearchError;
use crate::oracle::Oracle;
use crate::search::candidate::CandidateSpace;
use crate::search::config::SearchConfig;
use crate::search::parallel::channel::{WorkerMessage, create_channel};
use crate::search::parallel::monitor::ProgressMonitor;
use crate::search::parallel::partition::plan_partition;
use crate::search::parallel::progress::SearchProgress;
use crate::search::parallel::worker::{Worker, WorkerContext};
use crate::search::render::CandidateRenderer;
use crate::search::result::{FoundCandidate, SearchResult, SearchStatistics};
use log::{debug, error, info};
use std::io;
use std::sync::Arc;
use std::time::Instant;

/// Run an exhaustive search of `config`'s candidate space.
///
/// Configuration problems are returned before any thread starts. Once the
/// workers are running, per-candidate failures are only logged and the call
/// always returns the outcome of the run.
pub fn run_parallel_search(
    config: &SearchConfig,
    oracle: Arc<dyn Oracle>,
    renderer: Arc<dyn CandidateRenderer>,
) -> Result<SearchResult, SearchError> {
    config.validate()?;
    let space = Arc::new(CandidateSpace::new(config.vocabulary.clone(), config.length)?);
    let total = space.size();
    let ranges = plan_partition(total, config.workers)?;

    info!(
        "k-permutations of n: n!/(n-k)!, n={}, k={}, k-n-permutations:{}",
        space.n(),
        space.k(),
        total
    );

    let start_time = Instant::now();
    let progress = Arc::new(SearchProgress::new(total));

    // Start the monitor before any worker so the first tick sees zero progress
    let monitor_handle = {
        let mut monitor = ProgressMonitor::new(Arc::clone(&progress), config.poll_interval);
        let show_progress = config.show_progress;
        std::thread::spawn(move || {
            if show_progress {
                monitor.run(&mut io::stdout())
            } else {
                monitor.run(&mut io::sink())
            }
        })
    };

    let (tx, rx) = create_channel();
    let mut worker_handles = Vec::with_capacity(ranges.len());

    for (worker_id, range) in ranges.into_iter().enumerate() {
        // Later workers still start after a match; they observe the flag and exit
        let delay = config.stagger.delay_before(worker_id);
        if !delay.is_zero() && !progress.is_terminated() {
            std::thread::sleep(delay);
        }
        if range.is_empty() {
            debug!("worker {} has an empty range and will exit at once", worker_id);
        } else {
            debug!(
                "spawning worker {} for {} (planned offset {:?})",
                worker_id,
                range,
                config.stagger.start_offset(worker_id)
            );
        }

        let space = Arc::clone(&space);
        let progress = Arc::clone(&progress);
        let oracle = Arc::clone(&oracle);
        let renderer = Arc::clone(&renderer);
        let tx = tx.clone();
        let batch_size = config.batch_size;

        worker_handles.push(std::thread::spawn(move || {
            let ctx = WorkerContext {
                space: &space,
                progress: &progress,
                oracle: oracle.as_ref(),
                renderer: renderer.as_ref(),
                batch_size,
            };
            Worker::new(worker_id, range, ctx).run(&tx)
        }));
    }
    drop(tx);

    // Wait for all workers to finish
    let mut statistics = SearchStatistics {
        total: progress.total(),
        ..Default::default()
    };
    for (worker_id, handle) in worker_handles.into_iter().enumerate() {
        if handle.join().is_err() {
            error!("worker {} panicked; its remaining range was not searched", worker_id);
            statistics.failed_workers += 1;
        }
    }

    progress.close();
    match monitor_handle.join() {
        Ok(exit) => debug!("monitor stopped: {:?}", exit),
        Err(_) => error!("progress monitor panicked"),
    }

    let mut found = None;
    for message in rx.try_iter() {
        match message {
            WorkerMessage::Found {
                worker_id,
                index,
                candidate,
                authoritative,
            } => {
                if authoritative {
                    found = Some(FoundCandidate {
                        worker_id,
                        index,
                        candidate,
                    });
                } else {
                    info!(
                        "ignoring additional match from worker {} at index {}",
                        worker_id, index
                    );
                }
            }
            WorkerMessage::Finished { report } => statistics.record(report),
        }
    }
    statistics.workers.sort_by_key(|r| r.worker_id);

    statistics.processed = progress.processed();
    statistics.terminated = progress.is_terminated();
    statistics.elapsed_time = start_time.elapsed();

    Ok(SearchResult { found, statistics })
}
