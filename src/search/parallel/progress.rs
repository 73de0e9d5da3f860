//! Shared progress and termination state for a search run.
//!
//! This is the only mutable state shared between workers, the monitor and
//! the coordinator. Every field is an atomic, so no lock is ever held while
//! a worker waits on the oracle.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// Concurrency-safe counters for one run.
#[derive(Debug)]
pub struct SearchProgress {
    processed: AtomicU64,
    total: u64,
    terminate: AtomicBool,
    active_workers: AtomicUsize,
    /// Set by the coordinator once every worker has been joined.
    closed: AtomicBool,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub processed: u64,
    pub total: u64,
    pub active_workers: usize,
    pub terminated: bool,
}

impl SearchProgress {
    /// Create state for a space of `total` candidates.
    pub fn new(total: u64) -> Self {
        Self {
            processed: AtomicU64::new(0),
            total,
            terminate: AtomicBool::new(false),
            active_workers: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Add `n` tested candidates.
    pub fn increment_processed(&self, n: u64) {
        if n == 0 {
            return;
        }
        let before = self.processed.fetch_add(n, Ordering::SeqCst);
        debug_assert!(
            before + n <= self.total,
            "processed {} exceeds total {}",
            before + n,
            self.total
        );
    }

    /// Raise the terminate flag. Returns true only for the call that raised it.
    pub fn mark_terminated(&self) -> bool {
        !self.terminate.swap(true, Ordering::SeqCst)
    }

    /// Check if workers should stop.
    pub fn is_terminated(&self) -> bool {
        self.terminate.load(Ordering::SeqCst)
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn active_worker_count(&self) -> usize {
        self.active_workers.load(Ordering::SeqCst)
    }

    /// Register a running worker. The returned guard unregisters it on drop.
    pub fn worker_started(&self) -> ActiveWorker<'_> {
        self.active_workers.fetch_add(1, Ordering::SeqCst);
        ActiveWorker { progress: self }
    }

    fn worker_finished(&self) {
        // Saturating so a stray extra release can never wrap the count
        let _ = self
            .active_workers
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Mark the run as over; the monitor stops on its next tick.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            processed: self.processed(),
            total: self.total,
            active_workers: self.active_worker_count(),
            terminated: self.is_terminated(),
        }
    }
}

/// Registration of one running worker; released on drop, including unwinding.
#[derive(Debug)]
pub struct ActiveWorker<'a> {
    progress: &'a SearchProgress,
}

impl Drop for ActiveWorker<'_> {
    fn drop(&mut self) {
        self.progress.worker_finished();
    }
}

/// Worker-local tally that reports to [`SearchProgress`] in batches.
///
/// Anything still pending is flushed when the batch is dropped, so every exit
/// path of a worker reports its full count.
#[derive(Debug)]
pub struct ProgressBatch<'a> {
    progress: &'a SearchProgress,
    batch_size: u64,
    pending: u64,
}

impl<'a> ProgressBatch<'a> {
    pub fn new(progress: &'a SearchProgress, batch_size: u64) -> Self {
        Self {
            progress,
            batch_size: batch_size.max(1),
            pending: 0,
        }
    }

    /// Count one tested candidate, reporting once a full batch accumulates.
    pub fn record(&mut self) {
        self.pending += 1;
        if self.pending >= self.batch_size {
            self.flush();
        }
    }

    /// Report whatever is pending.
    pub fn flush(&mut self) {
        self.progress.increment_processed(self.pending);
        self.pending = 0;
    }
}

impl Drop for ProgressBatch<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_terminate_is_write_once() {
        let progress = SearchProgress::new(10);

        assert!(!progress.is_terminated());
        assert!(progress.mark_terminated());
        assert!(progress.is_terminated());

        // Later calls are idempotent and not authoritative
        assert!(!progress.mark_terminated());
        assert!(progress.is_terminated());
    }

    #[test]
    fn test_concurrent_increments_not_lost() {
        let progress = Arc::new(SearchProgress::new(8 * 10_000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let progress = Arc::clone(&progress);
                std::thread::spawn(move || {
                    for _ in 0..10_000 {
                        progress.increment_processed(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(progress.processed(), 80_000);
        assert_eq!(progress.processed(), progress.total());
    }

    #[test]
    fn test_only_one_thread_wins_termination() {
        let progress = Arc::new(SearchProgress::new(1));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let progress = Arc::clone(&progress);
                std::thread::spawn(move || progress.mark_terminated())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();

        assert_eq!(winners, 1);
    }

    #[test]
    fn test_active_worker_guard() {
        let progress = SearchProgress::new(0);
        assert_eq!(progress.active_worker_count(), 0);

        let first = progress.worker_started();
        let second = progress.worker_started();
        assert_eq!(progress.active_worker_count(), 2);

        drop(first);
        assert_eq!(progress.active_worker_count(), 1);
        drop(second);
        assert_eq!(progress.active_worker_count(), 0);

        // Never goes below zero
        progress.worker_finished();
        assert_eq!(progress.active_worker_count(), 0);
    }

    #[test]
    fn test_guard_released_on_panic() {
        let progress = Arc::new(SearchProgress::new(0));
        let shared = Arc::clone(&progress);

        let result = std::thread::spawn(move || {
            let _active = shared.worker_started();
            panic!("worker blew up");
        })
        .join();

        assert!(result.is_err());
        assert_eq!(progress.active_worker_count(), 0);
    }

    #[test]
    fn test_batch_reports_every_batch_size() {
        let progress = SearchProgress::new(100);
        let mut batch = ProgressBatch::new(&progress, 10);

        for _ in 0..9 {
            batch.record();
        }
        assert_eq!(progress.processed(), 0);

        batch.record();
        assert_eq!(progress.processed(), 10);

        for _ in 0..3 {
            batch.record();
        }
        drop(batch);
        assert_eq!(progress.processed(), 13);
    }

    #[test]
    fn test_snapshot() {
        let progress = SearchProgress::new(42);
        progress.increment_processed(7);
        let _active = progress.worker_started();

        assert_eq!(
            progress.snapshot(),
            ProgressSnapshot {
                processed: 7,
                total: 42,
                active_workers: 1,
                terminated: false,
            }
        );
        assert!(!progress.is_closed());
        progress.close();
        assert!(progress.is_closed());
    }
}
