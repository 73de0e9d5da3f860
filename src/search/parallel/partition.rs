//! Static partitioning of the candidate space into per-worker ranges.

use crate::error::SearchError;
use std::fmt;

/// Half-open index interval `[first, last)` into the candidate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRange {
    pub first: u64,
    pub last: u64,
}

impl IndexRange {
    pub fn new(first: u64, last: u64) -> Self {
        debug_assert!(first <= last, "inverted range {}..{}", first, last);
        Self { first, last }
    }

    /// Number of indices covered.
    pub fn len(&self) -> u64 {
        self.last.saturating_sub(self.first)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.first, self.last)
    }
}

/// Split `[0, size)` into `workers` contiguous ranges.
///
/// Every range gets `size / workers` indices and the first `size % workers`
/// ranges get one more, so lengths differ by at most one. With more workers
/// than indices the trailing ranges are empty.
pub fn plan_partition(size: u64, workers: usize) -> Result<Vec<IndexRange>, SearchError> {
    if workers == 0 {
        return Err(SearchError::NoWorkers);
    }

    let procs = workers as u64;
    let chunk = size / procs;
    let mut rem = size % procs;

    let mut ranges = Vec::with_capacity(workers);
    let mut first = 0;
    for _ in 0..workers {
        let mut len = chunk;
        if rem > 0 {
            len += 1;
            rem -= 1;
        }
        ranges.push(IndexRange::new(first, first + len));
        first += len;
    }

    debug_assert_eq!(first, size);
    Ok(ranges)
}
