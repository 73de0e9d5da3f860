//! Indexable k-permutation space over a token vocabulary
//!
//! Permutations are ordered lexicographically by vocabulary position, the
//! same order `itertools.permutations`-style generators produce. Element `i`
//! is decoded from `i` alone, so any worker can start anywhere in the space
//! without coordinating with the others.

use crate::error::SearchError;
use crate::search::parallel::partition::IndexRange;
use std::collections::HashSet;

/// The ordered, finite universe of candidates for one run.
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    tokens: Vec<String>,
    k: usize,
    size: u64,
}

impl CandidateSpace {
    /// Build the space of `k`-permutations of `tokens`.
    ///
    /// Fails on an empty vocabulary, duplicate tokens, `k` outside `1..=n`
    /// or a space larger than `u64::MAX`.
    pub fn new(tokens: Vec<String>, k: usize) -> Result<Self, SearchError> {
        if tokens.is_empty() {
            return Err(SearchError::EmptyVocabulary);
        }

        let mut seen = HashSet::with_capacity(tokens.len());
        for token in &tokens {
            if !seen.insert(token.as_str()) {
                return Err(SearchError::DuplicateToken(token.clone()));
            }
        }

        let n = tokens.len();
        if k == 0 || k > n {
            return Err(SearchError::InvalidLength { k, n });
        }

        let size = permutation_count(n, k).ok_or(SearchError::SpaceTooLarge { n, k })?;
        Ok(Self { tokens, k, size })
    }

    /// Total number of candidates, `n!/(n-k)!`.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Permutation length.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Vocabulary size.
    pub fn n(&self) -> usize {
        self.tokens.len()
    }

    /// Vocabulary positions of the permutation at `index`.
    pub fn positions_at(&self, index: u64) -> Option<Vec<usize>> {
        if index >= self.size {
            return None;
        }

        let n = self.n();
        let mut remaining: Vec<usize> = (0..n).collect();
        let mut positions = Vec::with_capacity(self.k);
        let mut rest = index;

        for slot in 0..self.k {
            // Each choice at `slot` heads a block of P(n-slot-1, k-slot-1) permutations.
            let block = permutation_count(n - slot - 1, self.k - slot - 1)?;
            let digit = (rest / block) as usize;
            rest %= block;
            positions.push(remaining.remove(digit));
        }

        Some(positions)
    }

    /// The token tuple at `index`, or `None` past the end of the space.
    pub fn at(&self, index: u64) -> Option<Vec<&str>> {
        self.positions_at(index).map(|p| self.resolve(&p))
    }

    /// Iterate `(index, tokens)` over `range` in increasing index order.
    pub fn iter_range(&self, range: IndexRange) -> Permutations<'_> {
        let last = range.last.min(self.size);
        let first = range.first.min(last);
        let state = self.positions_at(first).filter(|_| first < last).map(|positions| {
            let mut used = vec![false; self.n()];
            for &p in &positions {
                used[p] = true;
            }
            (positions, used)
        });

        Permutations {
            space: self,
            next_index: first,
            last,
            state,
        }
    }

    fn resolve(&self, positions: &[usize]) -> Vec<&str> {
        positions.iter().map(|&p| self.tokens[p].as_str()).collect()
    }
}

/// `n!/(n-k)!` in widened arithmetic; `None` if it overflows `u64`.
pub fn permutation_count(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let mut count: u128 = 1;
    for factor in (n - k + 1)..=n {
        count = count.checked_mul(factor as u128)?;
    }
    u64::try_from(count).ok()
}

/// Iterator over a contiguous slice of a [`CandidateSpace`].
///
/// Decodes the first element once and then steps with a next-partial-permutation
/// successor instead of decoding every index from scratch.
pub struct Permutations<'a> {
    space: &'a CandidateSpace,
    next_index: u64,
    last: u64,
    state: Option<(Vec<usize>, Vec<bool>)>,
}

impl<'a> Iterator for Permutations<'a> {
    type Item = (u64, Vec<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.last {
            return None;
        }
        let space = self.space;
        let (positions, used) = self.state.as_mut()?;
        let item = (self.next_index, space.resolve(positions));

        self.next_index += 1;
        if self.next_index < self.last && !advance(positions, used) {
            self.state = None;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.last - self.next_index).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// Step `positions` to its lexicographic successor among k-permutations of
/// `used.len()` items. Returns false when `positions` was the last one.
fn advance(positions: &mut [usize], used: &mut [bool]) -> bool {
    let n = used.len();
    for slot in (0..positions.len()).rev() {
        let current = positions[slot];
        used[current] = false;

        if let Some(bigger) = (current + 1..n).find(|&v| !used[v]) {
            positions[slot] = bigger;
            used[bigger] = true;

            let mut candidate = 0;
            for tail in positions.iter_mut().skip(slot + 1) {
                while used[candidate] {
                    candidate += 1;
                }
                *tail = candidate;
                used[candidate] = true;
            }
            return true;
        }
    }
    false
}
