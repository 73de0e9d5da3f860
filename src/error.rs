//! Errors raised while configuring and preparing a search run.
//!
//! Only setup problems live here. Anything that goes wrong while a single
//! candidate is being verified is reported as an inconclusive verdict and
//! never stops the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration or construction error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The vocabulary has no tokens.
    #[error("vocabulary is empty")]
    EmptyVocabulary,

    /// The same token appears more than once in the vocabulary.
    #[error("vocabulary contains duplicate token '{0}'")]
    DuplicateToken(String),

    /// Permutation length outside `1..=n`.
    #[error("permutation length k={k} must be between 1 and the vocabulary size {n}")]
    InvalidLength { k: usize, n: usize },

    /// Worker count of zero.
    #[error("at least one worker is required")]
    NoWorkers,

    /// Progress batch size of zero.
    #[error("progress batch size must be at least 1")]
    ZeroBatchSize,

    /// `n!/(n-k)!` does not fit into a 64-bit index.
    #[error("candidate space for n={n}, k={k} exceeds 2^64 permutations")]
    SpaceTooLarge { n: usize, k: usize },

    /// The word list file could not be read.
    #[error("cannot read word list {}: {source}", path.display())]
    Wordlist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The resource the oracle verifies against is missing or unreadable.
    #[error("target {} is not a readable file: {source}", path.display())]
    TargetUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchError::InvalidLength { k: 5, n: 4 }.to_string(),
            "permutation length k=5 must be between 1 and the vocabulary size 4"
        );
        assert_eq!(
            SearchError::DuplicateToken("red".to_string()).to_string(),
            "vocabulary contains duplicate token 'red'"
        );

        let err = SearchError::TargetUnavailable {
            path: PathBuf::from("./save-header"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().starts_with("target ./save-header"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
