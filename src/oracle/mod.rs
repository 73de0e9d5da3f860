//! Pass/fail verification of candidate strings
//!
//! The search core only sees the tri-state [`Verdict`]. How a candidate is
//! actually judged (a cryptsetup invocation, a test stub) lives behind the
//! [`Oracle`] trait.

pub mod command;

pub use command::{CommandOracle, check_target};

use std::fmt;

/// Result of verifying one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The candidate is the secret
    Match,
    /// The candidate was checked and rejected
    NoMatch,
    /// Could not determine (unexpected exit status, failed to start, etc.)
    Inconclusive(InconclusiveReason),
}

/// Why a verdict was inconclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InconclusiveReason {
    /// The verifier exited with a status other than match/no-match
    ExitStatus(i32),
    /// The verifier was killed by a signal
    Signalled,
    /// The verifier could not be started
    SpawnFailed(String),
}

impl fmt::Display for InconclusiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InconclusiveReason::ExitStatus(code) => write!(f, "rc:{}", code),
            InconclusiveReason::Signalled => write!(f, "terminated by signal"),
            InconclusiveReason::SpawnFailed(msg) => write!(f, "failed to start: {}", msg),
        }
    }
}

/// Trait for black-box verifiers that judge one candidate at a time
///
/// Implementations are shared by every worker thread and may block for as
/// long as a verification takes.
pub trait Oracle: Send + Sync {
    /// Verify a single candidate
    fn verify(&self, candidate: &str) -> Verdict;

    /// Human-readable form of the invocation for `candidate`, used in diagnostics
    fn describe(&self, candidate: &str) -> String {
        format!("verify \"{}\"", candidate)
    }
}

impl<O: Oracle + ?Sized> Oracle for std::sync::Arc<O> {
    fn verify(&self, candidate: &str) -> Verdict {
        (**self).verify(candidate)
    }

    fn describe(&self, candidate: &str) -> String {
        (**self).describe(candidate)
    }
}
