//! Exhaustive passphrase search
//!
//! - `candidate`: the indexable k-permutation space
//! - `render`: turning a permutation into the string the oracle sees
//! - `config`: run configuration and startup stagger policy
//! - `parallel`: partitioning, workers, progress monitor and coordinator
//! - `result`: outcome and statistics of a run

pub mod candidate;
pub mod config;
pub mod parallel;
pub mod render;
pub mod result;

pub use candidate::CandidateSpace;
pub use config::SearchConfig;
pub use parallel::run_parallel_search;
pub use render::RenderRule;
pub use result::{SearchResult, SearchStatistics};
