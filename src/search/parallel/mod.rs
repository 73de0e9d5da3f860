//! Parallel exhaustive search over a statically partitioned candidate space.
//!
//! # Architecture
//!
//! - The **partition** planner splits `[0, size)` into one contiguous range per worker
//! - Each **worker** walks its range in order, asks the oracle about every
//!   candidate and stops early on a match or when the terminate flag is raised
//! - **Progress** is a set of atomics shared by every thread; workers report into
//!   it in batches and the **monitor** renders it as a live status line
//! - The **coordinator** starts the monitor, spawns the workers with a staggered
//!   start, joins everything and collects per-worker reports over a **channel**
//!
//! # Example
//!
//! ```ignore
//! use crate::search::{SearchConfig, RenderRule, run_parallel_search};
//!
//! let config = SearchConfig::new(words, 4)
//!     .with_workers(8)
//!     .with_stagger(Duration::from_millis(2700));
//!
//! let result = run_parallel_search(&config, oracle, Arc::new(RenderRule::CapitalizeFirst))?;
//! ```

pub mod channel;
pub mod coordinator;
pub mod monitor;
pub mod partition;
pub mod progress;
pub mod worker;

pub use coordinator::run_parallel_search;
pub use partition::plan_partition;
