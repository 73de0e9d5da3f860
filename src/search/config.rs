//! Configuration for a search run

use crate::error::SearchError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Candidates a worker tests before reporting them to the shared counter
pub const DEFAULT_BATCH_SIZE: u64 = 10;
/// How often the progress monitor refreshes the status line
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);
/// Delay between consecutive worker starts
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(2700);

/// Configuration for one exhaustive search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Ordered, distinct tokens the passphrases are built from
    pub vocabulary: Vec<String>,
    /// Number of tokens per candidate
    pub length: usize,
    /// Number of worker threads to spawn
    pub workers: usize,
    /// Progress reporting batch size per worker
    pub batch_size: u64,
    /// Monitor refresh cadence
    pub poll_interval: Duration,
    /// Worker startup stagger policy
    pub stagger: StaggerPolicy,
    /// Whether to render the live status line
    pub show_progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vec::new(),
            length: 1,
            workers: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            stagger: StaggerPolicy::default(),
            show_progress: true,
        }
    }
}

impl SearchConfig {
    /// Create a new config for `length`-permutations of `vocabulary`
    pub fn new(vocabulary: Vec<String>, length: usize) -> Self {
        Self {
            vocabulary,
            length,
            ..Default::default()
        }
    }

    /// Set the number of worker threads
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the progress reporting batch size
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the monitor refresh cadence
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the delay between worker starts
    pub fn with_stagger(mut self, delay: Duration) -> Self {
        self.stagger = StaggerPolicy::new(delay);
        self
    }

    /// Enable or disable the live status line
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Sort the vocabulary so enumeration follows the tokens' natural order
    pub fn sorted(mut self) -> Self {
        self.vocabulary.sort();
        self
    }

    /// Reject configurations that cannot be searched
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.vocabulary.is_empty() {
            return Err(SearchError::EmptyVocabulary);
        }

        let mut seen = HashSet::with_capacity(self.vocabulary.len());
        if let Some(dup) = self.vocabulary.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(SearchError::DuplicateToken(dup.clone()));
        }

        let n = self.vocabulary.len();
        if self.length == 0 || self.length > n {
            return Err(SearchError::InvalidLength { k: self.length, n });
        }
        if self.workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        if self.batch_size == 0 {
            return Err(SearchError::ZeroBatchSize);
        }
        Ok(())
    }
}

/// Fixed-delay staggered start, independent of how workers are spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggerPolicy {
    pub delay: Duration,
}

impl Default for StaggerPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STAGGER)
    }
}

impl StaggerPolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Wait before starting worker `worker_id`; the first worker starts immediately
    pub fn delay_before(&self, worker_id: usize) -> Duration {
        if worker_id == 0 {
            Duration::ZERO
        } else {
            self.delay
        }
    }

    /// Offset of worker `worker_id`'s start from the first worker's
    pub fn start_offset(&self, worker_id: usize) -> Duration {
        self.delay.saturating_mul(u32::try_from(worker_id).unwrap_or(u32::MAX))
    }
}

/// Read a word list: one token per line, blank lines and `#` comments skipped
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, SearchError> {
    let text = fs::read_to_string(path).map_err(|source| SearchError::Wordlist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_wordlist(&text))
}

fn parse_wordlist(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.poll_interval, Duration::from_secs(4));
        assert_eq!(config.stagger.delay, Duration::from_millis(2700));
        assert!(config.show_progress);
    }

    #[test]
    fn test_config_builder() {
        let config = SearchConfig::new(words(&["b", "a", "c"]), 2)
            .with_workers(4)
            .with_batch_size(3)
            .with_poll_interval(Duration::from_millis(50))
            .with_stagger(Duration::ZERO)
            .with_progress(false)
            .sorted();

        assert_eq!(config.vocabulary, words(&["a", "b", "c"]));
        assert_eq!(config.length, 2);
        assert_eq!(config.workers, 4);
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.stagger, StaggerPolicy::new(Duration::ZERO));
        assert!(!config.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        assert!(matches!(
            SearchConfig::new(Vec::new(), 1).validate(),
            Err(SearchError::EmptyVocabulary)
        ));
        assert!(matches!(
            SearchConfig::new(words(&["a", "b"]), 0).validate(),
            Err(SearchError::InvalidLength { k: 0, n: 2 })
        ));
        assert!(matches!(
            SearchConfig::new(words(&["a", "b"]), 3).validate(),
            Err(SearchError::InvalidLength { k: 3, n: 2 })
        ));
        assert!(matches!(
            SearchConfig::new(words(&["a", "b"]), 1).with_workers(0).validate(),
            Err(SearchError::NoWorkers)
        ));
        assert!(matches!(
            SearchConfig::new(words(&["a", "b"]), 1).with_batch_size(0).validate(),
            Err(SearchError::ZeroBatchSize)
        ));
        assert!(matches!(
            SearchConfig::new(words(&["a", "b", "b"]), 1).validate(),
            Err(SearchError::DuplicateToken(t)) if t == "b"
        ));
    }

    #[test]
    fn test_stagger_policy() {
        let policy = StaggerPolicy::new(Duration::from_millis(2700));
        assert_eq!(policy.delay_before(0), Duration::ZERO);
        assert_eq!(policy.delay_before(3), Duration::from_millis(2700));
        assert_eq!(policy.start_offset(4), Duration::from_millis(10_800));
    }

    #[test]
    fn test_parse_wordlist() {
        let text = "# colours\nred\n  green  \n\nblue\n# end\n";
        assert_eq!(parse_wordlist(text), words(&["red", "green", "blue"]));
    }

    #[test]
    fn test_load_wordlist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tree\nlemon\n\n# skip\ngreen").unwrap();

        let tokens = load_wordlist(file.path()).unwrap();
        assert_eq!(tokens, words(&["tree", "lemon", "green"]));

        let missing = load_wordlist(Path::new("/nonexistent/words.txt"));
        assert!(matches!(missing, Err(SearchError::Wordlist { .. })));
    }
}
