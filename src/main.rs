use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

mod error;
mod oracle;
mod search;

use error::SearchError;
use oracle::{CommandOracle, Oracle, check_target};
use search::config::{DEFAULT_BATCH_SIZE, load_wordlist};
use search::parallel::plan_partition;
use search::{CandidateSpace, RenderRule, SearchConfig, SearchResult, SearchStatistics, run_parallel_search};

/// Process exit status when the oracle accepted a candidate
const EXIT_FOUND: i32 = 0;
/// Process exit status when the whole space was tested without a match
const EXIT_NOT_FOUND: i32 = 1;
/// Process exit status for configuration and startup errors
const EXIT_ERROR: i32 = 2;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "luksperm")]
#[command(about = "luksperm - k-permutation passphrase search against a LUKS header")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// CLI rendering rule selection
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum CliRule {
    /// Tokens joined with spaces
    Plain,
    /// Capitalize the first token
    #[default]
    CapitalizeFirst,
    /// Capitalize the first letter of the first token and the last letter of the last token
    CapitalizeEnds,
    /// Capitalize the token at --capitalize-index and prepend --prefix
    CapitalizeAt,
}

/// Vocabulary and permutation shape shared by all subcommands
#[derive(clap::Args)]
struct SpaceArgs {
    /// Comma-separated tokens
    #[arg(long, value_delimiter = ',')]
    words: Vec<String>,
    /// File with one token per line (appended after --words)
    #[arg(long)]
    wordlist: Option<PathBuf>,
    /// Number of tokens per passphrase
    #[arg(long, short = 'k')]
    length: usize,
    /// Sort the vocabulary before enumerating
    #[arg(long)]
    sort: bool,
    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(long, short = 'j')]
    workers: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the size of the candidate space and the per-worker ranges
    Plan {
        #[command(flatten)]
        space: SpaceArgs,
    },
    /// Test every candidate against the header until one matches
    Search {
        #[command(flatten)]
        space: SpaceArgs,
        /// LUKS header (or other target) the oracle verifies against
        #[arg(long)]
        header: PathBuf,

        // --- Candidate rendering ---
        /// How a permutation is turned into a passphrase
        #[arg(long, value_enum, default_value = "capitalize-first")]
        rule: CliRule,
        /// Token to capitalize for --rule capitalize-at (defaults to k-2)
        #[arg(long)]
        capitalize_index: Option<usize>,
        /// Word prepended to every passphrase for --rule capitalize-at
        #[arg(long)]
        prefix: Option<String>,

        // --- Tunables ---
        /// Candidates tested before each progress report
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: u64,
        /// Status line refresh interval in milliseconds
        #[arg(long, default_value = "4000")]
        poll_interval_ms: u64,
        /// Delay between worker starts in milliseconds
        #[arg(long, default_value = "2700")]
        stagger_ms: u64,
        /// Do not print the live status line
        #[arg(long, short)]
        quiet: bool,

        // --- Oracle ---
        /// Verification program replacing `cryptsetup luksOpen --test-passphrase <header>`
        #[arg(long)]
        oracle_program: Option<String>,
        /// Argument for --oracle-program (repeatable)
        #[arg(long, allow_hyphen_values = true)]
        oracle_arg: Vec<String>,
    },
}

/// Options for a search run beyond the candidate space
struct SearchOptions {
    header: PathBuf,
    rule: RenderRule,
    batch_size: u64,
    poll_interval: Duration,
    stagger: Duration,
    quiet: bool,
    oracle_program: Option<String>,
    oracle_args: Vec<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

// --- Configuration ---

fn build_config(space: &SpaceArgs) -> Result<SearchConfig, SearchError> {
    let mut vocabulary = space.words.clone();
    if let Some(path) = &space.wordlist {
        vocabulary.extend(load_wordlist(path)?);
    }

    let mut config = SearchConfig::new(vocabulary, space.length);
    if let Some(workers) = space.workers {
        config = config.with_workers(workers);
    }
    if space.sort {
        config = config.sorted();
    }
    config.validate()?;
    Ok(config)
}

fn render_rule(rule: CliRule, length: usize, index: Option<usize>, prefix: Option<String>) -> RenderRule {
    match rule {
        CliRule::Plain => RenderRule::Plain,
        CliRule::CapitalizeFirst => RenderRule::CapitalizeFirst,
        CliRule::CapitalizeEnds => RenderRule::CapitalizeEnds,
        CliRule::CapitalizeAt => RenderRule::CapitalizeAt {
            index: index.unwrap_or(length.saturating_sub(2)),
            prefix,
        },
    }
}

fn build_oracle(options: &SearchOptions) -> Arc<dyn Oracle> {
    match &options.oracle_program {
        Some(program) => Arc::new(CommandOracle::new(program).args(&options.oracle_args)),
        None => Arc::new(CommandOracle::cryptsetup(&options.header)),
    }
}

// --- Subcommands ---

fn print_space_summary(space: &CandidateSpace) {
    println!(
        "\nk-permutations of n: n!/(n-k)!, n={}, k={}, k-n-permutations:{}",
        space.n(),
        space.k(),
        space.size()
    );
}

fn plan(space_args: &SpaceArgs) -> Result<(), SearchError> {
    let config = build_config(space_args)?;
    let space = CandidateSpace::new(config.vocabulary.clone(), config.length)?;
    print_space_summary(&space);

    let ranges = plan_partition(space.size(), config.workers)?;
    println!("Workers: {}", ranges.len());
    for (worker_id, range) in ranges.iter().enumerate() {
        let first = space
            .at(range.first)
            .map(|t| t.join(" "))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  worker {:>3}: {} {} candidates, starting at \"{}\"",
            worker_id,
            range,
            range.len(),
            first
        );
    }
    Ok(())
}

fn search(space_args: &SpaceArgs, options: &SearchOptions) -> Result<SearchResult, SearchError> {
    let config = build_config(space_args)?
        .with_batch_size(options.batch_size)
        .with_poll_interval(options.poll_interval)
        .with_stagger(options.stagger)
        .with_progress(!options.quiet);
    check_target(&options.header)?;

    let space = CandidateSpace::new(config.vocabulary.clone(), config.length)?;
    print_space_summary(&space);
    info!(
        "Searching with {} workers, rule {}, batch size {}",
        config.workers, options.rule, config.batch_size
    );

    let oracle = build_oracle(options);
    run_parallel_search(&config, oracle, Arc::new(options.rule.clone()))
}

fn print_search_statistics(stats: &SearchStatistics, header: &Path) {
    println!("\nSearch Statistics:");
    println!("  Target: {}", header.display());
    println!("  Candidates tested: {}/{}", stats.processed, stats.total);
    println!("  Inconclusive verdicts: {}", stats.inconclusive);
    println!("  Elapsed time: {:.2?}", stats.elapsed_time);
    println!("  Rate: {:.2} /s", stats.candidates_per_second());
    if stats.terminated {
        println!("  Stopped early: yes");
    }
    if stats.failed_workers > 0 {
        println!("  Failed workers: {}", stats.failed_workers);
    }
    for report in &stats.workers {
        println!(
            "    worker {:>3} {}: tested {}, inconclusive {}, {:?}",
            report.worker_id, report.range, report.tested, report.inconclusive, report.outcome
        );
    }
}

// --- Main Function ---
fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Plan { space } => {
            if let Err(e) = plan(&space) {
                eprintln!("Error: {}", e);
                std::process::exit(EXIT_ERROR);
            }
        }
        Commands::Search {
            space,
            header,
            rule,
            capitalize_index,
            prefix,
            batch_size,
            poll_interval_ms,
            stagger_ms,
            quiet,
            oracle_program,
            oracle_arg,
        } => {
            let options = SearchOptions {
                header,
                rule: render_rule(rule, space.length, capitalize_index, prefix),
                batch_size,
                poll_interval: Duration::from_millis(poll_interval_ms),
                stagger: Duration::from_millis(stagger_ms),
                quiet,
                oracle_program,
                oracle_args: oracle_arg,
            };

            match search(&space, &options) {
                Ok(result) => {
                    match &result.found {
                        Some(found) => {
                            println!("\n\nFound: {}\n", found.candidate);
                            info!("matched index {} on worker {}", found.index, found.worker_id);
                        }
                        None => println!("\n\nNot found: no candidate matched."),
                    }
                    print_search_statistics(&result.statistics, &options.header);
                    println!("\nWorkers joined. Exiting.");

                    let code = if result.is_found() {
                        EXIT_FOUND
                    } else {
                        EXIT_NOT_FOUND
                    };
                    std::process::exit(code);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(EXIT_ERROR);
                }
            }
        }
    }
}
