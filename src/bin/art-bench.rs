//! Compare the adaptive radix tree against the other index structures.
//!
//! ```bash
//! cargo run --release --features cli --bin art-bench -- -b search -s 1 -i 5 --seed 42
//! cargo run --release --features cli --bin art-bench -- -b range-search -s 2 -d --only art,sorted-list,b-tree
//! cargo run --release --features cli --bin art-bench -- -b insert -s 1 --memory --skip trie
//! ```

use std::process::ExitCode;

use art32::bench::config::DEFAULT_ITERATIONS;
use art32::bench::report::{self, format_memory};
use art32::bench::{BenchConfig, BenchmarkKind, KeyDistribution, Metric, Runner, SizeClass};
use art32::BenchError;
use clap::{Parser, ValueEnum};
use thiserror::Error;

#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Bench(#[from] BenchError),
    #[error("jemalloc statistics unavailable: {0}")]
    AllocatorStats(tikv_jemalloc_ctl::Error),
}

/// Live bytes allocated through jemalloc, refreshed by advancing the epoch.
fn read_allocated() -> Result<usize, tikv_jemalloc_ctl::Error> {
    tikv_jemalloc_ctl::epoch::advance()?;
    tikv_jemalloc_ctl::stats::allocated::read()
}

/// Memory probe handed to the runner. `run` checks once that the statistics
/// are readable before any probe call.
fn allocated_bytes() -> usize {
    read_allocated().unwrap_or(0)
}

/// Peak resident set size of this process in bytes.
#[cfg(unix)]
fn peak_rss_bytes() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage only writes into the struct we pass.
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: zero-initialised and filled in by a successful getrusage.
    let usage = unsafe { usage.assume_init() };
    let max = u64::try_from(usage.ru_maxrss).ok()?;
    // Linux reports kilobytes, macOS bytes.
    Some(if cfg!(target_os = "macos") { max } else { max * 1024 })
}

#[cfg(not(unix))]
fn peak_rss_bytes() -> Option<u64> {
    None
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Benchmark {
    Insert,
    Search,
    #[value(alias = "range_search")]
    RangeSearch,
}

impl From<Benchmark> for BenchmarkKind {
    fn from(b: Benchmark) -> Self {
        match b {
            Benchmark::Insert => BenchmarkKind::Insert,
            Benchmark::Search => BenchmarkKind::Search,
            Benchmark::RangeSearch => BenchmarkKind::RangeSearch,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "art-bench")]
#[command(about = "Benchmark an adaptive radix tree against other u32 index structures")]
struct Args {
    /// Operation to measure
    #[arg(short, long, value_enum)]
    benchmark: Benchmark,

    /// Workload size: 1 = 65 thousand, 2 = 16 million, 3 = 256 million keys
    #[arg(short, long)]
    size: u8,

    /// Explicit key count, overriding the size class
    #[arg(short = 'n', long)]
    keys: Option<usize>,

    /// Iterations per structure (1 to 10000)
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Draw keys from 0..n instead of the whole u32 range
    #[arg(short, long)]
    dense: bool,

    /// Only run these structures (comma-separated)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Skip these structures (comma-separated)
    #[arg(long, value_delimiter = ',')]
    skip: Vec<String>,

    /// Seed of the first iteration; later iterations count up from it
    #[arg(long)]
    seed: Option<u64>,

    /// Check every structure's answers against the sorted list
    #[arg(long)]
    verify: bool,

    /// Report allocated bytes instead of elapsed time
    #[arg(long)]
    memory: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose {
        "art32=debug,art_bench=debug"
    } else {
        "art32=info,art_bench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(args: &Args) -> Result<BenchConfig, BenchError> {
    let mut config = BenchConfig::new(args.benchmark.into(), SizeClass::from_level(args.size)?);
    config.key_count = args.keys;
    config.iterations = args.iterations;
    config.distribution = if args.dense {
        KeyDistribution::Dense
    } else {
        KeyDistribution::Sparse
    };
    config.seed = args.seed;
    config.structures = BenchConfig::select_structures(&args.only, &args.skip)?;
    config.verify = args.verify;
    config.metric = if args.memory { Metric::Memory } else { Metric::Time };
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = build_config(args)?;
    let header = format!(
        "'{}' benchmark with size '{}' ({} keys), '{}' iterations and '{}' keys",
        config.kind,
        config.size.level(),
        config.key_count(),
        config.iterations,
        config.distribution.name()
    );
    println!("Starting {header}.");

    let mut runner = Runner::new(&config);
    if args.memory {
        read_allocated().map_err(CliError::AllocatorStats)?;
        runner = runner.with_memory_probe(allocated_bytes);
    }
    let results = runner.run()?;

    println!("Finished {header} in {:.1} minutes.", results.elapsed.as_secs_f64() / 60.0);
    println!();
    print!("{}", report::render(&results));
    if let Some(rss) = peak_rss_bytes() {
        println!();
        println!("Peak resident set size: {}", format_memory(rss));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test only: the allocator statistics are process-wide, so parallel
    // tests would disturb each other's readings.
    #[test]
    fn test_allocated_bytes_tracks_live_heap() {
        let before = read_allocated().unwrap();
        let block = vec![1u8; 8 << 20];
        let during = allocated_bytes();
        assert!(during >= before + (8 << 20) / 2, "before={before} during={during}");
        drop(std::hint::black_box(block));
        let after = allocated_bytes();
        assert!(after < during, "during={during} after={after}");

        let args = Args::parse_from([
            "art-bench", "-b", "insert", "-s", "1", "-n", "5000", "-i", "1", "--seed", "3", "--memory",
            "--only", "art,sorted-list",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.metric, Metric::Memory);
        let results = Runner::new(&config).with_memory_probe(allocated_bytes).run().unwrap();
        assert_eq!(results.measurements.len(), 2);
        for m in &results.measurements {
            assert!(m.samples[0] > 0.0, "{} reported no memory", m.structure);
        }
    }
}
