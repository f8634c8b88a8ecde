//! Cache hierarchy simulator CLI.
//!
//! This binary replays an address trace through the I$ / D$ / L2$ model. It performs:
//! 1. **Configuration:** Builds the hierarchy from an optional JSON file, overridden by flags.
//! 2. **Replay:** Streams the trace from a file or stdin, one access per line.
//! 3. **Reporting:** Prints run totals and per-level statistics, optionally with a cache dump.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use cachesim_core::common::ConfigError;
use cachesim_core::config::{CacheConfig, HierarchyConfig};
use cachesim_core::sim::{RunSummary, SimError, Simulator, TraceReader};
use cachesim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Two-level cache hierarchy simulator",
    long_about = "Replay an address trace through split L1 instruction/data caches backed by a shared, optionally inclusive, L2.\n\nTrace lines are `I <hex addr>` (instruction fetch) or `D <hex addr>` (data access).\nLevels are given as <sets>:<assoc>:<hit_time>; a level with 0 sets or 0 ways is disabled.\n\nExamples:\n  cachesim --icache 512:2:2 --dcache 256:4:2 --l2cache 1024:8:10 trace.txt\n  cachesim --config hierarchy.json --inclusive --dump trace.txt\n  gunzip -c trace.gz | cachesim --l2cache 2048:16:12"
)]
struct Cli {
    /// Trace file to replay; reads stdin when omitted or `-`.
    trace: Option<PathBuf>,

    /// JSON hierarchy configuration; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// I$ geometry as <sets>:<assoc>:<hit_time>.
    #[arg(long, value_name = "S:A:H")]
    icache: Option<CacheConfig>,

    /// D$ geometry as <sets>:<assoc>:<hit_time>.
    #[arg(long, value_name = "S:A:H")]
    dcache: Option<CacheConfig>,

    /// L2$ geometry as <sets>:<assoc>:<hit_time>.
    #[arg(long, value_name = "S:A:H")]
    l2cache: Option<CacheConfig>,

    /// Block size in bytes (power of two).
    #[arg(long)]
    blocksize: Option<usize>,

    /// Main memory latency in cycles.
    #[arg(long)]
    memspeed: Option<u64>,

    /// Make the L2 strictly inclusive of both L1 caches.
    #[arg(long)]
    inclusive: bool,

    /// Statistics sections to print (summary, icache, dcache, l2cache); all by default.
    #[arg(long, value_delimiter = ',')]
    sections: Vec<String>,

    /// Dump the set/way contents of every enabled cache after the run.
    #[arg(long)]
    dump: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Failure of a command-line run.
#[derive(Debug, Error)]
enum CliError {
    /// The JSON configuration file could not be read.
    #[error("reading {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The JSON configuration file is malformed.
    #[error("parsing {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The resolved configuration cannot be simulated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace file could not be opened.
    #[error("opening trace: {0}")]
    OpenTrace(#[source] io::Error),

    /// Replay stopped on a bad trace line or a failed access.
    #[error("replay aborted: {0}")]
    Replay(#[from] SimError),

    /// The report could not be written to stdout.
    #[error("writing report: {0}")]
    Report(#[source] io::Error),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Builds the hierarchy, replays the trace, and prints the report.
fn run(cli: &Cli) -> Result<(), CliError> {
    let config = build_config(cli)?;

    for section in &cli.sections {
        if section != "summary" && !STATS_SECTIONS.contains(&section.as_str()) {
            eprintln!("Warning: unknown statistics section {section:?}");
        }
    }

    let mut sim = Simulator::new(&config)?;
    let input = open_trace(cli.trace.as_deref()).map_err(CliError::OpenTrace)?;
    let summary = sim.run(TraceReader::new(input))?;
    write_report(cli, &config, &sim, &summary).map_err(CliError::Report)
}

/// Prints the selected statistics sections and, with `--dump`, the cache contents.
fn write_report(
    cli: &Cli,
    config: &HierarchyConfig,
    sim: &Simulator,
    summary: &RunSummary,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.sections.is_empty() || cli.sections.iter().any(|s| s == "summary") {
        summary.write(&mut out)?;
    }
    sim.hierarchy
        .stats()
        .write_sections(&mut out, config, &cli.sections)?;
    if cli.dump {
        write!(out, "{}", sim.hierarchy)?;
    }
    Ok(())
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects debug and `-vv` trace.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads the optional JSON configuration and applies command-line overrides.
fn build_config(cli: &Cli) -> Result<HierarchyConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HierarchyConfig::default(),
    };

    if let Some(l1_i) = cli.icache {
        config.l1_i = l1_i;
    }
    if let Some(l1_d) = cli.dcache {
        config.l1_d = l1_d;
    }
    if let Some(l2) = cli.l2cache {
        config.l2 = l2;
    }
    if let Some(block_size) = cli.blocksize {
        config.block_size = block_size;
    }
    if let Some(mem_speed) = cli.memspeed {
        config.mem_speed = mem_speed;
    }
    config.inclusive |= cli.inclusive;

    tracing::debug!(?config, "resolved hierarchy configuration");
    config.validate()?;
    Ok(config)
}

/// Reads a JSON hierarchy configuration from `path`.
fn load_config(path: &Path) -> Result<HierarchyConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

/// Opens the trace file, or stdin for `None` / `-`.
fn open_trace(path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    match path {
        Some(p) if p.as_os_str() != "-" => Ok(Box::new(BufReader::new(File::open(p)?))),
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}
