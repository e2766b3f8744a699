//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use matmul_core::constants::{
    DEFAULT_MATRIX_SIZE, DEFAULT_MAX_VALUE, DEFAULT_SERIAL_THRESHOLD, DEFAULT_WORKER_COUNT,
    SEED_FROM_CLOCK,
};
use matmul_orchestration::{ExecutionPolicy, Phase};

/// MatMul-rs: partitioned matrix multiplication with pluggable storage.
#[derive(Parser, Debug)]
#[command(name = "matmul", version, about)]
pub struct AppConfig {
    /// Log progress at info level (`RUST_LOG` still wins when set).
    #[arg(short, long, global = true, env = "MATMUL_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a full calculation locally and print its report.
    Run(RunArgs),
    /// Run one lifecycle phase over a durable store, JSON context on stdin.
    Phase(PhaseArgs),
}

/// Storage backend selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// In-process maps, gone when the process exits.
    Memory,
    /// One JSON file per artifact under `--store-dir`.
    Fs,
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Matrix dimension.
    #[arg(short = 'n', long, default_value_t = DEFAULT_MATRIX_SIZE, env = "MATMUL_SIZE")]
    pub size: usize,

    /// Exclusive upper bound of generated cell values.
    #[arg(short, long, default_value_t = DEFAULT_MAX_VALUE, env = "MATMUL_MAX_VALUE")]
    pub max_value: i32,

    /// Generator seed; -1 seeds from the clock.
    #[arg(
        short,
        long,
        default_value_t = SEED_FROM_CLOCK,
        allow_negative_numbers = true,
        env = "MATMUL_SEED"
    )]
    pub seed: i64,

    /// Workers for partitioned runs.
    #[arg(short, long, default_value_t = DEFAULT_WORKER_COUNT, env = "MATMUL_WORKERS")]
    pub workers: usize,

    /// Sizes below this multiply serially.
    #[arg(long, default_value_t = DEFAULT_SERIAL_THRESHOLD, env = "MATMUL_SERIAL_THRESHOLD")]
    pub serial_threshold: usize,

    /// URL to POST the JSON report to.
    #[arg(long, env = "MATMUL_CALLBACK")]
    pub callback: Option<String>,

    /// Callback request timeout (e.g., "500ms", "10s", "1m").
    #[arg(long, default_value = "10s", env = "MATMUL_CALLBACK_TIMEOUT")]
    pub callback_timeout: String,

    /// Storage backend.
    #[arg(long, value_enum, default_value_t = StoreKind::Memory, env = "MATMUL_STORE")]
    pub store: StoreKind,

    /// Root directory for the `fs` store.
    #[arg(long, env = "MATMUL_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also print the input and result matrices.
    #[arg(long)]
    pub show_matrices: bool,

    /// Only print the result statistics.
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    /// Parse the callback timeout, falling back to 10s.
    #[must_use]
    pub fn callback_timeout_duration(&self) -> Duration {
        parse_duration(&self.callback_timeout).unwrap_or(Duration::from_secs(10))
    }

    #[must_use]
    pub fn policy(&self) -> ExecutionPolicy {
        ExecutionPolicy {
            serial_threshold: self.serial_threshold,
            workers: self.workers,
        }
    }
}

#[derive(Args, Debug)]
pub struct PhaseArgs {
    /// Phase to run: create, serial, schedule, work, assemble, or report.
    #[arg(value_parser = parse_phase)]
    pub phase: Phase,

    /// Root directory of the durable store shared by all phases.
    #[arg(long, env = "MATMUL_STORE_DIR")]
    pub store_dir: PathBuf,

    /// Callback request timeout (e.g., "500ms", "10s", "1m").
    #[arg(long, default_value = "10s", env = "MATMUL_CALLBACK_TIMEOUT")]
    pub callback_timeout: String,
}

impl PhaseArgs {
    #[must_use]
    pub fn callback_timeout_duration(&self) -> Duration {
        parse_duration(&self.callback_timeout).unwrap_or(Duration::from_secs(10))
    }
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

fn parse_phase(s: &str) -> Result<Phase, String> {
    s.parse().map_err(|e: matmul_core::MatMulError| e.to_string())
}

/// Parse a duration string like "500ms", "30s", "5m", "1h".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n * 3600))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
