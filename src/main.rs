//! Rec State Stats CLI
//!
//! Reads a `trace.rec` execution trace and reports how long every worker
//! spent in each state, optionally with time buckets and parallel
//! efficiencies.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use rec_state_stats::commands::{execute_stats, validate_args, StatsArgs};
use rec_state_stats::output::SortOrder;
use std::path::PathBuf;

/// Compute per-state statistics from a trace.rec file
#[derive(Parser, Debug)]
#[command(name = "rec-state-stats")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
  # Compute event statistics and report them to stdout:
  rec-state-stats trace.rec

  # Compute event stats, times and efficiencies:
  rec-state-stats -te trace.rec

  # Compute correct task efficiency with the sequential task time:
  rec-state-stats -s=60093.950614 trace.rec")]
struct Cli {
    /// Trace file to analyze
    trace: PathBuf,

    /// Compute and dump times to times.csv
    #[arg(short, long)]
    time: bool,

    /// Compute and dump efficiencies to efficiencies.csv
    #[arg(short, long)]
    efficiency: bool,

    /// Sequential task time, used to compute task efficiency
    /// (if not set, task efficiency will be 1.0)
    #[arg(short = 's', long = "seq_task_time", value_name = "TIME")]
    seq_task_time: Option<f64>,

    /// Directory for times.csv and efficiencies.csv
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Row order of the state table
    #[arg(long, value_enum, default_value_t = SortOrder::Appearance)]
    sort: SortOrder,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the CSV table. The default `warn`
    // filter keeps the missing-baseline warning visible; RUST_LOG replaces it.
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = StatsArgs {
        trace_path: cli.trace,
        dump_times: cli.time,
        dump_efficiency: cli.efficiency,
        seq_task_time: cli.seq_task_time,
        output_dir: cli.output_dir,
        json_output: cli.json,
        sort: cli.sort,
    };

    validate_args(&args)?;

    let stdout = std::io::stdout();
    execute_stats(&args, stdout.lock())?;

    Ok(())
}
