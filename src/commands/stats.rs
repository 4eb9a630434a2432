//! Stats command implementation.
//!
//! The stats command:
//! 1. Reads and parses the trace file
//! 2. Groups records into per-worker streams
//! 3. Reconstructs per-state durations for every worker
//! 4. Computes time buckets and efficiencies (when requested)
//! 5. Writes the state table and output files

use crate::aggregator::{aggregate_workers, Efficiencies, StateStats, TimeBuckets, WorkerStreams};
use crate::output::{sort_stats, write_efficiencies, write_report, write_state_table, write_times};
use crate::output::{Report, SortOrder};
use crate::parser::read_trace_file;
use crate::utils::config::{EFFICIENCIES_FILE_NAME, TIMES_FILE_NAME};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the stats command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct StatsArgs {
    /// Path to the trace file
    pub trace_path: PathBuf,

    /// Write runtime/task/idle times to `times.csv`
    pub dump_times: bool,

    /// Write efficiencies to `efficiencies.csv`
    pub dump_efficiency: bool,

    /// Task time of a sequential run (task efficiency baseline)
    pub seq_task_time: Option<f64>,

    /// Directory receiving `times.csv` and `efficiencies.csv`
    pub output_dir: PathBuf,

    /// Optional JSON report path
    pub json_output: Option<PathBuf>,

    /// Row order of the state table
    pub sort: SortOrder,
}

impl Default for StatsArgs {
    fn default() -> Self {
        Self {
            trace_path: PathBuf::from("trace.rec"),
            dump_times: false,
            dump_efficiency: false,
            seq_task_time: None,
            output_dir: PathBuf::from("."),
            json_output: None,
            sort: SortOrder::Appearance,
        }
    }
}

impl StatsArgs {
    /// Sequential baseline, with an explicit zero meaning "not supplied"
    pub fn baseline(&self) -> Option<f64> {
        self.seq_task_time.filter(|t| *t != 0.0)
    }

    /// Efficiencies are computed with `-e`, or whenever a baseline is given
    pub fn wants_efficiencies(&self) -> bool {
        self.dump_efficiency || self.baseline().is_some()
    }

    pub fn times_path(&self) -> PathBuf {
        self.output_dir.join(TIMES_FILE_NAME)
    }

    pub fn efficiencies_path(&self) -> PathBuf {
        self.output_dir.join(EFFICIENCIES_FILE_NAME)
    }
}

/// Everything computed by one run
#[derive(Debug, Clone)]
pub struct StatsOutcome {
    pub stats: StateStats,
    pub workers: usize,
    pub records: usize,
    pub times: Option<TimeBuckets>,
    pub efficiencies: Option<Efficiencies>,
}

/// Validate stats arguments
///
/// **Public** - can be called before execute_stats for early validation
pub fn validate_args(args: &StatsArgs) -> Result<()> {
    if args.trace_path.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    if let Some(t) = args.seq_task_time {
        if !t.is_finite() {
            anyhow::bail!("Sequential task time must be a finite number");
        }
        if t < 0.0 {
            anyhow::bail!("Sequential task time cannot be negative");
        }
    }

    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    Ok(())
}

/// Compute statistics for a trace without writing anything
///
/// # Errors
/// * Missing or unreadable trace file, malformed numeric fields
/// * Unmatched `PopState` in a worker stream
/// * Unknown category (when times or efficiencies are requested)
/// * Zero denominators in efficiency ratios
pub fn compute_stats(args: &StatsArgs) -> Result<StatsOutcome> {
    info!("Step 1/4: Reading trace {}...", args.trace_path.display());
    let parsed = read_trace_file(&args.trace_path)
        .with_context(|| format!("Failed to read trace {}", args.trace_path.display()))?;
    let records = parsed.records.len();

    info!("Step 2/4: Grouping {} records by worker...", records);
    let streams = WorkerStreams::from_records(parsed.records);
    let workers = streams.len();

    info!("Step 3/4: Reconstructing state durations for {} workers...", workers);
    let stats = aggregate_workers(&streams).context("Invalid state nesting in trace")?;
    debug!("Observed {} distinct states", stats.len());

    let times = if args.dump_times || args.wants_efficiencies() {
        info!("Step 4/4: Computing time buckets...");
        Some(TimeBuckets::from_stats(&stats).context("Failed to compute times")?)
    } else {
        info!("Step 4/4: Skipping time buckets (not requested)");
        None
    };

    let efficiencies = match (&times, args.wants_efficiencies()) {
        (Some(buckets), true) => Some(
            Efficiencies::compute(buckets, args.baseline())
                .context("Failed to compute efficiencies")?,
        ),
        _ => None,
    };

    Ok(StatsOutcome {
        stats,
        workers,
        records,
        times,
        efficiencies,
    })
}

/// Execute the stats command
///
/// **Public** - main entry point called from main.rs
///
/// All computation happens before the first byte is written, so a failing
/// run produces no partial output.
///
/// # Arguments
/// * `args` - Stats command arguments
/// * `out` - Destination of the state table (stdout in the CLI)
///
/// # Example
/// ```ignore
/// let args = StatsArgs {
///     trace_path: PathBuf::from("trace.rec"),
///     dump_times: true,
///     ..Default::default()
/// };
///
/// execute_stats(&args, std::io::stdout().lock())?;
/// ```
pub fn execute_stats<W: Write>(args: &StatsArgs, out: W) -> Result<StatsOutcome> {
    let start_time = Instant::now();

    let outcome = compute_stats(args)?;

    let rows = sort_stats(outcome.stats.iter(), args.sort);
    write_state_table(out, rows).context("Failed to write state table")?;

    if args.dump_times {
        if let Some(times) = &outcome.times {
            write_times(args.times_path(), times).context("Failed to write times")?;
        }
    }

    if let Some(efficiencies) = &outcome.efficiencies {
        write_efficiencies(args.efficiencies_path(), efficiencies)
            .context("Failed to write efficiencies")?;
    }

    if let Some(json_path) = &args.json_output {
        let report = Report::new(
            &args.trace_path,
            outcome.workers,
            outcome.records,
            &outcome.stats,
        )
        .with_times(outcome.times)
        .with_efficiencies(outcome.efficiencies);
        write_report(&report, json_path).context("Failed to write JSON report")?;
    }

    let elapsed = start_time.elapsed();
    info!("Stats completed in {:.2}s", elapsed.as_secs_f64());

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = StatsArgs {
            seq_task_time: Some(60093.95),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_trace() {
        let args = StatsArgs {
            trace_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_negative_baseline() {
        let args = StatsArgs {
            seq_task_time: Some(-1.0),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_nan_baseline() {
        let args = StatsArgs {
            seq_task_time: Some(f64::NAN),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_zero_baseline_is_not_supplied() {
        let args = StatsArgs {
            seq_task_time: Some(0.0),
            ..Default::default()
        };
        assert_eq!(args.baseline(), None);
        assert!(!args.wants_efficiencies());
    }

    #[test]
    fn test_baseline_implies_efficiencies() {
        let args = StatsArgs {
            seq_task_time: Some(12.5),
            ..Default::default()
        };
        assert!(args.wants_efficiencies());
    }

    #[test]
    fn test_output_paths() {
        let args = StatsArgs {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(args.times_path(), PathBuf::from("out/times.csv"));
        assert_eq!(args.efficiencies_path(), PathBuf::from("out/efficiencies.csv"));
    }
}
