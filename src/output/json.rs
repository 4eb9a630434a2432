//! JSON report output writer.
//!
//! Bundles the state table, time buckets and efficiencies of one run into
//! a single versioned JSON document.

use super::create_output_file;
use crate::aggregator::{Efficiencies, StateStat, StateStats, TimeBuckets};
use crate::utils::config::REPORT_SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace file the statistics were computed from
    pub trace_file: String,

    /// Number of workers seen in the trace
    pub workers: usize,

    /// Number of event records read
    pub records: usize,

    /// Per-state statistics, in table order
    pub states: Vec<StateStat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<TimeBuckets>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiencies: Option<Efficiencies>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl Report {
    /// Build a report stamped with the current time
    pub fn new(
        trace_file: impl AsRef<Path>,
        workers: usize,
        records: usize,
        states: &StateStats,
    ) -> Self {
        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            trace_file: trace_file.as_ref().display().to_string(),
            workers,
            records,
            states: states.iter().cloned().collect(),
            times: None,
            efficiencies: None,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_times(mut self, times: Option<TimeBuckets>) -> Self {
        self.times = times;
        self
    }

    pub fn with_efficiencies(mut self, efficiencies: Option<Efficiencies>) -> Self {
        self.efficiencies = efficiencies;
        self
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &Report, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    let file = create_output_file(output_path)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<Report, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: Report =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} states",
        report.version,
        report.states.len()
    );

    Ok(report)
}
