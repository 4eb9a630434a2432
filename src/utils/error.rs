//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the trace file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid {field} value '{value}' on line {line}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Structural errors found while reconstructing worker intervals
#[derive(Error, Debug, PartialEq)]
pub enum TraceError {
    #[error(
        "PopState without a matching PushState on worker {worker_id} \
         (record {index}, time {time})"
    )]
    UnmatchedPop {
        worker_id: i64,
        index: usize,
        time: f64,
    },
}

/// Errors that can occur while aggregating statistics
#[derive(Error, Debug, PartialEq)]
pub enum AggregateError {
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}

/// Errors that can occur while computing efficiencies
#[derive(Error, Debug, PartialEq)]
pub enum MetricsError {
    #[error("Cannot compute {what} efficiency: denominator is zero")]
    DegenerateTimes { what: &'static str },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
