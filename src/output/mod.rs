//! Output writers for state statistics and derived metrics.
//!
//! This module handles writing results in various formats:
//! - The per-state CSV table (stdout)
//! - `times.csv` and `efficiencies.csv`
//! - A JSON report bundling everything

pub mod json;
pub mod table;

// Re-export main functions
pub use table::{
    format_float, sort_stats, state_table_to_string, write_efficiencies, write_state_table,
    write_times, SortOrder,
};
pub use json::{read_report, write_report, Report};

use crate::utils::error::OutputError;
use log::debug;
use std::fs::File;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate a path, create its parent directories and open it for writing
pub(crate) fn create_output_file(path: &Path) -> Result<File, OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    File::create(path).map_err(OutputError::WriteFailed)
}
