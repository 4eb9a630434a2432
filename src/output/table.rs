//! CSV tables: per-state statistics, times and efficiencies.
//!
//! Text fields are quoted and numbers are written bare, e.g.
//!
//! ```text
//! "Name","Count","Type","Duration"
//! "Executing",12,"Runtime",3.5
//! ```

use super::create_output_file;
use crate::aggregator::{round_to, Efficiencies, StateStat, TimeBuckets};
use crate::utils::config::DURATION_PRECISION;
use crate::utils::error::OutputError;
use csv::{QuoteStyle, Writer, WriterBuilder};
use clap::ValueEnum;
use log::info;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Row order of the state table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Order in which states were first encountered
    #[default]
    Appearance,
    /// Cumulative duration, longest first
    Duration,
    /// Occurrence count, most frequent first
    Count,
    /// State name, alphabetical
    Name,
}

/// Rank state statistics
///
/// The sort is stable, so ties keep their order of appearance.
pub fn sort_stats<'a>(
    stats: impl IntoIterator<Item = &'a StateStat>,
    order: SortOrder,
) -> Vec<&'a StateStat> {
    let mut rows: Vec<&StateStat> = stats.into_iter().collect();
    match order {
        SortOrder::Appearance => {}
        SortOrder::Duration => rows.sort_by(|a, b| b.duration.total_cmp(&a.duration)),
        SortOrder::Count => rows.sort_by(|a, b| b.count.cmp(&a.count)),
        SortOrder::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    rows
}

/// Shortest round-trip representation, always with a decimal point
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

fn csv_writer<W: Write>(writer: W) -> Writer<W> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(writer)
}

/// Write the state table
///
/// One row per named state with its count, category and duration
/// (rounded to six decimals). Unnamed states are left out.
pub fn write_state_table<'a, W: Write>(
    writer: W,
    stats: impl IntoIterator<Item = &'a StateStat>,
) -> Result<(), OutputError> {
    let mut wtr = csv_writer(writer);
    wtr.write_record(["Name", "Count", "Type", "Duration"])?;

    for stat in stats {
        let Some(name) = &stat.name else {
            continue;
        };
        let count = stat.count.to_string();
        let category = stat.category.as_ref().map(|c| c.as_str()).unwrap_or("");
        let duration = format_float(round_to(stat.duration, DURATION_PRECISION));
        wtr.write_record([name.as_str(), count.as_str(), category, duration.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the state table to a string (for tests and logging)
pub fn state_table_to_string<'a>(
    stats: impl IntoIterator<Item = &'a StateStat>,
) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    write_state_table(&mut buf, stats)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_two_column(
    output_path: &Path,
    header: [&str; 2],
    rows: &[(&str, f64)],
) -> Result<(), OutputError> {
    let file = create_output_file(output_path)?;
    let mut wtr = csv_writer(BufWriter::new(file));

    wtr.write_record(header)?;
    for (label, value) in rows {
        let value = format_float(*value);
        wtr.write_record([*label, value.as_str()])?;
    }
    wtr.flush()?;

    info!("Wrote {}", output_path.display());
    Ok(())
}

/// Write runtime/task/idle times as a two-column CSV
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, a directory, or its parent cannot be created
/// * `OutputError::Csv` / `OutputError::WriteFailed` - write failure
pub fn write_times(output_path: impl AsRef<Path>, buckets: &TimeBuckets) -> Result<(), OutputError> {
    write_two_column(output_path.as_ref(), ["Time", "Duration"], &buckets.rows())
}

/// Write the four efficiencies as a two-column CSV
///
/// # Errors
/// Same as [`write_times`].
pub fn write_efficiencies(
    output_path: impl AsRef<Path>,
    efficiencies: &Efficiencies,
) -> Result<(), OutputError> {
    write_two_column(
        output_path.as_ref(),
        ["Efficiency", "Value"],
        &efficiencies.rows(),
    )
}
