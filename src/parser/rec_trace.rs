//! Reader for line-tagged `trace.rec` files.
//!
//! The trace is a sequence of blocks separated by blank lines. Each line of
//! a block is `<tag>: <value>`. A block is an event iff its first line is an
//! `E:` line; any other block (metadata, headers) is skipped.
//!
//! ```text
//! E: SetState
//! N: Executing
//! C: Runtime
//! W: 0
//! S: 1.250
//! ```

use super::schema::{Category, EventKind, Record};
use crate::utils::config::{
    TAG_CATEGORY, TAG_EVENT, TAG_NAME, TAG_START_TIME, TAG_WORKER, UNKNOWN_WORKER_ID,
};
use crate::utils::error::ParseError;
use log::debug;
use std::path::Path;

/// A blank-line delimited group of lines
///
/// Each line keeps its 1-based line number in the source text so parse
/// errors can point at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub lines: Vec<(usize, &'a str)>,
}

impl<'a> Block<'a> {
    /// Whether the first line of the block is an event-type line
    pub fn is_event(&self) -> bool {
        self.lines
            .first()
            .is_some_and(|(_, line)| line.starts_with(TAG_EVENT))
    }
}

/// Records extracted from a whole trace, in file order
#[derive(Debug, Clone, Default)]
pub struct ParsedTrace {
    pub records: Vec<Record>,

    /// Number of non-empty blocks in the file
    pub block_count: usize,

    /// Blocks that were not event blocks
    pub skipped_blocks: usize,
}

/// Split trace text into blank-line delimited blocks
///
/// Runs of several blank lines count as a single separator and never
/// produce empty blocks. Whitespace-only lines count as blank.
pub fn read_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Vec<(usize, &str)> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(Block {
                    lines: std::mem::take(&mut current),
                });
            }
        } else {
            current.push((index + 1, line));
        }
    }

    if !current.is_empty() {
        blocks.push(Block { lines: current });
    }

    blocks
}

/// Value of a tagged line, e.g. `"Executing"` for `"N: Executing"`
fn field_value<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    line.strip_prefix(tag).map(str::trim)
}

/// Extract a record from one block
///
/// Returns `Ok(None)` for non-event blocks. Missing tags fall back to
/// permissive defaults (`W:` = -1, `S:` = 0.0, no name, no category);
/// when a tag appears twice the last value wins.
///
/// # Errors
/// * `ParseError::InvalidNumber` - `W:` or `S:` value is not a number
pub fn parse_block(block: &Block<'_>) -> Result<Option<Record>, ParseError> {
    if !block.is_event() {
        return Ok(None);
    }

    let mut kind = EventKind::Other(String::new());
    let mut name = None;
    let mut category = None;
    let mut worker_id = UNKNOWN_WORKER_ID;
    let mut start_time = 0.0;

    for &(line_no, line) in &block.lines {
        if let Some(value) = field_value(line, TAG_EVENT) {
            kind = value.parse().unwrap_or_else(|never| match never {});
        } else if let Some(value) = field_value(line, TAG_CATEGORY) {
            category = Some(value.parse::<Category>().unwrap_or_else(|never| match never {}));
        } else if let Some(value) = field_value(line, TAG_WORKER) {
            worker_id = value.parse().map_err(|_| ParseError::InvalidNumber {
                line: line_no,
                field: "worker id",
                value: value.to_string(),
            })?;
        } else if let Some(value) = field_value(line, TAG_NAME) {
            name = Some(value.to_string());
        } else if let Some(value) = field_value(line, TAG_START_TIME) {
            start_time = value.parse().map_err(|_| ParseError::InvalidNumber {
                line: line_no,
                field: "start time",
                value: value.to_string(),
            })?;
        }
    }

    Ok(Some(Record {
        kind,
        name,
        category,
        worker_id,
        start_time,
    }))
}

/// Parse all event records out of trace text
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::InvalidNumber` - a numeric field failed to parse
pub fn parse_trace(text: &str) -> Result<ParsedTrace, ParseError> {
    let blocks = read_blocks(text);
    let mut records = Vec::with_capacity(blocks.len());
    let mut skipped_blocks = 0;

    for block in &blocks {
        match parse_block(block)? {
            Some(record) => records.push(record),
            None => skipped_blocks += 1,
        }
    }

    debug!(
        "Parsed {} event records from {} blocks ({} skipped)",
        records.len(),
        blocks.len(),
        skipped_blocks
    );

    Ok(ParsedTrace {
        records,
        block_count: blocks.len(),
        skipped_blocks,
    })
}

/// Read and parse a trace file
///
/// # Errors
/// * `ParseError::FileNotFound` - path is not an existing regular file
/// * `ParseError::Io` - file could not be read
/// * `ParseError::InvalidNumber` - a numeric field failed to parse
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<ParsedTrace, ParseError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(ParseError::FileNotFound(path.to_path_buf()));
    }

    debug!("Reading trace from: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_trace(&text)
}
