//! Trace parsing and record definitions.
//!
//! This module handles:
//! - Splitting raw `trace.rec` text into record blocks
//! - Extracting typed event records
//! - Rejecting malformed numeric fields

pub mod rec_trace;
pub mod schema;

// Re-export main types
pub use rec_trace::{parse_block, parse_trace, read_blocks, read_trace_file, Block, ParsedTrace};
pub use schema::{Category, EventKind, Record};
