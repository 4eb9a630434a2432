//! Rec State Stats
//!
//! Per-state duration statistics and parallel efficiency metrics for
//! execution traces of task-based parallel runtimes.
//!
//! This crate provides the core implementation for the
//! `rec-state-stats` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install rec-state-stats
//! rec-state-stats -te trace.rec
//! ```
//!
//! ## Library use
//!
//! ```ignore
//! use rec_state_stats::aggregator::{aggregate_workers, TimeBuckets, WorkerStreams};
//! use rec_state_stats::parser::read_trace_file;
//!
//! let parsed = read_trace_file("trace.rec")?;
//! let streams = WorkerStreams::from_records(parsed.records);
//! let stats = aggregate_workers(&streams)?;
//! let times = TimeBuckets::from_stats(&stats)?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
