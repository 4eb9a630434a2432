//! Aggregation of trace records into state statistics and metrics.
//!
//! This module transforms parsed trace records into:
//! - Per-worker event streams
//! - Per-state durations (interval reconstruction with a nesting stack)
//! - Global per-state totals and category time buckets
//! - Parallel efficiency metrics

pub mod metrics;
pub mod state_machine;
pub mod stats;
pub mod streams;

// Re-export main types and functions
pub use metrics::{round_to, Efficiencies};
pub use state_machine::{compute_worker_stats, IntervalMachine, OpenState};
pub use stats::{aggregate_workers, merge_worker_stats, StateStat, StateStats, TimeBuckets};
pub use streams::{WorkerStream, WorkerStreams};
