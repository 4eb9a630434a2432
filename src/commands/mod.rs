//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod stats;

// Re-export main command functions
pub use stats::{compute_stats, execute_stats, validate_args, StatsArgs, StatsOutcome};
