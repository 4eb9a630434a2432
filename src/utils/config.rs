//! Configuration and constants for the CLI.

/// Current JSON report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

// Line tags recognized inside a record block. Everything else is ignored.
pub const TAG_EVENT: &str = "E:";
pub const TAG_CATEGORY: &str = "C:";
pub const TAG_WORKER: &str = "W:";
pub const TAG_NAME: &str = "N:";
pub const TAG_START_TIME: &str = "S:";

// Event kinds that drive the interval state machine
pub const KIND_SET_STATE: &str = "SetState";
pub const KIND_PUSH_STATE: &str = "PushState";
pub const KIND_POP_STATE: &str = "PopState";

// State categories used for time buckets
pub const CATEGORY_RUNTIME: &str = "Runtime";
pub const CATEGORY_TASK: &str = "Task";
pub const CATEGORY_OTHER: &str = "Other";

/// Worker id assigned to event blocks without a `W:` line
pub const UNKNOWN_WORKER_ID: i64 = -1;

/// Fractional digits kept for per-state durations in the state table
pub const DURATION_PRECISION: i32 = 6;

/// Fractional digits kept for reported efficiencies
pub const EFFICIENCY_PRECISION: i32 = 6;

// Default output file names (written inside the output directory)
pub const TIMES_FILE_NAME: &str = "times.csv";
pub const EFFICIENCIES_FILE_NAME: &str = "efficiencies.csv";
