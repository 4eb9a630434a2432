//! Per-state duration statistics and category time buckets.
//!
//! Each worker folds its duration observations into a local [`StateStats`];
//! the local maps are then merged into one global map. Maps iterate in
//! first-encounter order, which is the order rows are reported in.

use super::state_machine::compute_worker_stats;
use super::streams::{WorkerStream, WorkerStreams};
use crate::parser::Category;
use crate::utils::error::{AggregateError, TraceError};
use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one state name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateStat {
    /// State label (absent for unnamed events)
    pub name: Option<String>,

    /// Category of the first observation of this name
    pub category: Option<Category>,

    /// Number of closed intervals
    pub count: u64,

    /// Cumulative duration in seconds
    pub duration: f64,
}

impl StateStat {
    pub fn new(name: Option<String>, category: Option<Category>) -> Self {
        Self {
            name,
            category,
            count: 0,
            duration: 0.0,
        }
    }
}

/// State name -> statistics, in first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateStats {
    entries: IndexMap<Option<String>, StateStat>,
}

impl StateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one duration observation into the map
    ///
    /// The first category seen for a name is kept; later observations
    /// only add to count and duration.
    pub fn observe(&mut self, name: Option<&str>, category: Option<&Category>, duration: f64) {
        let stat = self
            .entries
            .entry(name.map(str::to_string))
            .or_insert_with(|| StateStat::new(name.map(str::to_string), category.cloned()));
        stat.count += 1;
        stat.duration += duration;
    }

    /// Add another map's totals into this one
    ///
    /// Names missing from `other` are untouched; new names are appended
    /// after the existing ones.
    pub fn merge(&mut self, other: &StateStats) {
        for (key, stat) in &other.entries {
            let entry = self
                .entries
                .entry(key.clone())
                .or_insert_with(|| StateStat::new(key.clone(), stat.category.clone()));
            entry.count += stat.count;
            entry.duration += stat.duration;
        }
    }

    pub fn get(&self, name: &str) -> Option<&StateStat> {
        self.entries.get(&Some(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateStat> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every observed duration
    pub fn total_duration(&self) -> f64 {
        self.iter().map(|s| s.duration).sum()
    }
}

/// Merge per-worker maps into a global one, preserving worker order
pub fn merge_worker_stats<'a>(workers: impl IntoIterator<Item = &'a StateStats>) -> StateStats {
    let mut global = StateStats::new();
    for local in workers {
        global.merge(local);
    }
    global
}

/// Run the interval state machine on every worker and merge the results
///
/// Workers are independent, so reconstruction runs in parallel. Results
/// are collected in worker order and merged on a single thread, which
/// keeps the output identical to a sequential run.
///
/// # Errors
/// * `TraceError` from the first failing worker (in worker order)
pub fn aggregate_workers(streams: &WorkerStreams) -> Result<StateStats, TraceError> {
    let workers: Vec<&WorkerStream> = streams.iter().collect();

    let locals = workers
        .par_iter()
        .map(|stream| compute_worker_stats(stream))
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let global = merge_worker_stats(&locals);
    debug!(
        "Merged {} worker maps into {} distinct states",
        locals.len(),
        global.len()
    );
    Ok(global)
}

/// Time spent per category, summed over all states and workers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeBuckets {
    /// `Other` states
    pub idle: f64,
    /// `Runtime` states
    pub runtime: f64,
    /// `Task` states
    pub task: f64,
}

impl TimeBuckets {
    /// Sum durations by category
    ///
    /// States without a category do not belong to any bucket and are
    /// skipped.
    ///
    /// # Errors
    /// * `AggregateError::UnknownCategory` - a state has a category other
    ///   than Runtime, Task or Other
    pub fn from_stats(stats: &StateStats) -> Result<Self, AggregateError> {
        let mut buckets = TimeBuckets::default();

        for stat in stats.iter() {
            match &stat.category {
                Some(Category::Runtime) => buckets.runtime += stat.duration,
                Some(Category::Task) => buckets.task += stat.duration,
                Some(Category::Other) => buckets.idle += stat.duration,
                Some(Category::Unrecognized(s)) => {
                    return Err(AggregateError::UnknownCategory(s.clone()))
                }
                None => debug!("Skipping uncategorized state {:?}", stat.name),
            }
        }

        Ok(buckets)
    }

    pub fn total(&self) -> f64 {
        self.idle + self.runtime + self.task
    }

    /// Rows in report order: Runtime, Task, Idle
    pub fn rows(&self) -> [(&'static str, f64); 3] {
        [
            ("Runtime", self.runtime),
            ("Task", self.task),
            ("Idle", self.idle),
        ]
    }
}
