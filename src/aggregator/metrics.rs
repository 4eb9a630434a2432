//! Parallel efficiency metrics derived from category time buckets.
//!
//! With `tt` task time, `tr` runtime time and `ti` idle time summed over all
//! workers, and `tt_seq` the task time of a sequential run:
//!
//! - task efficiency `tt_seq / tt` measures data locality exploitation
//! - runtime efficiency `tt / (tt + tr)` measures runtime overhead impact
//! - pipeline efficiency `(tt + tr) / (tt + tr + ti)` measures how much
//!   concurrency is available and exploited
//! - parallel efficiency is the product of the three

use super::stats::TimeBuckets;
use crate::utils::config::EFFICIENCY_PRECISION;
use crate::utils::error::MetricsError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Round to a fixed number of fractional digits
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Task efficiency (`et`)
pub fn task_efficiency(tt_seq: f64, tt: f64) -> f64 {
    tt_seq / tt
}

/// Runtime efficiency (`er`)
pub fn runtime_efficiency(tt: f64, tr: f64) -> f64 {
    tt / (tt + tr)
}

/// Pipeline efficiency (`ep`)
pub fn pipeline_efficiency(tt: f64, tr: f64, ti: f64) -> f64 {
    (tt + tr) / (tt + tr + ti)
}

/// Parallel efficiency (`e`)
pub fn parallel_efficiency(et: f64, er: f64, ep: f64) -> f64 {
    et * er * ep
}

/// All four efficiencies, rounded for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Efficiencies {
    pub parallel: f64,
    pub task: f64,
    pub runtime: f64,
    pub pipeline: f64,
}

impl Efficiencies {
    /// Compute efficiencies from time buckets
    ///
    /// **Public** - main entry point for metrics calculation
    ///
    /// # Arguments
    /// * `buckets` - Idle/runtime/task time summed over all workers
    /// * `seq_task_time` - Task time of a sequential run. When `None`, task
    ///   efficiency is 1.0.
    ///
    /// The components are rounded first; parallel efficiency is the
    /// rounded product of the rounded components.
    ///
    /// # Errors
    /// * `MetricsError::DegenerateTimes` - a ratio has a zero denominator
    ///   (task time only matters when a baseline is given)
    pub fn compute(buckets: &TimeBuckets, seq_task_time: Option<f64>) -> Result<Self, MetricsError> {
        let TimeBuckets {
            idle: ti,
            runtime: tr,
            task: tt,
        } = *buckets;

        let task = match seq_task_time {
            Some(_) if tt == 0.0 => {
                return Err(MetricsError::DegenerateTimes { what: "task" });
            }
            Some(tt_seq) => round_to(task_efficiency(tt_seq, tt), EFFICIENCY_PRECISION),
            None => {
                warn!("Task efficiency will be 1.0 because -s is not set!");
                1.0
            }
        };

        if tt + tr == 0.0 {
            return Err(MetricsError::DegenerateTimes { what: "runtime" });
        }
        if tt + tr + ti == 0.0 {
            return Err(MetricsError::DegenerateTimes { what: "pipeline" });
        }

        let pipeline = round_to(pipeline_efficiency(tt, tr, ti), EFFICIENCY_PRECISION);
        let runtime = round_to(runtime_efficiency(tt, tr), EFFICIENCY_PRECISION);
        let parallel = round_to(
            parallel_efficiency(task, runtime, pipeline),
            EFFICIENCY_PRECISION,
        );

        debug!(
            "Efficiencies: parallel={} task={} runtime={} pipeline={}",
            parallel, task, runtime, pipeline
        );

        Ok(Self {
            parallel,
            task,
            runtime,
            pipeline,
        })
    }

    /// Rows in report order: Parallel, Task, Runtime, Pipeline
    pub fn rows(&self) -> [(&'static str, f64); 4] {
        [
            ("Parallel", self.parallel),
            ("Task", self.task),
            ("Runtime", self.runtime),
            ("Pipeline", self.pipeline),
        ]
    }
}
