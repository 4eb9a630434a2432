//! Reconstruct per-state durations from a worker's flat event stream.
//!
//! The stream encodes nested states: `SetState` switches state at the
//! current level, `PushState` enters a nested state and `PopState` returns
//! from it. Every adjacent pair of records closes one interval, with two
//! exceptions:
//!
//! - When the next record is a `PushState`, the pushed state is remembered
//!   on a stack and the current state's interval runs until the next
//!   `SetState` (the point where control is back at this level), not just
//!   until the push.
//! - When the next record is a `PopState`, the interval closed is the one
//!   opened by the matching push: from the push time to the pop time,
//!   attributed to the pushed state.
//!
//! The last record of a stream only supplies an end time.

use super::stats::StateStats;
use super::streams::WorkerStream;
use crate::parser::{Category, EventKind, Record};
use crate::utils::error::TraceError;
use log::{debug, warn};

/// A state entered by `PushState` and not yet popped
#[derive(Debug, Clone, PartialEq)]
pub struct OpenState {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub start_time: f64,
}

impl From<&Record> for OpenState {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            start_time: record.start_time,
        }
    }
}

/// Single-pass interval reconstruction over one worker stream
pub struct IntervalMachine<'a> {
    stream: &'a WorkerStream,
    stack: Vec<OpenState>,
    stats: StateStats,
}

impl<'a> IntervalMachine<'a> {
    pub fn new(stream: &'a WorkerStream) -> Self {
        Self {
            stream,
            stack: Vec::new(),
            stats: StateStats::new(),
        }
    }

    /// States currently open, innermost last
    pub fn open_states(&self) -> &[OpenState] {
        &self.stack
    }

    /// Process every interval of the stream, in event order
    ///
    /// # Errors
    /// * `TraceError::UnmatchedPop` - a `PopState` arrived with an empty stack
    pub fn run(mut self) -> Result<StateStats, TraceError> {
        let len = self.stream.len();
        for index in 0..len.saturating_sub(1) {
            self.step(index)?;
        }

        if !self.stack.is_empty() {
            debug!(
                "Worker {}: {} state(s) still open at end of stream",
                self.stream.worker_id,
                self.stack.len()
            );
        }

        Ok(self.stats)
    }

    /// Close the interval that starts at record `index`
    ///
    /// `index + 1` must be a valid record index.
    pub fn step(&mut self, index: usize) -> Result<(), TraceError> {
        let stream = self.stream;
        let records = &stream.records;
        let cur = &records[index];
        let nxt = &records[index + 1];

        match nxt.kind {
            EventKind::PushState => {
                self.stack.push(OpenState::from(nxt));
                let end = &records[set_state_lookahead(records, index + 1)];
                self.observe(
                    index,
                    cur.name.as_deref(),
                    cur.category.as_ref(),
                    cur.start_time,
                    end.start_time,
                );
            }
            EventKind::PopState => {
                let open = self.stack.pop().ok_or(TraceError::UnmatchedPop {
                    worker_id: stream.worker_id,
                    index: index + 1,
                    time: nxt.start_time,
                })?;
                self.observe(
                    index,
                    open.name.as_deref(),
                    open.category.as_ref(),
                    open.start_time,
                    nxt.start_time,
                );
            }
            _ => {
                self.observe(
                    index,
                    cur.name.as_deref(),
                    cur.category.as_ref(),
                    cur.start_time,
                    nxt.start_time,
                );
            }
        }

        Ok(())
    }

    fn observe(
        &mut self,
        index: usize,
        name: Option<&str>,
        category: Option<&Category>,
        start: f64,
        end: f64,
    ) {
        let duration = end - start;
        if duration < 0.0 {
            warn!(
                "Worker {}: negative duration {} for state {:?} at record {} (timestamps out of order)",
                self.stream.worker_id, duration, name, index
            );
        }
        self.stats.observe(name, category, duration);
    }
}

/// Index of the record that ends an interval interrupted by a push
///
/// Scans from `from` for the first `SetState`, never looking at the final
/// record of the stream. Without a match the scan stops on the last record
/// it examined; when there is nothing to scan, `from` itself is returned.
pub fn set_state_lookahead(records: &[Record], from: usize) -> usize {
    let last = records.len().saturating_sub(1);
    let mut end = from;
    for (offset, record) in records[from..last.max(from)].iter().enumerate() {
        end = from + offset;
        if record.kind == EventKind::SetState {
            break;
        }
    }
    end
}

/// Reconstruct one worker's per-state durations
///
/// Streams with fewer than two records produce an empty map.
///
/// # Errors
/// * `TraceError::UnmatchedPop` - a `PopState` without a matching push
pub fn compute_worker_stats(stream: &WorkerStream) -> Result<StateStats, TraceError> {
    debug!(
        "Computing intervals for worker {} ({} records)",
        stream.worker_id,
        stream.len()
    );
    IntervalMachine::new(stream).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(kind: EventKind, name: &str, category: Category, time: f64) -> Record {
        Record::new(kind, Some(name), Some(category), 0, time)
    }

    fn stream(records: Vec<Record>) -> WorkerStream {
        WorkerStream {
            worker_id: 0,
            records,
        }
    }

    #[test]
    fn test_flat_stream_conserves_time() {
        let s = stream(vec![
            rec(EventKind::SetState, "Initializing", Category::Runtime, 0.0),
            rec(EventKind::SetState, "Sleeping", Category::Other, 0.25),
            rec(EventKind::SetState, "Executing", Category::Runtime, 1.0),
            rec(EventKind::SetState, "Sleeping", Category::Other, 3.5),
            rec(EventKind::SetState, "Deinitializing", Category::Runtime, 4.0),
        ]);

        let stats = compute_worker_stats(&s).unwrap();
        assert_eq!(stats.total_duration(), 4.0);

        let sleeping = stats.get("Sleeping").unwrap();
        assert_eq!(sleeping.count, 2);
        assert_eq!(sleeping.duration, 1.25);
        // Last record only ends the previous interval
        assert!(stats.get("Deinitializing").is_none());
    }

    #[test]
    fn test_push_pop_nesting() {
        let s = stream(vec![
            rec(EventKind::SetState, "A", Category::Runtime, 0.0),
            rec(EventKind::PushState, "P", Category::Runtime, 1.0),
            rec(EventKind::SetState, "B", Category::Task, 1.0),
            rec(EventKind::SetState, "C", Category::Other, 3.0),
            rec(EventKind::PopState, "Q", Category::Runtime, 5.0),
        ]);

        let stats = compute_worker_stats(&s).unwrap();

        // A runs until control returns to its level through B
        assert_eq!(stats.get("A").unwrap().duration, 1.0);
        // P: zero-length push record interval, then push -> pop
        let pushed = stats.get("P").unwrap();
        assert_eq!(pushed.duration, 4.0);
        assert_eq!(pushed.count, 2);
        assert_eq!(stats.get("B").unwrap().duration, 2.0);
        // C's interval is replaced by the popped state
        assert!(stats.get("C").is_none());
        assert!(stats.get("Q").is_none());
    }

    #[test]
    fn test_pop_on_empty_stack_fails() {
        let s = stream(vec![
            rec(EventKind::SetState, "A", Category::Runtime, 0.0),
            rec(EventKind::PopState, "A", Category::Runtime, 2.0),
        ]);

        let err = compute_worker_stats(&s).unwrap_err();
        assert_eq!(
            err,
            TraceError::UnmatchedPop {
                worker_id: 0,
                index: 1,
                time: 2.0
            }
        );
    }

    #[test]
    fn test_short_streams_produce_nothing() {
        assert!(compute_worker_stats(&stream(vec![])).unwrap().is_empty());
        let single = stream(vec![rec(EventKind::SetState, "A", Category::Task, 1.0)]);
        assert!(compute_worker_stats(&single).unwrap().is_empty());
    }

    #[test]
    fn test_negative_duration_passes_through() {
        let s = stream(vec![
            rec(EventKind::SetState, "A", Category::Task, 5.0),
            rec(EventKind::SetState, "B", Category::Task, 2.0),
        ]);

        let stats = compute_worker_stats(&s).unwrap();
        assert_eq!(stats.get("A").unwrap().duration, -3.0);
    }

    #[test]
    fn test_lookahead_without_set_state() {
        let records = vec![
            rec(EventKind::SetState, "A", Category::Runtime, 0.0),
            rec(EventKind::PushState, "P", Category::Runtime, 1.0),
            rec(EventKind::PushState, "P2", Category::Runtime, 2.0),
            rec(EventKind::PopState, "P2", Category::Runtime, 3.0),
        ];
        // Scan covers indices 1..=2, stops on the last one examined
        assert_eq!(set_state_lookahead(&records, 1), 2);
        // Nothing left to scan
        assert_eq!(set_state_lookahead(&records, 3), 3);
    }

    #[test]
    fn test_push_at_end_of_stream() {
        let s = stream(vec![
            rec(EventKind::SetState, "A", Category::Runtime, 0.0),
            rec(EventKind::PushState, "P", Category::Runtime, 2.0),
        ]);

        let stats = compute_worker_stats(&s).unwrap();
        assert_eq!(stats.get("A").unwrap().duration, 2.0);
    }

    #[test]
    fn test_open_states_tracks_stack() {
        let s = stream(vec![
            rec(EventKind::SetState, "A", Category::Runtime, 0.0),
            rec(EventKind::PushState, "P", Category::Runtime, 1.0),
            rec(EventKind::SetState, "B", Category::Task, 1.5),
        ]);

        let mut machine = IntervalMachine::new(&s);
        machine.step(0).unwrap();
        assert_eq!(machine.open_states().len(), 1);
        assert_eq!(machine.open_states()[0].name.as_deref(), Some("P"));
        assert_eq!(machine.open_states()[0].start_time, 1.0);
    }
}
