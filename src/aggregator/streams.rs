//! Group parsed records into one chronological stream per worker.

use crate::parser::Record;
use indexmap::IndexMap;
use log::debug;

/// All events of one worker, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerStream {
    pub worker_id: i64,
    pub records: Vec<Record>,
}

impl WorkerStream {
    pub fn new(worker_id: i64) -> Self {
        Self {
            worker_id,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Worker id -> stream, iterated in order of first appearance
///
/// Records are appended as-is; the trace is assumed to already be
/// chronological per worker, so nothing is re-sorted.
#[derive(Debug, Clone, Default)]
pub struct WorkerStreams {
    streams: IndexMap<i64, WorkerStream>,
}

impl WorkerStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build streams from records in file order
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut streams = Self::new();
        for record in records {
            streams.push(record);
        }
        debug!("Grouped records into {} worker streams", streams.len());
        streams
    }

    /// Append a record to its worker's stream, creating the stream on first sight
    pub fn push(&mut self, record: Record) {
        let worker_id = record.worker_id;
        self.streams
            .entry(worker_id)
            .or_insert_with(|| WorkerStream::new(worker_id))
            .records
            .push(record);
    }

    pub fn get(&self, worker_id: i64) -> Option<&WorkerStream> {
        self.streams.get(&worker_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkerStream> {
        self.streams.values()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EventKind;

    fn record(worker_id: i64, name: &str, time: f64) -> Record {
        Record::new(EventKind::SetState, Some(name), None, worker_id, time)
    }

    #[test]
    fn test_streams_keep_file_order() {
        let streams = WorkerStreams::from_records(vec![
            record(3, "a", 0.0),
            record(1, "b", 0.5),
            record(3, "c", 1.0),
            record(1, "d", 2.0),
        ]);

        assert_eq!(streams.len(), 2);
        let ids: Vec<i64> = streams.iter().map(|s| s.worker_id).collect();
        assert_eq!(ids, vec![3, 1]);

        let names: Vec<_> = streams
            .get(3)
            .unwrap()
            .records
            .iter()
            .map(|r| r.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_streams_do_not_resort() {
        let streams = WorkerStreams::from_records(vec![record(0, "late", 5.0), record(0, "early", 1.0)]);
        let stream = streams.get(0).unwrap();
        assert_eq!(stream.records[0].start_time, 5.0);
        assert_eq!(stream.records[1].start_time, 1.0);
    }

    #[test]
    fn test_empty() {
        let streams = WorkerStreams::from_records(Vec::new());
        assert!(streams.is_empty());
        assert!(streams.get(0).is_none());
    }
}
