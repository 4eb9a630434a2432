use rec_state_stats::aggregator::metrics::Efficiencies;
use rec_state_stats::aggregator::state_machine::compute_worker_stats;
use rec_state_stats::aggregator::stats::{aggregate_workers, TimeBuckets};
use rec_state_stats::aggregator::streams::WorkerStreams;
use rec_state_stats::parser::{read_trace_file, Category, EventKind, Record};
use rec_state_stats::utils::error::{AggregateError, TraceError};
use std::path::PathBuf;

fn fixture_streams() -> WorkerStreams {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/trace.rec");
    WorkerStreams::from_records(read_trace_file(path).unwrap().records)
}

fn set(worker_id: i64, name: &str, category: Category, time: f64) -> Record {
    Record::new(EventKind::SetState, Some(name), Some(category), worker_id, time)
}

#[test]
fn test_streams_per_worker() {
    let streams = fixture_streams();
    let ids: Vec<i64> = streams.iter().map(|s| s.worker_id).collect();
    assert_eq!(ids, vec![0, 1, 2, -1]);
    assert_eq!(streams.get(1).unwrap().len(), 7);
}

#[test]
fn test_nested_worker() {
    let streams = fixture_streams();
    let stats = compute_worker_stats(streams.get(1).unwrap()).unwrap();

    assert_eq!(stats.get("Initializing").unwrap().duration, 0.5);
    // Sleeping extends through the push until Overhead is set
    assert_eq!(stats.get("Sleeping").unwrap().duration, 0.75);
    let scheduling = stats.get("Scheduling").unwrap();
    assert_eq!(scheduling.duration, 1.25);
    assert_eq!(scheduling.count, 3);
    assert!(stats.get("Overhead").is_none());
    assert_eq!(stats.get("vector_scal").unwrap().duration, 2.0);
}

#[test]
fn test_global_merge() {
    let stats = aggregate_workers(&fixture_streams()).unwrap();

    let names: Vec<_> = stats.iter().map(|s| s.name.clone().unwrap()).collect();
    assert_eq!(
        names,
        vec!["Initializing", "Overhead", "vector_scal", "Sleeping", "Scheduling"]
    );

    let init = stats.get("Initializing").unwrap();
    assert_eq!((init.count, init.duration), (3, 3.5));

    // Executed on workers 0 and 1 only
    let task = stats.get("vector_scal").unwrap();
    assert_eq!((task.count, task.duration), (2, 5.0));
    assert_eq!(task.category, Some(Category::Task));

    let sleeping = stats.get("Sleeping").unwrap();
    assert_eq!((sleeping.count, sleeping.duration), (3, 5.25));
}

#[test]
fn test_flat_worker_conserves_time() {
    let streams = WorkerStreams::from_records(vec![
        set(4, "Initializing", Category::Runtime, 10.0),
        set(4, "Overhead", Category::Runtime, 10.125),
        set(4, "spmv", Category::Task, 11.0),
        set(4, "Sleeping", Category::Other, 17.5),
        set(4, "spmv", Category::Task, 18.0),
        set(4, "Deinitializing", Category::Runtime, 20.0),
    ]);

    let stats = compute_worker_stats(streams.get(4).unwrap()).unwrap();
    assert_eq!(stats.total_duration(), 20.0 - 10.0);
}

#[test]
fn test_parallel_merge_matches_sequential() {
    let streams = fixture_streams();
    let parallel = aggregate_workers(&streams).unwrap();

    let locals: Vec<_> = streams
        .iter()
        .map(|s| compute_worker_stats(s).unwrap())
        .collect();
    let sequential = rec_state_stats::aggregator::merge_worker_stats(&locals);

    assert_eq!(parallel, sequential);
}

#[test]
fn test_unmatched_pop_reports_worker() {
    let streams = WorkerStreams::from_records(vec![
        set(0, "A", Category::Runtime, 0.0),
        set(0, "B", Category::Runtime, 1.0),
        set(7, "A", Category::Runtime, 0.0),
        Record::new(EventKind::PopState, None, None, 7, 3.0),
    ]);

    let err = aggregate_workers(&streams).unwrap_err();
    assert_eq!(
        err,
        TraceError::UnmatchedPop {
            worker_id: 7,
            index: 1,
            time: 3.0
        }
    );
}

#[test]
fn test_fixture_time_buckets() {
    let stats = aggregate_workers(&fixture_streams()).unwrap();
    let buckets = TimeBuckets::from_stats(&stats).unwrap();

    assert_eq!(buckets.runtime, 5.25);
    assert_eq!(buckets.task, 5.0);
    assert_eq!(buckets.idle, 5.25);
}

#[test]
fn test_unknown_category_is_fatal() {
    let streams = WorkerStreams::from_records(vec![
        set(0, "Executing", Category::Runtime, 0.0),
        set(0, "Transfer", "Gpu".parse().unwrap(), 1.0),
        set(0, "Sleeping", Category::Other, 2.0),
    ]);
    let stats = aggregate_workers(&streams).unwrap();

    let err = TimeBuckets::from_stats(&stats).unwrap_err();
    assert_eq!(err, AggregateError::UnknownCategory("Gpu".to_string()));
}

#[test]
fn test_fixture_efficiencies() {
    let stats = aggregate_workers(&fixture_streams()).unwrap();
    let buckets = TimeBuckets::from_stats(&stats).unwrap();

    let eff = Efficiencies::compute(&buckets, None).unwrap();
    assert_eq!(eff.task, 1.0);
    assert_eq!(eff.runtime, 0.487805);
    assert_eq!(eff.pipeline, 0.66129);
    assert_eq!(eff.parallel, 0.322581);

    let eff = Efficiencies::compute(&buckets, Some(2.5)).unwrap();
    assert_eq!(eff.task, 0.5);
    assert_eq!(eff.parallel, 0.16129);
}
