use chrono::{Duration, NaiveDate};
use cpm_engine::{
    CriticalPathCalculator, EngineConfig, ScheduleError, TaskRecord, TaskSnapshot,
    calculate_critical_path,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap() + Duration::days(offset)
}

fn chain() -> Vec<TaskRecord> {
    vec![
        TaskRecord::new(1, "A", 2).with_expected_start(day(0)),
        TaskRecord::new(2, "B", 3).with_predecessors([1]),
        TaskRecord::new(3, "C", 4).with_predecessors([2]),
    ]
}

#[test]
fn repeated_calculation_is_identical() {
    let tasks = chain();
    let first = calculate_critical_path(&tasks).unwrap();
    let second = calculate_critical_path(&tasks).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn result_is_independent_of_input_order() {
    let mut reversed = chain();
    reversed.reverse();
    let forward = calculate_critical_path(&chain()).unwrap();
    let backward = calculate_critical_path(&reversed).unwrap();
    assert_eq!(forward.critical_task_ids, backward.critical_task_ids);
    for task in &forward.tasks {
        assert_eq!(Some(task), backward.task(task.id));
    }
}

#[test]
fn projections_match_the_full_result() {
    let tasks = chain();
    let calculator = CriticalPathCalculator::default();
    let b = &tasks[1];
    assert_eq!(calculator.early_start(b, &tasks).unwrap(), day(2));
    assert_eq!(calculator.early_finish(b, &tasks).unwrap(), day(5));
    assert_eq!(calculator.late_start(b, &tasks).unwrap(), day(2));
    assert_eq!(calculator.late_finish(b, &tasks).unwrap(), day(5));
    assert!(calculator.is_critical(b, &tasks).unwrap());
}

#[test]
fn projection_of_task_outside_snapshot_fails() {
    let tasks = chain();
    let stranger = TaskRecord::new(99, "Stranger", 1);
    let err = CriticalPathCalculator::default()
        .early_start(&stranger, &tasks)
        .unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::UnknownTaskReference { task_id: 99, .. }
    ));
}

#[test]
fn summary_lists_critical_chain() {
    let schedule = calculate_critical_path(&chain()).unwrap();
    assert_eq!(
        schedule.summary(),
        "tasks=3, critical=3, duration=9d, finish=2025-01-15, path=1->2->3"
    );
}

#[test]
fn topological_order_is_reported_by_id() {
    let schedule = calculate_critical_path(&chain()).unwrap();
    assert_eq!(schedule.topological_order, vec![1, 2, 3]);
}

#[test]
fn snapshot_json_feeds_the_calculator() {
    let raw = r#"{
        "tasks": [
            {"id": 1, "name": "Design", "duration_days": 2, "expected_start": "2025-01-06"},
            {"id": 2, "name": "Build", "duration_days": 3, "predecessors": [1]},
            {"id": 3, "name": "Docs", "duration_days": 3, "predecessors": [1], "concurrents": [2]}
        ]
    }"#;
    let snapshot = TaskSnapshot::from_json_str(raw).unwrap();
    let schedule = CriticalPathCalculator::default()
        .calculate(snapshot.tasks())
        .unwrap();
    assert_eq!(schedule.task(3).unwrap().early_start, day(2));
    assert_eq!(schedule.critical_task_ids, vec![1, 2, 3]);

    let null = TaskSnapshot::from_json_str(r#"{"tasks": null}"#).unwrap();
    assert_eq!(
        CriticalPathCalculator::default()
            .calculate(null.tasks())
            .unwrap_err(),
        ScheduleError::NullTaskList
    );
}

#[test]
fn config_file_supplies_project_start() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"project_start": "2025-02-03", "iteration_factor": 3}}"#).unwrap();
    let config = EngineConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.iteration_factor, 3);

    let tasks = vec![TaskRecord::new(1, "A", 1)];
    let schedule = CriticalPathCalculator::new(config).schedule(&tasks).unwrap();
    assert_eq!(
        schedule.earliest_start_date,
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
    );
}

#[test]
fn invalid_config_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"iteration_factor": 0}}"#).unwrap();
    assert!(EngineConfig::from_json_file(file.path()).is_err());

    let mut garbage = NamedTempFile::new().unwrap();
    write!(garbage, "not json").unwrap();
    assert!(EngineConfig::from_json_file(garbage.path()).is_err());
}

#[test]
fn calculator_is_shareable_across_threads() {
    let calculator = CriticalPathCalculator::default();
    let tasks = chain();
    let expected = calculator.schedule(&tasks).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| calculator.schedule(&tasks).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
