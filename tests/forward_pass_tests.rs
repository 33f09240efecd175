use chrono::{Duration, NaiveDate};
use cpm_engine::{ScheduleError, TaskRecord, calculate_critical_path};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap() + Duration::days(offset)
}

fn early(schedule: &cpm_engine::ScheduleResult, id: i32) -> (NaiveDate, NaiveDate) {
    let task = schedule.task(id).unwrap();
    (task.early_start, task.early_finish)
}

#[test]
fn single_task_starts_on_expected_start() {
    let tasks = vec![TaskRecord::new(1, "Solo", 4).with_expected_start(day(0))];
    let schedule = calculate_critical_path(&tasks).unwrap();
    let task = schedule.task(1).unwrap();
    assert_eq!(task.early_start, day(0));
    assert_eq!(task.early_finish, day(4));
    assert_eq!(task.late_finish, task.early_finish);
    assert_eq!(task.slack_days, 0);
    assert!(task.is_critical);
}

#[test]
fn linear_chain_accumulates_durations() {
    let tasks = vec![
        TaskRecord::new(1, "A", 2).with_expected_start(day(0)),
        TaskRecord::new(2, "B", 3).with_predecessors([1]),
        TaskRecord::new(3, "C", 4).with_predecessors([2]),
    ];
    let schedule = calculate_critical_path(&tasks).unwrap();

    assert_eq!(early(&schedule, 1), (day(0), day(2)));
    assert_eq!(early(&schedule, 2), (day(2), day(5)));
    assert_eq!(early(&schedule, 3), (day(5), day(9)));
    assert_eq!(schedule.project_duration_days, 9);
    assert_eq!(schedule.critical_task_ids, vec![1, 2, 3]);
}

#[test]
fn join_waits_for_slowest_predecessor() {
    let tasks = vec![
        TaskRecord::new(1, "A", 1).with_expected_start(day(0)),
        TaskRecord::new(2, "B", 5).with_predecessors([1]),
        TaskRecord::new(3, "C", 2).with_predecessors([1]),
        TaskRecord::new(4, "D", 1).with_predecessors([2, 3]),
    ];
    let schedule = calculate_critical_path(&tasks).unwrap();

    assert_eq!(early(&schedule, 2).1, day(6));
    assert_eq!(early(&schedule, 3).1, day(3));
    assert_eq!(early(&schedule, 4).0, day(6));
}

#[test]
fn expected_start_only_applies_to_roots() {
    let tasks = vec![
        TaskRecord::new(1, "A", 2).with_expected_start(day(0)),
        TaskRecord::new(2, "B", 1)
            .with_predecessors([1])
            .with_expected_start(day(10)),
    ];
    let schedule = calculate_critical_path(&tasks).unwrap();
    assert_eq!(early(&schedule, 2).0, day(2));
}

#[test]
fn later_root_release_delays_the_join() {
    let tasks = vec![
        TaskRecord::new(1, "A", 2).with_expected_start(day(0)),
        TaskRecord::new(2, "B", 1).with_expected_start(day(5)),
        TaskRecord::new(3, "C", 1).with_predecessors([1, 2]),
    ];
    let schedule = calculate_critical_path(&tasks).unwrap();
    assert_eq!(early(&schedule, 3), (day(6), day(7)));
    assert_eq!(schedule.earliest_start_date, day(0));
    assert_eq!(schedule.project_duration_days, 7);
    assert_eq!(schedule.slack(1), Some(4));
    assert_eq!(schedule.critical_task_ids, vec![2, 3]);
}

#[test]
fn concurrent_tasks_share_the_later_start() {
    let tasks = vec![
        TaskRecord::new(1, "X", 2)
            .with_expected_start(day(0))
            .with_concurrents([2]),
        TaskRecord::new(2, "Y", 5).with_expected_start(day(3)),
    ];
    let schedule = calculate_critical_path(&tasks).unwrap();

    assert_eq!(early(&schedule, 1), (day(3), day(5)));
    assert_eq!(early(&schedule, 2), (day(3), day(8)));
    let x = schedule.task(1).unwrap();
    let y = schedule.task(2).unwrap();
    assert_eq!(x.concurrency_class, y.concurrency_class);
}

#[test]
fn concurrency_pull_propagates_to_successors() {
    // Q would start on day 0, but R (after P) cannot start before day 4.
    let tasks = vec![
        TaskRecord::new(1, "P", 4).with_expected_start(day(0)),
        TaskRecord::new(2, "Q", 1)
            .with_expected_start(day(0))
            .with_concurrents([3]),
        TaskRecord::new(3, "R", 1).with_predecessors([1]),
        TaskRecord::new(4, "S", 2).with_predecessors([2]),
    ];
    let schedule = calculate_critical_path(&tasks).unwrap();

    assert_eq!(early(&schedule, 2), (day(4), day(5)));
    assert_eq!(early(&schedule, 3), (day(4), day(5)));
    assert_eq!(early(&schedule, 4), (day(5), day(7)));
    assert_eq!(schedule.project_duration_days, 7);
}

#[test]
fn transitive_concurrency_aligns_whole_class() {
    let tasks = vec![
        TaskRecord::new(1, "A", 1)
            .with_expected_start(day(1))
            .with_concurrents([2]),
        TaskRecord::new(2, "B", 1)
            .with_expected_start(day(0))
            .with_concurrents([3]),
        TaskRecord::new(3, "C", 1).with_expected_start(day(7)),
    ];
    let schedule = calculate_critical_path(&tasks).unwrap();
    for id in [1, 2, 3] {
        assert_eq!(early(&schedule, id).0, day(7));
    }
}

#[test]
fn two_node_cycle_produces_no_schedule() {
    let tasks = vec![
        TaskRecord::new(1, "A", 1).with_predecessors([2]),
        TaskRecord::new(2, "B", 1).with_predecessors([1]),
    ];
    assert_eq!(
        calculate_critical_path(&tasks).unwrap_err(),
        ScheduleError::CircularDependency { cycle: vec![1, 2] }
    );
}

#[test]
fn precedence_between_concurrent_partners_is_a_conflict() {
    let tasks = vec![
        TaskRecord::new(1, "A", 1)
            .with_expected_start(day(0))
            .with_concurrents([2]),
        TaskRecord::new(2, "B", 1).with_predecessors([1]),
    ];
    assert_eq!(
        calculate_critical_path(&tasks).unwrap_err(),
        ScheduleError::ConflictingConstraints {
            task_ids: vec![1, 2]
        }
    );
}
