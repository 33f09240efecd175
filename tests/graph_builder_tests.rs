use chrono::NaiveDate;
use cpm_engine::{CriticalPathCalculator, EngineConfig, ScheduleError, TaskRecord};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn calculator() -> CriticalPathCalculator {
    CriticalPathCalculator::new(EngineConfig::default().with_project_start(d(2025, 1, 6)))
}

#[test]
fn absent_task_list_is_rejected() {
    let err = calculator().calculate(None).unwrap_err();
    assert_eq!(err, ScheduleError::NullTaskList);
    assert!(err.is_input_error());
}

#[test]
fn empty_task_list_is_rejected() {
    let err = calculator().schedule(&[]).unwrap_err();
    assert_eq!(err, ScheduleError::EmptyTaskList);
}

#[test]
fn zero_and_negative_durations_are_rejected() {
    let zero = vec![TaskRecord::new(1, "A", 2), TaskRecord::new(2, "B", 0)];
    assert_eq!(
        calculator().schedule(&zero).unwrap_err(),
        ScheduleError::InvalidTaskDuration {
            task_id: 2,
            duration_days: 0
        }
    );

    let negative = vec![TaskRecord::new(1, "A", -3)];
    assert!(matches!(
        calculator().schedule(&negative).unwrap_err(),
        ScheduleError::InvalidTaskDuration { task_id: 1, .. }
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let tasks = vec![TaskRecord::new(1, "A", 2), TaskRecord::new(1, "A again", 3)];
    assert_eq!(
        calculator().schedule(&tasks).unwrap_err(),
        ScheduleError::DuplicateTaskId { task_id: 1 }
    );
}

#[test]
fn unknown_references_are_rejected() {
    let missing_pred = vec![TaskRecord::new(1, "A", 2).with_predecessors([9])];
    assert_eq!(
        calculator().schedule(&missing_pred).unwrap_err(),
        ScheduleError::unknown_predecessor(1, 9)
    );

    let missing_partner = vec![TaskRecord::new(1, "A", 2).with_concurrents([8])];
    let err = calculator().schedule(&missing_partner).unwrap_err();
    assert_eq!(err, ScheduleError::unknown_concurrent(1, 8));
    assert_eq!(err.to_string(), "task 1 references unknown concurrent 8");
}

#[test]
fn self_precedence_is_a_cycle() {
    let tasks = vec![TaskRecord::new(1, "A", 2).with_predecessors([1])];
    assert_eq!(
        calculator().schedule(&tasks).unwrap_err(),
        ScheduleError::CircularDependency { cycle: vec![1] }
    );
}

#[test]
fn self_concurrency_is_ignored() {
    let tasks = vec![TaskRecord::new(1, "A", 2).with_concurrents([1])];
    let schedule = calculator().schedule(&tasks).unwrap();
    assert_eq!(schedule.critical_task_ids, vec![1]);
}

#[test]
fn root_without_any_start_date_is_rejected() {
    let tasks = vec![TaskRecord::new(1, "A", 2)];
    let err = CriticalPathCalculator::default().schedule(&tasks).unwrap_err();
    assert_eq!(err, ScheduleError::MissingExpectedStart { task_id: 1 });
}

#[test]
fn validation_runs_before_cycle_detection() {
    // Cycle between 1 and 2, but task 3 is malformed; the malformed input wins.
    let tasks = vec![
        TaskRecord::new(1, "A", 2).with_predecessors([2]),
        TaskRecord::new(2, "B", 2).with_predecessors([1]),
        TaskRecord::new(3, "C", 0),
    ];
    assert!(matches!(
        calculator().schedule(&tasks).unwrap_err(),
        ScheduleError::InvalidTaskDuration { task_id: 3, .. }
    ));
}
