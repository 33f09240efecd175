use crate::task::TaskId;
use thiserror::Error;

pub type EngineResult<T> = Result<T, ScheduleError>;

/// Failures raised while building, validating or solving a task graph.
///
/// Input errors (`NullTaskList` through `ConflictingConstraints`) are reported
/// before any date arithmetic runs. `CriticalPathCalculation` means the input
/// looked well formed but the computation could not produce a consistent
/// schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("task list is absent")]
    NullTaskList,

    #[error("task list is empty")]
    EmptyTaskList,

    #[error("duplicate task id {task_id}")]
    DuplicateTaskId { task_id: TaskId },

    #[error("task {task_id} has invalid duration {duration_days}; durations must be positive")]
    InvalidTaskDuration { task_id: TaskId, duration_days: i64 },

    #[error("task {task_id} references unknown {relation} {reference}")]
    UnknownTaskReference {
        task_id: TaskId,
        reference: TaskId,
        relation: &'static str,
    },

    #[error("task {task_id} has no predecessors and no expected start date")]
    MissingExpectedStart { task_id: TaskId },

    #[error("circular dependency between tasks {}", join_ids(.cycle))]
    CircularDependency { cycle: Vec<TaskId> },

    #[error("precedence and concurrency constraints contradict each other for tasks {}", join_ids(.task_ids))]
    ConflictingConstraints { task_ids: Vec<TaskId> },

    #[error("critical path calculation failed: {message}")]
    CriticalPathCalculation {
        message: String,
        #[source]
        source: Option<Box<ScheduleError>>,
    },
}

impl ScheduleError {
    pub fn calculation(message: impl Into<String>) -> Self {
        Self::CriticalPathCalculation {
            message: message.into(),
            source: None,
        }
    }

    pub fn calculation_caused_by(message: impl Into<String>, cause: ScheduleError) -> Self {
        Self::CriticalPathCalculation {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    pub fn unknown_predecessor(task_id: TaskId, reference: TaskId) -> Self {
        Self::UnknownTaskReference {
            task_id,
            reference,
            relation: "predecessor",
        }
    }

    pub fn unknown_concurrent(task_id: TaskId, reference: TaskId) -> Self {
        Self::UnknownTaskReference {
            task_id,
            reference,
            relation: "concurrent",
        }
    }

    /// True when the failure is caused by malformed input rather than by the
    /// computation itself.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::CriticalPathCalculation { .. })
    }

    /// Innermost error of a `CriticalPathCalculation` chain, or `self`.
    pub fn root_cause(&self) -> &ScheduleError {
        match self {
            Self::CriticalPathCalculation {
                source: Some(inner),
                ..
            } => inner.root_cause(),
            other => other,
        }
    }
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
