use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = i32;

/// One task as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub name: String,
    pub duration_days: i64,
    /// Earliest date the task may begin; only consulted for tasks without predecessors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_start: Option<NaiveDate>,
    #[serde(default)]
    pub predecessors: Vec<TaskId>,
    /// Tasks that must start on the same day as this one.
    #[serde(default)]
    pub concurrents: Vec<TaskId>,
}

impl TaskRecord {
    pub fn new(id: TaskId, name: impl Into<String>, duration_days: i64) -> Self {
        Self {
            id,
            name: name.into(),
            duration_days,
            expected_start: None,
            predecessors: Vec::new(),
            concurrents: Vec::new(),
        }
    }

    pub fn with_expected_start(mut self, date: NaiveDate) -> Self {
        self.expected_start = Some(date);
        self
    }

    pub fn with_predecessors(mut self, predecessors: impl IntoIterator<Item = TaskId>) -> Self {
        self.predecessors = predecessors.into_iter().collect();
        self
    }

    pub fn with_concurrents(mut self, concurrents: impl IntoIterator<Item = TaskId>) -> Self {
        self.concurrents = concurrents.into_iter().collect();
        self
    }
}

/// Envelope for a serialized task list. A missing or `null` `tasks` field is
/// kept as `None` so the engine can report it as an absent collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSnapshot {
    #[serde(default)]
    pub tasks: Option<Vec<TaskRecord>>,
}

impl TaskSnapshot {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn tasks(&self) -> Option<&[TaskRecord]> {
        self.tasks.as_deref()
    }
}

/// Computed dates for a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub name: String,
    pub duration_days: i64,
    pub early_start: NaiveDate,
    pub early_finish: NaiveDate,
    pub late_start: NaiveDate,
    pub late_finish: NaiveDate,
    pub slack_days: i64,
    pub is_critical: bool,
    pub concurrency_class: usize,
}
