use crate::calculations::backward_pass::LateDates;
use crate::calculations::forward_pass::EarlyDates;
use crate::error::{EngineResult, ScheduleError};
use crate::graph::{ConcurrencyClasses, TaskGraph};
use crate::task::{ScheduledTask, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one critical path calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Per-task dates, in input order.
    pub tasks: Vec<ScheduledTask>,
    pub project_duration_days: i64,
    /// Zero-slack tasks in topological order.
    pub critical_task_ids: Vec<TaskId>,
    pub earliest_start_date: NaiveDate,
    pub latest_finish_date: NaiveDate,
    pub topological_order: Vec<TaskId>,
}

impl ScheduleResult {
    pub fn task(&self, id: TaskId) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn is_critical(&self, id: TaskId) -> Option<bool> {
        self.task(id).map(|task| task.is_critical)
    }

    pub fn slack(&self, id: TaskId) -> Option<i64> {
        self.task(id).map(|task| task.slack_days)
    }

    pub fn critical_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_critical).count()
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.tasks.len()));
        parts.push(format!("critical={}", self.critical_count()));
        parts.push(format!("duration={}d", self.project_duration_days));
        parts.push(format!("finish={}", self.latest_finish_date));
        if !self.critical_task_ids.is_empty() {
            let chain = self
                .critical_task_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("path={chain}"));
        }
        parts.join(", ")
    }
}

/// Combines both passes into a `ScheduleResult` and verifies it.
pub struct ResultAssembler<'a> {
    graph: &'a TaskGraph,
    classes: &'a ConcurrencyClasses,
    order: &'a [usize],
}

impl<'a> ResultAssembler<'a> {
    pub fn new(graph: &'a TaskGraph, classes: &'a ConcurrencyClasses, order: &'a [usize]) -> Self {
        Self {
            graph,
            classes,
            order,
        }
    }

    pub fn assemble(
        &self,
        early: &[EarlyDates],
        late: &[LateDates],
    ) -> EngineResult<ScheduleResult> {
        if early.len() != self.graph.len() || late.len() != self.graph.len() {
            return Err(ScheduleError::calculation(format!(
                "expected dates for {} tasks, got {} early and {} late",
                self.graph.len(),
                early.len(),
                late.len()
            )));
        }

        let tasks: Vec<ScheduledTask> = self
            .graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(ix, node)| {
                let slack_days = (late[ix].start - early[ix].start).num_days();
                ScheduledTask {
                    id: node.id,
                    name: node.name.clone(),
                    duration_days: node.duration_days,
                    early_start: early[ix].start,
                    early_finish: early[ix].finish,
                    late_start: late[ix].start,
                    late_finish: late[ix].finish,
                    slack_days,
                    is_critical: slack_days == 0,
                    concurrency_class: self.classes.class_of(ix),
                }
            })
            .collect();

        self.verify(&tasks)?;

        let earliest_start_date = tasks
            .iter()
            .map(|task| task.early_start)
            .min()
            .ok_or_else(|| ScheduleError::calculation("no tasks to assemble"))?;
        let latest_early_finish = tasks
            .iter()
            .map(|task| task.early_finish)
            .max()
            .ok_or_else(|| ScheduleError::calculation("no tasks to assemble"))?;
        let latest_finish_date = tasks
            .iter()
            .map(|task| task.late_finish)
            .max()
            .unwrap_or(latest_early_finish);

        let critical_task_ids = self
            .order
            .iter()
            .filter(|&&ix| tasks[ix].is_critical)
            .map(|&ix| tasks[ix].id)
            .collect();

        Ok(ScheduleResult {
            project_duration_days: (latest_early_finish - earliest_start_date).num_days(),
            critical_task_ids,
            earliest_start_date,
            latest_finish_date,
            topological_order: self.graph.ids_of(self.order),
            tasks,
        })
    }

    fn verify(&self, tasks: &[ScheduledTask]) -> EngineResult<()> {
        for (pred, succ) in self.graph.precedence_edges() {
            if tasks[pred].early_finish > tasks[succ].early_start {
                return Err(ScheduleError::calculation(format!(
                    "task {} starts on {} before predecessor {} finishes on {}",
                    tasks[succ].id, tasks[succ].early_start, tasks[pred].id, tasks[pred].early_finish
                )));
            }
        }

        for task in tasks {
            // Start and finish share the duration, so comparing finishes covers starts too.
            if task.early_finish > task.late_finish {
                return Err(ScheduleError::calculation(format!(
                    "task {} has negative slack: late finish {} precedes early finish {}",
                    task.id, task.late_finish, task.early_finish
                )));
            }
            if (task.late_finish - task.early_finish).num_days() != task.slack_days {
                return Err(ScheduleError::calculation(format!(
                    "task {} has inconsistent start and finish slack",
                    task.id
                )));
            }
        }

        for members in self.classes.iter() {
            let Some((&first, rest)) = members.split_first() else {
                continue;
            };
            for &member in rest {
                if tasks[member].early_start != tasks[first].early_start
                    || tasks[member].late_finish != tasks[first].late_finish
                {
                    return Err(ScheduleError::calculation(format!(
                        "concurrent tasks {} and {} were not aligned",
                        tasks[first].id, tasks[member].id
                    )));
                }
            }
        }

        if !tasks.iter().any(|task| task.is_critical) {
            return Err(ScheduleError::calculation("no task has zero slack"));
        }
        Ok(())
    }
}
