use crate::calculations::{BackwardPass, ForwardPass};
use crate::config::EngineConfig;
use crate::error::{EngineResult, ScheduleError};
use crate::graph::{ConcurrencyClasses, GraphBuilder, topological_order};
use crate::schedule::{ResultAssembler, ScheduleResult};
use crate::task::{ScheduledTask, TaskRecord};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Critical path calculator over task snapshots.
///
/// Each call builds its own graph, solves it and throws it away, so one
/// calculator can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct CriticalPathCalculator {
    config: EngineConfig,
}

impl CriticalPathCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes the full schedule. `None` stands for an absent task collection.
    pub fn calculate(&self, tasks: Option<&[TaskRecord]>) -> EngineResult<ScheduleResult> {
        let result = self.run(tasks);
        match &result {
            Ok(schedule) => info!(
                tasks = schedule.tasks.len(),
                critical = schedule.critical_task_ids.len(),
                duration_days = schedule.project_duration_days,
                "critical path calculated"
            ),
            Err(err) => warn!(error = %err, "critical path calculation rejected"),
        }
        result
    }

    pub fn schedule(&self, tasks: &[TaskRecord]) -> EngineResult<ScheduleResult> {
        self.calculate(Some(tasks))
    }

    pub fn early_start(&self, task: &TaskRecord, all: &[TaskRecord]) -> EngineResult<NaiveDate> {
        self.project(task, all, |t| t.early_start)
    }

    pub fn early_finish(&self, task: &TaskRecord, all: &[TaskRecord]) -> EngineResult<NaiveDate> {
        self.project(task, all, |t| t.early_finish)
    }

    pub fn late_start(&self, task: &TaskRecord, all: &[TaskRecord]) -> EngineResult<NaiveDate> {
        self.project(task, all, |t| t.late_start)
    }

    pub fn late_finish(&self, task: &TaskRecord, all: &[TaskRecord]) -> EngineResult<NaiveDate> {
        self.project(task, all, |t| t.late_finish)
    }

    pub fn is_critical(&self, task: &TaskRecord, all: &[TaskRecord]) -> EngineResult<bool> {
        self.project(task, all, |t| t.is_critical)
    }

    fn project<T>(
        &self,
        task: &TaskRecord,
        all: &[TaskRecord],
        field: impl FnOnce(&ScheduledTask) -> T,
    ) -> EngineResult<T> {
        let schedule = self.schedule(all)?;
        schedule
            .task(task.id)
            .map(field)
            .ok_or(ScheduleError::UnknownTaskReference {
                task_id: task.id,
                reference: task.id,
                relation: "snapshot member",
            })
    }

    fn run(&self, tasks: Option<&[TaskRecord]>) -> EngineResult<ScheduleResult> {
        self.config.validate()?;

        let graph = GraphBuilder::new(tasks, &self.config).build()?;
        let order = topological_order(&graph)?;
        let classes = ConcurrencyClasses::compute(&graph);
        classes.check_against_precedence(&graph)?;

        let max_passes = self.config.max_passes(graph.len());
        let early = ForwardPass::new(&graph, &classes, &order, max_passes)
            .execute()
            .map_err(|err| stage_failed("forward pass", err))?;
        let late = BackwardPass::project_finish(&early)
            .and_then(|finish| {
                BackwardPass::new(&graph, &classes, &order, max_passes).execute(finish)
            })
            .map_err(|err| stage_failed("backward pass", err))?;

        ResultAssembler::new(&graph, &classes, &order)
            .assemble(&early, &late)
            .map_err(|err| stage_failed("result assembly", err))
    }
}

/// Wraps a failure from a date-computing stage, keeping it as the cause.
fn stage_failed(stage: &str, cause: ScheduleError) -> ScheduleError {
    let message = match &cause {
        ScheduleError::CriticalPathCalculation { message, .. } => format!("{stage}: {message}"),
        other => format!("{stage}: {other}"),
    };
    ScheduleError::calculation_caused_by(message, cause)
}

/// Computes a schedule with the default configuration.
pub fn calculate_critical_path(tasks: &[TaskRecord]) -> EngineResult<ScheduleResult> {
    CriticalPathCalculator::default().schedule(tasks)
}
