use super::{TaskGraph, TaskNode};
use crate::config::EngineConfig;
use crate::error::{EngineResult, ScheduleError};
use crate::task::{TaskId, TaskRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub struct GraphBuilder<'a> {
    tasks: Option<&'a [TaskRecord]>,
    config: &'a EngineConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(tasks: Option<&'a [TaskRecord]>, config: &'a EngineConfig) -> Self {
        Self { tasks, config }
    }

    pub fn build(&self) -> EngineResult<TaskGraph> {
        // Step 1: Reject absent or empty input
        let tasks = self.tasks.ok_or(ScheduleError::NullTaskList)?;
        if tasks.is_empty() {
            return Err(ScheduleError::EmptyTaskList);
        }

        // Step 2: Register nodes, checking ids and durations
        let (mut nodes, id_to_index) = self.register_nodes(tasks)?;

        // Step 3: Resolve precedence and concurrency references
        self.resolve_predecessors(tasks, &mut nodes, &id_to_index)?;
        self.resolve_concurrents(tasks, &mut nodes, &id_to_index)?;

        // Step 4: Root tasks need a release date
        self.resolve_release_dates(tasks, &mut nodes)?;

        let mut precedence: DiGraph<TaskId, ()> = DiGraph::with_capacity(nodes.len(), 0);
        for node in &nodes {
            precedence.add_node(node.id);
        }
        for (ix, node) in nodes.iter().enumerate() {
            for &succ in &node.successors {
                precedence.add_edge(NodeIndex::new(ix), NodeIndex::new(succ), ());
            }
        }

        debug!(
            tasks = nodes.len(),
            precedence_edges = precedence.edge_count(),
            "task graph built"
        );
        Ok(TaskGraph::from_parts(nodes, id_to_index, precedence))
    }

    fn register_nodes(
        &self,
        tasks: &[TaskRecord],
    ) -> EngineResult<(Vec<TaskNode>, HashMap<TaskId, usize>)> {
        let mut nodes = Vec::with_capacity(tasks.len());
        let mut id_to_index = HashMap::with_capacity(tasks.len());

        for (ix, task) in tasks.iter().enumerate() {
            if id_to_index.insert(task.id, ix).is_some() {
                return Err(ScheduleError::DuplicateTaskId { task_id: task.id });
            }
            if task.duration_days <= 0 {
                return Err(ScheduleError::InvalidTaskDuration {
                    task_id: task.id,
                    duration_days: task.duration_days,
                });
            }
            nodes.push(TaskNode {
                id: task.id,
                name: task.name.clone(),
                duration_days: task.duration_days,
                release_date: None,
                predecessors: Vec::new(),
                successors: Vec::new(),
                concurrents: Vec::new(),
            });
        }
        Ok((nodes, id_to_index))
    }

    fn resolve_predecessors(
        &self,
        tasks: &[TaskRecord],
        nodes: &mut [TaskNode],
        id_to_index: &HashMap<TaskId, usize>,
    ) -> EngineResult<()> {
        for (ix, task) in tasks.iter().enumerate() {
            let mut seen = HashSet::with_capacity(task.predecessors.len());
            for &pred_id in &task.predecessors {
                let pred_ix = *id_to_index
                    .get(&pred_id)
                    .ok_or_else(|| ScheduleError::unknown_predecessor(task.id, pred_id))?;
                if pred_ix == ix {
                    return Err(ScheduleError::CircularDependency {
                        cycle: vec![task.id],
                    });
                }
                if !seen.insert(pred_ix) {
                    continue;
                }
                nodes[ix].predecessors.push(pred_ix);
                nodes[pred_ix].successors.push(ix);
            }
        }
        Ok(())
    }

    fn resolve_concurrents(
        &self,
        tasks: &[TaskRecord],
        nodes: &mut [TaskNode],
        id_to_index: &HashMap<TaskId, usize>,
    ) -> EngineResult<()> {
        let mut pairs: HashSet<(usize, usize)> = HashSet::new();
        for (ix, task) in tasks.iter().enumerate() {
            for &other_id in &task.concurrents {
                let other_ix = *id_to_index
                    .get(&other_id)
                    .ok_or_else(|| ScheduleError::unknown_concurrent(task.id, other_id))?;
                if other_ix == ix {
                    continue;
                }
                // The relation is symmetric; store each pair once on both ends.
                let key = (ix.min(other_ix), ix.max(other_ix));
                if pairs.insert(key) {
                    nodes[ix].concurrents.push(other_ix);
                    nodes[other_ix].concurrents.push(ix);
                }
            }
        }
        Ok(())
    }

    fn resolve_release_dates(
        &self,
        tasks: &[TaskRecord],
        nodes: &mut [TaskNode],
    ) -> EngineResult<()> {
        for (task, node) in tasks.iter().zip(nodes.iter_mut()) {
            if !node.is_root() {
                continue;
            }
            let release = task
                .expected_start
                .or(self.config.project_start)
                .ok_or(ScheduleError::MissingExpectedStart { task_id: task.id })?;
            node.release_date = Some(release);
        }
        Ok(())
    }
}
