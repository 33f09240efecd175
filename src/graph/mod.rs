use crate::task::TaskId;
use chrono::NaiveDate;
use petgraph::graph::DiGraph;
use std::collections::HashMap;

pub mod builder;
pub mod cycle;
pub mod grouping;

pub use builder::GraphBuilder;
pub use cycle::topological_order;
pub use grouping::ConcurrencyClasses;

/// A task inside the arena. Relations are stored as arena indices.
#[derive(Debug, Clone)]
pub struct TaskNode {
    pub id: TaskId,
    pub name: String,
    pub duration_days: i64,
    /// Resolved start date for tasks without predecessors, `None` otherwise.
    pub release_date: Option<NaiveDate>,
    pub predecessors: Vec<usize>,
    pub successors: Vec<usize>,
    pub concurrents: Vec<usize>,
}

impl TaskNode {
    pub fn is_root(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }
}

/// Per-call graph snapshot: nodes in input order plus the precedence DAG.
///
/// Node `i` of `precedence` always corresponds to `nodes[i]`.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: Vec<TaskNode>,
    id_to_index: HashMap<TaskId, usize>,
    precedence: DiGraph<TaskId, ()>,
}

impl TaskGraph {
    pub(crate) fn from_parts(
        nodes: Vec<TaskNode>,
        id_to_index: HashMap<TaskId, usize>,
        precedence: DiGraph<TaskId, ()>,
    ) -> Self {
        Self {
            nodes,
            id_to_index,
            precedence,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &TaskNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[TaskNode] {
        &self.nodes
    }

    pub fn index_of(&self, id: TaskId) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    pub fn precedence(&self) -> &DiGraph<TaskId, ()> {
        &self.precedence
    }

    pub fn ids_of(&self, indices: &[usize]) -> Vec<TaskId> {
        indices.iter().map(|&ix| self.nodes[ix].id).collect()
    }

    /// All precedence edges as `(predecessor, successor)` arena indices.
    pub fn precedence_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(ix, node)| node.successors.iter().map(move |&succ| (ix, succ)))
    }
}
