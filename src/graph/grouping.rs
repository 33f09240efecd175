use super::TaskGraph;
use crate::error::{EngineResult, ScheduleError};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use std::collections::HashSet;

/// Partition of the tasks into same-start classes.
///
/// Class ids are dense and numbered by the first member's position in the
/// input, so the partition is identical for identical snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyClasses {
    class_of: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl ConcurrencyClasses {
    pub fn compute(graph: &TaskGraph) -> Self {
        let mut sets: UnionFind<usize> = UnionFind::new(graph.len());
        for (ix, node) in graph.nodes().iter().enumerate() {
            for &other in &node.concurrents {
                sets.union(ix, other);
            }
        }

        let mut root_to_class: Vec<Option<usize>> = vec![None; graph.len()];
        let mut class_of = Vec::with_capacity(graph.len());
        let mut members: Vec<Vec<usize>> = Vec::new();
        for ix in 0..graph.len() {
            let root = sets.find(ix);
            let class = match root_to_class[root] {
                Some(class) => class,
                None => {
                    let class = members.len();
                    root_to_class[root] = Some(class);
                    members.push(Vec::new());
                    class
                }
            };
            class_of.push(class);
            members[class].push(ix);
        }

        Self { class_of, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn class_of(&self, index: usize) -> usize {
        self.class_of[index]
    }

    pub fn members(&self, class: usize) -> &[usize] {
        &self.members[class]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.members.iter().map(Vec::as_slice)
    }

    /// Rejects precedence constraints that cannot coexist with the classes.
    ///
    /// Two members of one class start together, so no precedence path may
    /// connect them, directly or through other classes. Equivalently, the
    /// graph of classes induced by the precedence edges must be acyclic.
    pub fn check_against_precedence(&self, graph: &TaskGraph) -> EngineResult<()> {
        let mut quotient: DiGraph<usize, ()> = DiGraph::with_capacity(self.len(), 0);
        for class in 0..self.len() {
            quotient.add_node(class);
        }

        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for (pred, succ) in graph.precedence_edges() {
            let (from, to) = (self.class_of(pred), self.class_of(succ));
            if from == to {
                return Err(ScheduleError::ConflictingConstraints {
                    task_ids: graph.ids_of(&[pred, succ]),
                });
            }
            if seen.insert((from, to)) {
                quotient.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
        }

        if let Err(cycle) = toposort(&quotient, None) {
            let culprit = cycle.node_id();
            let mut tasks: Vec<usize> = tarjan_scc(&quotient)
                .into_iter()
                .find(|component| component.contains(&culprit))
                .unwrap_or_else(|| vec![culprit])
                .into_iter()
                .flat_map(|class| self.members(class.index()).iter().copied())
                .collect();
            tasks.sort_unstable();
            return Err(ScheduleError::ConflictingConstraints {
                task_ids: graph.ids_of(&tasks),
            });
        }
        Ok(())
    }
}
