use super::TaskGraph;
use crate::error::{EngineResult, ScheduleError};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::NodeIndex;

/// Topological order of all tasks over the precedence edges, as arena indices.
///
/// Fails with `CircularDependency` naming every task on the offending cycle
/// (the strongly connected component that contains it), in input order.
pub fn topological_order(graph: &TaskGraph) -> EngineResult<Vec<usize>> {
    match toposort(graph.precedence(), None) {
        Ok(order) => Ok(order.into_iter().map(NodeIndex::index).collect()),
        Err(cycle) => {
            let members = cycle_members(graph, cycle.node_id());
            Err(ScheduleError::CircularDependency {
                cycle: graph.ids_of(&members),
            })
        }
    }
}

fn cycle_members(graph: &TaskGraph, culprit: NodeIndex) -> Vec<usize> {
    let mut members: Vec<usize> = tarjan_scc(graph.precedence())
        .into_iter()
        .find(|component| component.contains(&culprit))
        .map(|component| component.into_iter().map(NodeIndex::index).collect())
        .unwrap_or_else(|| vec![culprit.index()]);
    members.sort_unstable();
    members
}
