use super::add_days;
use crate::error::{EngineResult, ScheduleError};
use crate::graph::{ConcurrencyClasses, TaskGraph};
use chrono::NaiveDate;
use tracing::debug;

/// Early dates of one task, indexed like the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarlyDates {
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

pub struct ForwardPass<'a> {
    graph: &'a TaskGraph,
    classes: &'a ConcurrencyClasses,
    order: &'a [usize],
    max_passes: usize,
}

impl<'a> ForwardPass<'a> {
    pub fn new(
        graph: &'a TaskGraph,
        classes: &'a ConcurrencyClasses,
        order: &'a [usize],
        max_passes: usize,
    ) -> Self {
        Self {
            graph,
            classes,
            order,
            max_passes,
        }
    }

    pub fn execute(&self) -> EngineResult<Vec<EarlyDates>> {
        let mut early_starts: Vec<Option<NaiveDate>> = vec![None; self.graph.len()];
        // Shared start of each class from the previous reconciliation.
        let mut class_starts: Vec<Option<NaiveDate>> = vec![None; self.classes.len()];

        for pass in 1..=self.max_passes {
            let mut changed = false;

            // Topological propagation
            for &ix in self.order {
                let own = self.own_early_start(ix, &early_starts)?;
                let start = match class_starts[self.classes.class_of(ix)] {
                    Some(shared) => own.max(shared),
                    None => own,
                };
                if early_starts[ix] != Some(start) {
                    early_starts[ix] = Some(start);
                    changed = true;
                }
            }

            // Class-maximum reconciliation
            for (class, members) in self.classes.iter().enumerate() {
                let shared = members.iter().filter_map(|&m| early_starts[m]).max();
                if let Some(shared) = shared {
                    class_starts[class] = Some(shared);
                    for &member in members {
                        if early_starts[member] != Some(shared) {
                            early_starts[member] = Some(shared);
                            changed = true;
                        }
                    }
                }
            }

            if !changed {
                debug!(passes = pass, "forward pass converged");
                return self.finish(&early_starts);
            }
        }

        Err(ScheduleError::calculation(format!(
            "forward pass did not stabilize within {} passes",
            self.max_passes
        )))
    }

    fn own_early_start(
        &self,
        ix: usize,
        early_starts: &[Option<NaiveDate>],
    ) -> EngineResult<NaiveDate> {
        let node = self.graph.node(ix);
        if node.is_root() {
            return node.release_date.ok_or_else(|| {
                ScheduleError::calculation(format!("task {} has no release date", node.id))
            });
        }

        let mut latest: Option<NaiveDate> = None;
        for &pred in &node.predecessors {
            let pred_node = self.graph.node(pred);
            let pred_start = early_starts[pred].ok_or_else(|| {
                ScheduleError::calculation(format!(
                    "predecessor {} of task {} was not scheduled before it",
                    pred_node.id, node.id
                ))
            })?;
            let pred_finish = add_days(pred_start, pred_node.duration_days)?;
            latest = Some(latest.map_or(pred_finish, |current| current.max(pred_finish)));
        }
        latest.ok_or_else(|| {
            ScheduleError::calculation(format!("task {} lost its predecessors", node.id))
        })
    }

    fn finish(&self, early_starts: &[Option<NaiveDate>]) -> EngineResult<Vec<EarlyDates>> {
        early_starts
            .iter()
            .enumerate()
            .map(|(ix, start)| {
                let node = self.graph.node(ix);
                let start = start.ok_or_else(|| {
                    ScheduleError::calculation(format!("task {} has no early start", node.id))
                })?;
                Ok(EarlyDates {
                    start,
                    finish: add_days(start, node.duration_days)?,
                })
            })
            .collect()
    }
}
