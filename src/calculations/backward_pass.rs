use super::forward_pass::EarlyDates;
use super::sub_days;
use crate::error::{EngineResult, ScheduleError};
use crate::graph::{ConcurrencyClasses, TaskGraph};
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LateDates {
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

pub struct BackwardPass<'a> {
    graph: &'a TaskGraph,
    classes: &'a ConcurrencyClasses,
    order: &'a [usize],
    max_passes: usize,
}

impl<'a> BackwardPass<'a> {
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

    /// Latest finish over all early finishes; every sink is bounded by it.
    pub fn project_finish(early: &[EarlyDates]) -> EngineResult<NaiveDate> {
        early
            .iter()
            .map(|dates| dates.finish)
            .max()
            .ok_or_else(|| ScheduleError::calculation("no early dates to derive a project finish"))
    }

    pub fn execute(&self, project_finish: NaiveDate) -> EngineResult<Vec<LateDates>> {
        let mut late_finishes: Vec<Option<NaiveDate>> = vec![None; self.graph.len()];
        let mut class_finishes: Vec<Option<NaiveDate>> = vec![None; self.classes.len()];

        for pass in 1..=self.max_passes {
            let mut changed = false;

            // Reverse topological propagation
            for &ix in self.order.iter().rev() {
                let own = self.own_late_finish(ix, project_finish, &late_finishes)?;
                let finish = match class_finishes[self.classes.class_of(ix)] {
                    Some(shared) => own.min(shared),
                    None => own,
                };
                if late_finishes[ix] != Some(finish) {
                    late_finishes[ix] = Some(finish);
                    changed = true;
                }
            }

            // Class-minimum reconciliation
            for (class, members) in self.classes.iter().enumerate() {
                let shared = members.iter().filter_map(|&m| late_finishes[m]).min();
                if let Some(shared) = shared {
                    class_finishes[class] = Some(shared);
                    for &member in members {
                        if late_finishes[member] != Some(shared) {
                            late_finishes[member] = Some(shared);
                            changed = true;
                        }
                    }
                }
            }

            if !changed {
                debug!(passes = pass, %project_finish, "backward pass converged");
                return self.finish(&late_finishes);
            }
        }

        Err(ScheduleError::calculation(format!(
            "backward pass did not stabilize within {} passes",
            self.max_passes
        )))
    }

    fn own_late_finish(
        &self,
        ix: usize,
        project_finish: NaiveDate,
        late_finishes: &[Option<NaiveDate>],
    ) -> EngineResult<NaiveDate> {
        let node = self.graph.node(ix);
        if node.is_sink() {
            return Ok(project_finish);
        }

        let mut earliest: Option<NaiveDate> = None;
        for &succ in &node.successors {
            let succ_node = self.graph.node(succ);
            let succ_finish = late_finishes[succ].ok_or_else(|| {
                ScheduleError::calculation(format!(
                    "successor {} of task {} was not scheduled before it",
                    succ_node.id, node.id
                ))
            })?;
            let succ_start = sub_days(succ_finish, succ_node.duration_days)?;
            earliest = Some(earliest.map_or(succ_start, |current| current.min(succ_start)));
        }
        earliest.ok_or_else(|| {
            ScheduleError::calculation(format!("task {} lost its successors", node.id))
        })
    }

    fn finish(&self, late_finishes: &[Option<NaiveDate>]) -> EngineResult<Vec<LateDates>> {
        late_finishes
            .iter()
            .enumerate()
            .map(|(ix, finish)| {
                let node = self.graph.node(ix);
                let finish = finish.ok_or_else(|| {
                    ScheduleError::calculation(format!("task {} has no late finish", node.id))
                })?;
                Ok(LateDates {
                    start: sub_days(finish, node.duration_days)?,
                    finish,
                })
            })
            .collect()
    }
}
