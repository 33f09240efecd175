//! Resource availability, consulted by callers before they build a snapshot.
//!
//! The engine never reads this module. Assignment workflows use it to pick an
//! `expected_start` for a task whose resource is busy, then hand the snapshot
//! to the calculator.

use crate::calculations::add_days;
use crate::error::EngineResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window starting on `start` and lasting `duration_days` days.
    pub fn spanning(start: NaiveDate, duration_days: i64) -> EngineResult<Self> {
        Ok(Self {
            start,
            end: add_days(start, duration_days)?,
        })
    }

    pub fn overlaps(&self, other: &DateWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub trait ResourceAvailability {
    /// Whether `resource` is free for the whole window.
    fn is_available(&self, resource: &str, window: DateWindow) -> bool;

    /// First date on or after `from` where `resource` is free for `duration_days`.
    fn next_available(
        &self,
        resource: &str,
        from: NaiveDate,
        duration_days: i64,
    ) -> EngineResult<NaiveDate>;
}

/// Bookings held in memory, keyed by resource id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryAvailability {
    bookings: HashMap<String, Vec<DateWindow>>,
}

impl InMemoryAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(&mut self, resource: impl Into<String>, window: DateWindow) {
        let windows = self.bookings.entry(resource.into()).or_default();
        windows.push(window);
        windows.sort_by_key(|w| (w.start, w.end));
    }

    pub fn bookings(&self, resource: &str) -> &[DateWindow] {
        self.bookings.get(resource).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl ResourceAvailability for InMemoryAvailability {
    fn is_available(&self, resource: &str, window: DateWindow) -> bool {
        !self
            .bookings(resource)
            .iter()
            .any(|booked| booked.overlaps(&window))
    }

    fn next_available(
        &self,
        resource: &str,
        from: NaiveDate,
        duration_days: i64,
    ) -> EngineResult<NaiveDate> {
        let mut candidate = from;
        // Bookings are sorted by start, so one sweep finds the first gap.
        for booked in self.bookings(resource) {
            let window = DateWindow::spanning(candidate, duration_days)?;
            if booked.overlaps(&window) {
                candidate = candidate.max(booked.end);
            }
        }
        Ok(candidate)
    }
}

/// Expected start for a task needing `resource`: `desired` if the resource is
/// free then, otherwise the next date it is.
pub fn resolve_expected_start<A: ResourceAvailability + ?Sized>(
    availability: &A,
    resource: &str,
    desired: NaiveDate,
    duration_days: i64,
) -> EngineResult<NaiveDate> {
    let window = DateWindow::spanning(desired, duration_days)?;
    if availability.is_available(resource, window) {
        return Ok(desired);
    }
    availability.next_available(resource, desired, duration_days)
}
