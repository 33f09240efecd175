use crate::error::{EngineResult, ScheduleError};
use chrono::{NaiveDate, TimeDelta};

pub mod backward_pass;
pub mod forward_pass;

pub use backward_pass::BackwardPass;
pub use forward_pass::ForwardPass;

pub(crate) fn add_days(date: NaiveDate, days: i64) -> EngineResult<NaiveDate> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| ScheduleError::calculation(format!("date overflow adding {days} days to {date}")))
}

pub(crate) fn sub_days(date: NaiveDate, days: i64) -> EngineResult<NaiveDate> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_sub_signed(delta))
        .ok_or_else(|| {
            ScheduleError::calculation(format!("date overflow subtracting {days} days from {date}"))
        })
}
