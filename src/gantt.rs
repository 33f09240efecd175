use crate::schedule::ScheduleResult;
use crate::task::TaskId;
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One bar of a Gantt chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttRow {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub slack_days: i64,
    pub is_critical: bool,
}

pub fn gantt_rows(schedule: &ScheduleResult) -> Vec<GanttRow> {
    schedule
        .tasks
        .iter()
        .map(|task| GanttRow {
            id: task.id,
            name: task.name.clone(),
            start: task.early_start,
            end: task.early_finish,
            slack_days: task.slack_days,
            is_critical: task.is_critical,
        })
        .collect()
}

/// Tabular view of a schedule, one row per task in input order.
pub fn gantt_dataframe(schedule: &ScheduleResult) -> PolarsResult<DataFrame> {
    let tasks = &schedule.tasks;
    let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let durations: Vec<i64> = tasks.iter().map(|t| t.duration_days).collect();
    let slack: Vec<i64> = tasks.iter().map(|t| t.slack_days).collect();
    let critical: Vec<bool> = tasks.iter().map(|t| t.is_critical).collect();

    let columns: Vec<Column> = vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
        date_series("early_start", tasks.iter().map(|t| t.early_start))?.into_column(),
        date_series("early_finish", tasks.iter().map(|t| t.early_finish))?.into_column(),
        date_series("late_start", tasks.iter().map(|t| t.late_start))?.into_column(),
        date_series("late_finish", tasks.iter().map(|t| t.late_finish))?.into_column(),
        Series::new(PlSmallStr::from_static("slack_days"), slack).into_column(),
        Series::new(PlSmallStr::from_static("is_critical"), critical).into_column(),
    ];
    DataFrame::new(columns)
}

fn date_series(name: &str, dates: impl Iterator<Item = NaiveDate>) -> PolarsResult<Series> {
    let days: Vec<i32> = dates.map(date_to_i32).collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as i32
}

/// Plain-text table of a frame, as printed by the CLI.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| match col.get(row_idx) {
                    Ok(AnyValue::Null) | Err(_) => String::new(),
                    Ok(AnyValue::String(s)) => s.to_string(),
                    Ok(av) => av.to_string(),
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = Vec::with_capacity(cells.len() + 4);
    out.push(sep.clone());
    out.push(render_row(col_names.as_slice()));
    out.push(sep.clone());
    for row in &cells {
        out.push(render_row(row.as_slice()));
    }
    out.push(sep);
    out.join("\n") + "\n"
}
