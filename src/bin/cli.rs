use chrono::NaiveDate;
use cpm_engine::{
    CriticalPathCalculator, EngineConfig, ScheduleResult, TaskId, TaskRecord, TaskSnapshot,
    gantt_dataframe, render_text_table,
};
use std::fs;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Parses `1,2,3`; `-` means an empty list.
fn parse_id_list(s: &str) -> Result<Vec<TaskId>, String> {
    if s == "-" {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|p| {
            let p = p.trim();
            p.parse::<TaskId>().map_err(|_| format!("invalid task id '{p}'"))
        })
        .collect()
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               List the current task snapshot\n  add <id> <name> <duration_days> [preds_csv] [concurrents_csv]\n                                     Upsert a task (lists like 1,2,3; '-' for none)\n  start <id> <YYYY-MM-DD>            Set expected start of a task\n  remove <id>                        Remove a task and references to it\n  load <json_path>                   Replace the snapshot from a JSON file\n  config <json_path>                 Load engine config from a JSON file\n  compute                            Calculate the critical path\n  path                               Print the critical task ids\n  quit|exit                          Exit"
    );
}

fn print_tasks(tasks: &[TaskRecord]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    let join = |ids: &[TaskId]| {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    };
    for task in tasks {
        let start = task
            .expected_start
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<20} {:>4}d  start={:<10}  preds=[{}]  concurrents=[{}]",
            task.id,
            task.name,
            task.duration_days,
            start,
            join(&task.predecessors),
            join(&task.concurrents)
        );
    }
}

fn print_schedule(schedule: &ScheduleResult) {
    println!("Computed ({})", schedule.summary());
    match gantt_dataframe(schedule) {
        Ok(df) => print!("{}", render_text_table(&df)),
        Err(e) => println!("Error rendering schedule: {e}"),
    }
}

fn upsert(tasks: &mut Vec<TaskRecord>, record: TaskRecord) {
    match tasks.iter_mut().find(|t| t.id == record.id) {
        Some(existing) => {
            let expected_start = existing.expected_start;
            *existing = record;
            existing.expected_start = existing.expected_start.or(expected_start);
        }
        None => tasks.push(record),
    }
}

fn remove(tasks: &mut Vec<TaskRecord>, id: TaskId) -> bool {
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    for task in tasks.iter_mut() {
        task.predecessors.retain(|&p| p != id);
        task.concurrents.retain(|&c| c != id);
    }
    tasks.len() != before
}

fn load_snapshot(path: &str) -> Result<Option<Vec<TaskRecord>>, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let snapshot = TaskSnapshot::from_json_str(&raw).map_err(|e| e.to_string())?;
    Ok(snapshot.tasks)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut calculator = CriticalPathCalculator::default();
    // `None` until something is added or loaded; a snapshot file may also carry `null`.
    let mut tasks: Option<Vec<TaskRecord>> = None;
    let mut last: Option<ScheduleResult> = None;

    println!("Critical path engine (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => match &tasks {
                Some(list) => print_tasks(list),
                None => println!("No task list loaded."),
            },
            "add" => {
                let (Some(id_s), Some(name), Some(dur_s)) = (parts.next(), parts.next(), parts.next())
                else {
                    println!("Usage: add <id> <name> <duration_days> [preds_csv] [concurrents_csv]");
                    continue;
                };
                let Ok(id) = id_s.parse::<TaskId>() else {
                    println!("Invalid id");
                    continue;
                };
                let Ok(duration_days) = dur_s.parse::<i64>() else {
                    println!("Invalid duration_days");
                    continue;
                };
                let (preds, concurrents) = match (
                    parts.next().map(parse_id_list).transpose(),
                    parts.next().map(parse_id_list).transpose(),
                ) {
                    (Ok(preds), Ok(concurrents)) => {
                        (preds.unwrap_or_default(), concurrents.unwrap_or_default())
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        println!("Error: {e}");
                        continue;
                    }
                };
                let record = TaskRecord::new(id, name, duration_days)
                    .with_predecessors(preds)
                    .with_concurrents(concurrents);
                upsert(tasks.get_or_insert_with(Vec::new), record);
                println!("Task {id} upserted.");
            }
            "start" => {
                let (Some(id_s), Some(date_s)) = (parts.next(), parts.next()) else {
                    println!("Usage: start <id> <YYYY-MM-DD>");
                    continue;
                };
                let (Ok(id), Ok(date)) = (
                    id_s.parse::<TaskId>(),
                    NaiveDate::parse_from_str(date_s, "%Y-%m-%d"),
                ) else {
                    println!("Invalid id or date");
                    continue;
                };
                match tasks
                    .as_mut()
                    .and_then(|list| list.iter_mut().find(|t| t.id == id))
                {
                    Some(task) => {
                        task.expected_start = Some(date);
                        println!("Task {id} expected start set to {date}.");
                    }
                    None => println!("Task {id} not found."),
                }
            }
            "remove" => {
                let Some(Ok(id)) = parts.next().map(str::parse::<TaskId>) else {
                    println!("Usage: remove <id>");
                    continue;
                };
                match tasks.as_mut().map(|list| remove(list, id)) {
                    Some(true) => println!("Removed task {id}."),
                    _ => println!("Task {id} not found."),
                }
            }
            "load" => {
                let Some(path) = parts.next() else {
                    println!("Usage: load <json_path>");
                    continue;
                };
                match load_snapshot(path) {
                    Ok(loaded) => {
                        let count = loaded.as_ref().map_or(0, Vec::len);
                        tasks = loaded;
                        last = None;
                        println!("Loaded {count} tasks from {path}.");
                    }
                    Err(e) => println!("Error loading snapshot: {e}"),
                }
            }
            "config" => {
                let Some(path) = parts.next() else {
                    println!("Usage: config <json_path>");
                    continue;
                };
                match EngineConfig::from_json_file(path) {
                    Ok(config) => {
                        calculator = CriticalPathCalculator::new(config);
                        println!("Config loaded from {path}.");
                    }
                    Err(e) => println!("Error loading config: {e}"),
                }
            }
            "compute" => match calculator.calculate(tasks.as_deref()) {
                Ok(schedule) => {
                    print_schedule(&schedule);
                    last = Some(schedule);
                }
                Err(e) => {
                    println!("Compute error: {e}");
                    last = None;
                }
            },
            "path" => match &last {
                Some(schedule) => {
                    let chain = schedule
                        .critical_task_ids
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    println!("Critical path: {chain}");
                }
                None => println!("Nothing computed yet; run 'compute'."),
            },
            other => println!("Unknown command '{other}'. Type 'help'."),
        }
    }
}
