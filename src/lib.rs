pub mod calculations;
pub mod config;
pub mod engine;
pub mod error;
pub mod gantt;
pub mod graph;
pub mod resource;
pub mod schedule;
pub mod task;

pub use config::{ConfigError, EngineConfig};
pub use engine::{CriticalPathCalculator, calculate_critical_path};
pub use error::{EngineResult, ScheduleError};
pub use gantt::{GanttRow, gantt_dataframe, gantt_rows, render_text_table};
pub use resource::{DateWindow, InMemoryAvailability, ResourceAvailability, resolve_expected_start};
pub use schedule::ScheduleResult;
pub use task::{ScheduledTask, TaskId, TaskRecord, TaskSnapshot};
