use crate::error::{EngineResult, ScheduleError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Start date used for root tasks that carry no expected start of their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_start: Option<NaiveDate>,
    /// Fixpoint passes allowed per task before a pass is declared non-converging.
    pub iteration_factor: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            project_start: None,
            iteration_factor: 2,
        }
    }
}

impl EngineConfig {
    pub fn with_project_start(mut self, date: NaiveDate) -> Self {
        self.project_start = Some(date);
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.iteration_factor == 0 {
            return Err(ScheduleError::calculation(
                "iteration_factor must be at least 1",
            ));
        }
        Ok(())
    }

    /// Upper bound on fixpoint passes for a graph of `task_count` tasks.
    pub fn max_passes(&self, task_count: usize) -> usize {
        self.iteration_factor.max(1).saturating_mul(task_count) + 1
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(ScheduleError),
}
