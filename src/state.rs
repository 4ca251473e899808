//! Execution state tracking for crash recovery.
//!
//! A small JSON record under `.taskmaster/state/` remembers whether a
//! multi-task run is in progress so an interrupted session can be resumed.
//! Per task this is a two-state machine: idle on both ends, in_progress
//! between `start` and `complete`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{paths, utc_now_iso};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecStatus {
    #[default]
    Idle,
    InProgress,
}

/// The persisted execution state record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionState {
    #[serde(default)]
    pub status: ExecStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_subtask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub completed_tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checkpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Crash-recovery summary derived from the state record.
#[derive(Debug, Clone, Serialize)]
pub struct CrashSummary {
    pub has_incomplete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_subtask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
}

impl ExecutionState {
    /// Mark a task run as started.
    pub fn start(&mut self, task: Option<&str>, subtask: Option<&str>, mode: &str) {
        self.status = ExecStatus::InProgress;
        self.current_task = task.map(str::to_string);
        self.current_subtask = subtask.map(str::to_string);
        self.mode = Some(mode.to_string());
        self.last_updated = Some(utc_now_iso());
    }

    /// Mark a task as completed and return to idle.
    ///
    /// The task id is appended to `completed_tasks` unless already present.
    pub fn complete(&mut self, task: Option<&str>) {
        if let Some(id) = task {
            if !self.completed_tasks.iter().any(|t| t == id) {
                self.completed_tasks.push(id.to_string());
            }
        }
        self.status = ExecStatus::Idle;
        self.current_task = None;
        self.current_subtask = None;
        self.last_checkpoint = task.map(str::to_string);
        self.last_updated = Some(utc_now_iso());
    }

    /// Record a checkpoint without changing the run status.
    pub fn checkpoint(&mut self, task: Option<&str>) {
        self.last_checkpoint = task.map(str::to_string);
        self.last_updated = Some(utc_now_iso());
    }

    pub fn crash_summary(&self) -> CrashSummary {
        CrashSummary {
            has_incomplete: self.status == ExecStatus::InProgress,
            last_task: self.current_task.clone(),
            last_subtask: self.current_subtask.clone(),
            mode: self.mode.clone(),
            last_updated: self.last_updated.clone(),
            checkpoint: self.last_checkpoint.clone(),
        }
    }
}

pub fn state_file(root: &Path) -> PathBuf {
    root.join(paths::STATE_DIR).join("execution-state.json")
}

/// Load the execution state; missing or malformed files yield the default
/// idle state.
pub fn load(root: &Path) -> ExecutionState {
    let path = state_file(root);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return ExecutionState::default();
    };
    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            warn!(
                "{} did not parse ({}); starting from idle state",
                path.display(),
                err
            );
            ExecutionState::default()
        }
    }
}

pub fn save(root: &Path, state: &ExecutionState) -> Result<()> {
    let path = state_file(root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content =
        serde_json::to_string_pretty(state).context("Failed to serialize execution state")?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}
