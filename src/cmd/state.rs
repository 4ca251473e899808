//! `state` subcommands - execution state for crash recovery.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use prdflow::state::{self, ExecutionState};

use super::emit;

/// `state status`: the crash-recovery summary, flattened like the state
/// scripts print it.
pub fn status(root: &Path) -> Result<()> {
    let exec = state::load(root);
    emit(&exec.crash_summary())
}

#[derive(Serialize)]
struct ActionPayload<'a> {
    action: &'static str,
    #[serde(flatten)]
    state: &'a ExecutionState,
}

pub fn start(root: &Path, task: Option<&str>, subtask: Option<&str>, mode: &str) -> Result<()> {
    let mut exec = state::load(root);
    exec.start(task, subtask, mode);
    state::save(root, &exec)?;
    emit(&ActionPayload {
        action: "started",
        state: &exec,
    })
}

pub fn complete(root: &Path, task: Option<&str>) -> Result<()> {
    let mut exec = state::load(root);
    exec.complete(task);
    state::save(root, &exec)?;
    emit(&ActionPayload {
        action: "completed",
        state: &exec,
    })
}

pub fn checkpoint(root: &Path, task: Option<&str>) -> Result<()> {
    let mut exec = state::load(root);
    exec.checkpoint(task);
    state::save(root, &exec)?;
    emit(&ActionPayload {
        action: "checkpoint",
        state: &exec,
    })
}
