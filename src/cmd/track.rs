//! `track` subcommands - per-task time tracking.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use prdflow::track::{self, entry_key};

use super::emit;

#[derive(Serialize)]
struct ActionPayload {
    action: &'static str,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
}

pub fn start(root: &Path, task: &str, subtask: Option<&str>) -> Result<()> {
    let key = entry_key(task, subtask);
    let mut log = track::load(root);
    let entry = log.start(&key);
    track::save(root, &log)?;
    emit(&ActionPayload {
        action: "started",
        key,
        time: entry.started,
        duration: None,
    })
}

pub fn complete(root: &Path, task: &str, subtask: Option<&str>) -> Result<()> {
    let key = entry_key(task, subtask);
    let mut log = track::load(root);
    let entry = log.complete(&key);
    track::save(root, &log)?;
    emit(&ActionPayload {
        action: "completed",
        key,
        time: None,
        duration: entry.duration_minutes,
    })
}

pub fn report(root: &Path) -> Result<()> {
    let log = track::load(root);
    emit(&log.report())
}
