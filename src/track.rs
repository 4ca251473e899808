//! Per-task time tracking.
//!
//! Start/complete timestamps keyed by `task` or `task.subtask`, persisted
//! under `.taskmaster/state/time-tracking.json`. The report aggregates
//! completed entries so estimation accuracy can be reviewed later.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::DateTime;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{paths, utc_now_iso};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeLog {
    #[serde(default)]
    pub tasks: BTreeMap<String, TimeEntry>,
}

/// Aggregate view over completed entries with timing data.
#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    pub tasks_analyzed: usize,
    pub average_duration_minutes: f64,
    pub total_minutes: f64,
    pub tasks: BTreeMap<String, f64>,
}

/// Tracking key: `task` or `task.subtask`.
pub fn entry_key(task_id: &str, subtask_id: Option<&str>) -> String {
    match subtask_id {
        Some(sub) => format!("{}.{}", task_id, sub),
        None => task_id.to_string(),
    }
}

impl TimeLog {
    /// Record a start timestamp, replacing any previous entry for the key.
    pub fn start(&mut self, key: &str) -> TimeEntry {
        let entry = TimeEntry {
            started: Some(utc_now_iso()),
            completed: None,
            status: Some("in_progress".to_string()),
            duration_minutes: None,
        };
        self.tasks.insert(key.to_string(), entry.clone());
        entry
    }

    /// Record a completion timestamp and derive the duration when a start
    /// time is available.
    pub fn complete(&mut self, key: &str) -> TimeEntry {
        let entry = self.tasks.entry(key.to_string()).or_default();
        entry.completed = Some(utc_now_iso());
        entry.status = Some("done".to_string());
        if let (Some(started), Some(completed)) = (&entry.started, &entry.completed) {
            entry.duration_minutes = duration_minutes(started, completed);
        }
        entry.clone()
    }

    pub fn report(&self) -> TrackReport {
        let done: BTreeMap<String, f64> = self
            .tasks
            .iter()
            .filter(|(_, e)| e.status.as_deref() == Some("done"))
            .filter_map(|(k, e)| e.duration_minutes.map(|d| (k.clone(), d)))
            .collect();
        let total: f64 = done.values().sum();
        let average = if done.is_empty() {
            0.0
        } else {
            total / done.len() as f64
        };
        TrackReport {
            tasks_analyzed: done.len(),
            average_duration_minutes: round1(average),
            total_minutes: round1(total),
            tasks: done,
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn duration_minutes(started: &str, completed: &str) -> Option<f64> {
    let start = DateTime::parse_from_rfc3339(started).ok()?;
    let end = DateTime::parse_from_rfc3339(completed).ok()?;
    let minutes = (end - start).num_seconds() as f64 / 60.0;
    Some(round1(minutes))
}

pub fn track_file(root: &Path) -> PathBuf {
    root.join(paths::STATE_DIR).join("time-tracking.json")
}

/// Load the time log; missing or malformed files yield an empty log.
pub fn load(root: &Path) -> TimeLog {
    let path = track_file(root);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return TimeLog::default();
    };
    match serde_json::from_str(&content) {
        Ok(log) => log,
        Err(err) => {
            warn!("{} did not parse ({}); starting empty", path.display(), err);
            TimeLog::default()
        }
    }
}

pub fn save(root: &Path, log: &TimeLog) -> Result<()> {
    let path = track_file(root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(log).context("Failed to serialize time log")?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key() {
        assert_eq!(entry_key("3", None), "3");
        assert_eq!(entry_key("3", Some("2")), "3.2");
    }

    #[test]
    fn test_start_then_complete_has_duration() {
        let mut log = TimeLog::default();
        log.start("1");
        let entry = log.complete("1");
        assert_eq!(entry.status.as_deref(), Some("done"));
        let duration = entry.duration_minutes.expect("duration");
        assert!(duration >= 0.0);
    }

    #[test]
    fn test_complete_without_start_has_no_duration() {
        let mut log = TimeLog::default();
        let entry = log.complete("9");
        assert_eq!(entry.status.as_deref(), Some("done"));
        assert!(entry.duration_minutes.is_none());
    }

    #[test]
    fn test_duration_minutes_parsing() {
        let d = duration_minutes("2026-01-01T10:00:00Z", "2026-01-01T10:45:30Z").unwrap();
        assert_eq!(d, 45.5);
        assert!(duration_minutes("bogus", "2026-01-01T10:00:00Z").is_none());
    }

    #[test]
    fn test_report_aggregates_completed_only() {
        let mut log = TimeLog::default();
        log.tasks.insert(
            "1".into(),
            TimeEntry {
                started: None,
                completed: None,
                status: Some("done".into()),
                duration_minutes: Some(10.0),
            },
        );
        log.tasks.insert(
            "2".into(),
            TimeEntry {
                started: None,
                completed: None,
                status: Some("done".into()),
                duration_minutes: Some(20.0),
            },
        );
        log.start("3"); // in progress, excluded
        let report = log.report();
        assert_eq!(report.tasks_analyzed, 2);
        assert_eq!(report.total_minutes, 30.0);
        assert_eq!(report.average_duration_minutes, 15.0);
    }

    #[test]
    fn test_report_empty_log() {
        let report = TimeLog::default().report();
        assert_eq!(report.tasks_analyzed, 0);
        assert_eq!(report.total_minutes, 0.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = TimeLog::default();
        log.start("4");
        save(dir.path(), &log).unwrap();
        let reloaded = load(dir.path());
        assert!(reloaded.tasks.contains_key("4"));
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path()).tasks.is_empty());
    }
}
