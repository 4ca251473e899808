//! Append-only task progress log.
//!
//! Human-readable record of completed tasks at
//! `.taskmaster/docs/progress.md`, written once per completion and never
//! rewritten.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{paths, utc_now_iso};

const LOG_HEADER: &str = "# Task Progress Log\n\nAuto-generated by prdflow.\n\n---\n";

/// Optional detail fields for a progress entry.
#[derive(Debug, Clone, Default)]
pub struct EntryDetails {
    pub duration: Option<String>,
    pub subtasks: Option<String>,
    pub tests: Option<String>,
    pub issues: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogResult {
    pub log_file: PathBuf,
    pub timestamp: String,
}

/// Append one completion entry, creating the log with its header on first
/// use.
pub fn log_completion(
    root: &Path,
    task_id: &str,
    title: &str,
    details: &EntryDetails,
) -> Result<LogResult> {
    let path = root.join(paths::PROGRESS_FILE);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let is_new = !path.exists();
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if is_new {
        file.write_all(LOG_HEADER.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    let timestamp = utc_now_iso();
    let entry = format_entry(task_id, title, &timestamp, details);
    file.write_all(entry.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(LogResult {
        log_file: path,
        timestamp,
    })
}

fn format_entry(task_id: &str, title: &str, timestamp: &str, details: &EntryDetails) -> String {
    format!(
        "\n## Task {id}: {title} - COMPLETED\n\
         **Completed**: {timestamp}\n\
         **Duration**: {duration}\n\
         **Subtasks**: {subtasks}\n\
         **Tests**: {tests}\n\
         **Issues**: {issues}\n\
         **Git**: Merged to main, tagged as checkpoint-task-{id}\n\n",
        id = task_id,
        title = title,
        timestamp = timestamp,
        duration = details.duration.as_deref().unwrap_or("N/A"),
        subtasks = details.subtasks.as_deref().unwrap_or("N/A"),
        tests = details.tests.as_deref().unwrap_or("N/A"),
        issues = details.issues.as_deref().unwrap_or("None"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            log_completion(dir.path(), "3", "Build parser", &EntryDetails::default()).unwrap();
        let content = std::fs::read_to_string(&result.log_file).unwrap();
        assert!(content.starts_with("# Task Progress Log"));
        assert!(content.contains("## Task 3: Build parser - COMPLETED"));
        assert!(content.contains("**Duration**: N/A"));
        assert!(content.contains("**Issues**: None"));
        assert!(content.contains("checkpoint-task-3"));
    }

    #[test]
    fn test_entries_append_without_second_header() {
        let dir = tempfile::tempdir().unwrap();
        log_completion(dir.path(), "1", "A", &EntryDetails::default()).unwrap();
        let result = log_completion(dir.path(), "2", "B", &EntryDetails::default()).unwrap();
        let content = std::fs::read_to_string(&result.log_file).unwrap();
        assert_eq!(content.matches("# Task Progress Log").count(), 1);
        assert!(content.contains("## Task 1: A"));
        assert!(content.contains("## Task 2: B"));
    }

    #[test]
    fn test_details_are_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let details = EntryDetails {
            duration: Some("42 min".into()),
            subtasks: Some("3 of 3".into()),
            tests: Some("18 passed".into()),
            issues: Some("flaky CI".into()),
        };
        let result = log_completion(dir.path(), "5", "Ship it", &details).unwrap();
        let content = std::fs::read_to_string(&result.log_file).unwrap();
        assert!(content.contains("**Duration**: 42 min"));
        assert!(content.contains("**Subtasks**: 3 of 3"));
        assert!(content.contains("**Tests**: 18 passed"));
        assert!(content.contains("**Issues**: flaky CI"));
    }
}
