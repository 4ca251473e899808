//! Environment preflight: a single read-only snapshot of everything the
//! workflow needs to know before starting work.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::detect::{self, Detection, Method};
use crate::paths;
use crate::state::{self, CrashSummary};
use crate::store;

/// Combined environment report. Collection never fails; absent pieces show
/// up as zeros and `None`s.
#[derive(Debug, Clone, Serialize)]
pub struct Preflight {
    pub has_taskmaster: bool,
    pub taskmaster_method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taskmaster_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prd_path: Option<PathBuf>,
    pub task_count: usize,
    pub tasks_completed: usize,
    pub tasks_pending: usize,
    pub has_claude_md: bool,
    pub has_crash_state: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crash_state: Option<CrashSummary>,
}

/// Gather the full preflight snapshot for a project root.
pub fn run(root: &Path) -> Preflight {
    let has_taskmaster = root.join(paths::TASKMASTER_DIR).is_dir();
    let (prd_path, task_count, tasks_completed) = if has_taskmaster {
        let (count, done) = task_counts(root);
        (find_prd(root), count, done)
    } else {
        (None, 0, 0)
    };

    let detection: Detection = detect::detect(root);
    let crash = state::load(root).crash_summary();
    let has_crash_state = crash.has_incomplete;

    Preflight {
        has_taskmaster,
        taskmaster_method: detection.method,
        taskmaster_version: detection.version,
        prd_path,
        task_count,
        tasks_completed,
        tasks_pending: task_count.saturating_sub(tasks_completed),
        has_claude_md: root.join("CLAUDE.md").is_file(),
        has_crash_state,
        crash_state: has_crash_state.then_some(crash),
    }
}

/// Locate the PRD under `.taskmaster/docs/`: `prd.md`, `prd.txt`, then the
/// first other markdown file in sorted order.
pub fn find_prd(root: &Path) -> Option<PathBuf> {
    let docs = root.join(paths::DOCS_DIR);
    for name in ["prd.md", "prd.txt"] {
        let candidate = docs.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    let pattern = docs.join("*.md");
    let mut matches: Vec<PathBuf> = glob::glob(pattern.to_str()?)
        .ok()?
        .filter_map(Result::ok)
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Count tasks and completed tasks in the taskmaster store, if any.
fn task_counts(root: &Path) -> (usize, usize) {
    let path = root.join(paths::TASKS_FILE);
    if !path.is_file() {
        return (0, 0);
    }
    let tasks = store::load(&path).map(|s| s.tasks).unwrap_or_default();
    let completed = tasks.iter().filter(|t| t.status() == "done").count();
    (tasks.len(), completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_empty_root_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let report = run(dir.path());
        assert!(!report.has_taskmaster);
        assert!(report.prd_path.is_none());
        assert_eq!(report.task_count, 0);
        assert!(!report.has_claude_md);
        assert!(!report.has_crash_state);
        assert!(report.crash_state.is_none());
    }

    #[test]
    fn test_prd_md_preferred() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".taskmaster/docs/other.md"));
        touch(&dir.path().join(".taskmaster/docs/prd.txt"));
        touch(&dir.path().join(".taskmaster/docs/prd.md"));
        let found = find_prd(dir.path()).unwrap();
        assert!(found.ends_with(".taskmaster/docs/prd.md"));
    }

    #[test]
    fn test_prd_txt_beats_glob() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".taskmaster/docs/aaa.md"));
        touch(&dir.path().join(".taskmaster/docs/prd.txt"));
        let found = find_prd(dir.path()).unwrap();
        assert!(found.ends_with(".taskmaster/docs/prd.txt"));
    }

    #[test]
    fn test_glob_fallback_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".taskmaster/docs/zebra.md"));
        touch(&dir.path().join(".taskmaster/docs/alpha.md"));
        let found = find_prd(dir.path()).unwrap();
        assert!(found.ends_with(".taskmaster/docs/alpha.md"));
    }

    #[test]
    fn test_task_counts_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let tasks_path = dir.path().join(paths::TASKS_FILE);
        std::fs::create_dir_all(tasks_path.parent().unwrap()).unwrap();
        std::fs::write(
            &tasks_path,
            r#"{"tasks": [
                {"id": 1, "title": "a", "status": "done"},
                {"id": 2, "title": "b", "status": "pending"},
                {"id": 3, "title": "c", "status": "done"}
            ]}"#,
        )
        .unwrap();
        let report = run(dir.path());
        assert!(report.has_taskmaster);
        assert_eq!(report.task_count, 3);
        assert_eq!(report.tasks_completed, 2);
        assert_eq!(report.tasks_pending, 1);
    }

    #[test]
    fn test_crash_state_surfaces_incomplete_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut exec = crate::state::ExecutionState::default();
        exec.start(Some("4"), None, "sequential");
        crate::state::save(dir.path(), &exec).unwrap();
        let report = run(dir.path());
        assert!(report.has_crash_state);
        let crash = report.crash_state.unwrap();
        assert_eq!(crash.last_task.as_deref(), Some("4"));
    }
}
