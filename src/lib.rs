//! # prdflow - PRD workflow automation
//!
//! prdflow performs the deterministic half of an AI-driven PRD-to-tasks
//! workflow: document quality scoring, task-store manipulation, planning
//! arithmetic, and crash-recovery bookkeeping. Judgment calls (writing PRD
//! content, deciding task breakdowns) stay with the AI agent driving it.
//!
//! ## Core Concepts
//!
//! - **PRD**: a Product Requirements Document, scored by the [`validator`]
//!   against a fixed 13-check quality checklist
//! - **Task store**: a `tasks.json` file owned by an external taskmaster
//!   tool, read and written shape-preservingly by [`store`]
//! - **Execution state**: a small persisted record used for crash recovery
//!   across multi-task runs, managed by [`state`]
//!
//! ## Modules
//!
//! - [`validator`] - PRD quality scoring (checklist, sections, vague language)
//! - [`store`] - task store access with shape-preserving round-trips
//! - [`research`] - task research expansion helpers
//! - [`plan`] - task-count heuristics and checkpoint task generation
//! - [`state`] - execution state tracking for crash recovery
//! - [`track`] - per-task time tracking
//! - [`detect`] - taskmaster method detection (MCP vs CLI)
//! - [`preflight`] - project environment detection
//!
//! Every operation takes an explicit project root rather than assuming the
//! process working directory, so the whole library is testable against
//! temporary directories.
//!
//! ## Example
//!
//! ```
//! use prdflow::validator;
//!
//! let report = validator::validate_text("# My PRD\n\n## Executive Summary\nShort.");
//! assert!(report.score <= report.max_score as i64);
//! ```

pub mod backup;
pub mod detect;
pub mod exec;
pub mod init;
pub mod plan;
pub mod preflight;
pub mod progress;
pub mod research;
pub mod scripts;
pub mod state;
pub mod store;
pub mod template;
pub mod track;
pub mod validator;

/// Default path constants for the taskmaster directory structure.
///
/// All paths are relative to a project root; operations join them onto the
/// root they are given.
pub mod paths {
    /// Taskmaster project directory: `.taskmaster`
    pub const TASKMASTER_DIR: &str = ".taskmaster";
    /// Directory containing PRD documents: `.taskmaster/docs`
    pub const DOCS_DIR: &str = ".taskmaster/docs";
    /// Directory containing generated helper scripts: `.taskmaster/scripts`
    pub const SCRIPTS_DIR: &str = ".taskmaster/scripts";
    /// Directory containing state files: `.taskmaster/state`
    pub const STATE_DIR: &str = ".taskmaster/state";
    /// Conventional task store location: `.taskmaster/tasks/tasks.json`
    pub const TASKS_FILE: &str = ".taskmaster/tasks/tasks.json";
    /// Fallback task store location: `tasks/tasks.json`
    pub const TASKS_FILE_FALLBACK: &str = "tasks/tasks.json";
    /// Progress log appended to by `log-progress`: `.taskmaster/docs/progress.md`
    pub const PROGRESS_FILE: &str = ".taskmaster/docs/progress.md";
}

/// Generate a UTC timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SSZ`
///
/// This function uses `chrono::Utc::now()` to ensure the timestamp is truly
/// in UTC, not local time with a misleading `Z` suffix.
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
