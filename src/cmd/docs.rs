//! Document commands: `load-template`, `backup-prd`, and `log-progress`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use prdflow::progress::{self, EntryDetails};
use prdflow::{backup, template};

use super::emit;

pub fn load_template(template_type: &str) -> Result<()> {
    let info = template::load(template_type)?;
    emit(&info)
}

pub fn backup_prd(input: &Path) -> Result<()> {
    let result = backup::backup_prd(input)?;
    emit(&result)
}

#[derive(Serialize)]
struct ProgressPayload {
    path: PathBuf,
    task_id: String,
    timestamp: String,
}

#[allow(clippy::too_many_arguments)]
pub fn log_progress(
    root: &Path,
    task_id: &str,
    title: &str,
    duration: Option<String>,
    subtasks: Option<String>,
    tests: Option<String>,
    issues: Option<String>,
) -> Result<()> {
    let details = EntryDetails {
        duration,
        subtasks,
        tests,
        issues,
    };
    let result = progress::log_completion(root, task_id, title, &details)?;
    emit(&ProgressPayload {
        path: result.log_file,
        task_id: task_id.to_string(),
        timestamp: result.timestamp,
    })
}
