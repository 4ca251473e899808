//! `tasks` subcommands - task store listings and research expansion.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use prdflow::research::{self, TaskSummary};
use prdflow::store::{self, TaskStore};

use super::emit;

fn open_store(root: &Path, file: Option<&Path>) -> Result<(PathBuf, TaskStore)> {
    let path = store::find_tasks_file(root, file)?;
    let tasks = store::load(&path)?;
    Ok((path, tasks))
}

#[derive(Serialize)]
struct ListPayload {
    tasks_file: PathBuf,
    total: usize,
    expanded: usize,
    pending_expansion: usize,
    tasks: Vec<TaskSummary>,
}

pub fn list(root: &Path, file: Option<&Path>) -> Result<()> {
    let (path, store) = open_store(root, file)?;
    let tasks = research::summarize(&store);
    let expanded = tasks.iter().filter(|t| t.has_research).count();
    emit(&ListPayload {
        tasks_file: path,
        total: tasks.len(),
        pending_expansion: tasks.len() - expanded,
        expanded,
        tasks,
    })
}

pub fn gen_prompt(root: &Path, task_id: &str, file: Option<&Path>, prd: Option<&Path>) -> Result<()> {
    let (_, store) = open_store(root, file)?;
    // Default PRD location is used only when the file actually exists.
    let prd_path = match prd {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = root.join(prdflow::paths::DOCS_DIR).join("prd.md");
            default.is_file().then_some(default)
        }
    };
    let prd_text = match &prd_path {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let prompt = research::build_research_prompt(&store, task_id, prd_text.as_deref())?;
    emit(&prompt)
}

#[derive(Serialize)]
struct WritePayload {
    success: bool,
    task_id: String,
    research_length: usize,
    tasks_file: PathBuf,
}

/// Write research into a task. `research` of `-` reads stdin.
pub fn write_research(
    root: &Path,
    task_id: &str,
    research: &str,
    file: Option<&Path>,
) -> Result<()> {
    let content = if research == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read research from stdin")?;
        buf
    } else {
        std::fs::read_to_string(research)
            .with_context(|| format!("Failed to read {}", research))?
    };
    let (path, mut store) = open_store(root, file)?;
    let result = research::write_research(&mut store, task_id, &content)?;
    store.save(&path)?;
    emit(&WritePayload {
        success: true,
        task_id: result.task_id,
        research_length: result.research_length,
        tasks_file: path,
    })
}

pub fn status(root: &Path, file: Option<&Path>) -> Result<()> {
    let (_, store) = open_store(root, file)?;
    emit(&research::expansion_status(&store))
}
