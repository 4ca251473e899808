//! Research expansion over the task store.
//!
//! Mechanics only: listing expansion status, building the research prompt
//! for a task, and writing research text back. The research itself is done
//! by the agent driving this tool.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;

use crate::store::{Task, TaskStore};

/// Lines of PRD text included in a research prompt.
const PRD_CONTEXT_LINES: usize = 200;

/// Flat view of one task for listings.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub id: Value,
    pub title: String,
    pub status: String,
    pub dependencies: Vec<String>,
    pub has_research: bool,
    pub description_length: usize,
    pub subtask_count: usize,
}

impl TaskSummary {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title().to_string(),
            status: task.status().to_string(),
            dependencies: task.dependency_ids(),
            has_research: task.has_research(),
            description_length: task.description.as_deref().unwrap_or("").len(),
            subtask_count: task.subtasks.as_deref().map_or(0, <[Value]>::len),
        }
    }
}

pub fn summarize(store: &TaskStore) -> Vec<TaskSummary> {
    store.tasks.iter().map(TaskSummary::from_task).collect()
}

/// Expansion progress across the store.
#[derive(Debug, Clone, Serialize)]
pub struct ExpansionStatus {
    pub total: usize,
    pub expanded: usize,
    pub pending: usize,
    pub expanded_tasks: Vec<Value>,
    pub pending_tasks: Vec<Value>,
    pub all_expanded: bool,
}

pub fn expansion_status(store: &TaskStore) -> ExpansionStatus {
    let brief = |t: &Task| serde_json::json!({"id": t.id, "title": t.title()});
    let (expanded, pending): (Vec<&Task>, Vec<&Task>) =
        store.tasks.iter().partition(|t| t.has_research());
    ExpansionStatus {
        total: store.tasks.len(),
        expanded: expanded.len(),
        pending: pending.len(),
        all_expanded: pending.is_empty(),
        expanded_tasks: expanded.into_iter().map(brief).collect(),
        pending_tasks: pending.into_iter().map(brief).collect(),
    }
}

/// A generated research prompt for one task.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchPrompt {
    pub task_id: Value,
    pub title: String,
    pub prompt: String,
    pub research_questions: Vec<String>,
}

/// Build the research prompt for a task, folding in PRD context and
/// dependency titles when available.
pub fn build_research_prompt(
    store: &TaskStore,
    task_id: &str,
    prd_text: Option<&str>,
) -> Result<ResearchPrompt> {
    let Some(task) = store.find(task_id) else {
        bail!("Task {} not found", task_id);
    };
    let title = task.title();

    let prd_context = prd_text
        .map(|text| {
            let excerpt: Vec<&str> = text.lines().take(PRD_CONTEXT_LINES).collect();
            format!(
                "\n\nPRD CONTEXT (first {} lines):\n{}",
                PRD_CONTEXT_LINES,
                excerpt.join("\n")
            )
        })
        .unwrap_or_default();

    let dep_ids = task.dependency_ids();
    let dep_lines: Vec<String> = store
        .tasks
        .iter()
        .filter(|t| dep_ids.contains(&t.id_str()))
        .map(|t| format!("- Task {}: {}", t.id_str(), t.title()))
        .collect();
    let dep_context = if dep_lines.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nDEPENDENCY TASKS (must complete before this):\n{}",
            dep_lines.join("\n")
        )
    };

    let subtask_text = match task.subtasks.as_deref() {
        None | Some([]) => String::new(),
        Some(subtasks) => {
            let lines: Vec<String> = subtasks
                .iter()
                .map(|s| {
                    let label = s
                        .get("title")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .or_else(|| s.get("id").map(value_label))
                        .unwrap_or_default();
                    format!("- {}", label)
                })
                .collect();
            format!("\n\nSUBTASKS:\n{}", lines.join("\n"))
        }
    };

    let details_block = match task.details.as_deref() {
        Some(details) if !details.is_empty() => format!("DETAILS:\n{}", details),
        _ => String::new(),
    };

    let research_questions: Vec<String> = vec![
        format!(
            "What are the current best practices for implementing {} in 2026?",
            title
        ),
        format!(
            "What are common pitfalls and gotchas when building {}?",
            title
        ),
        format!(
            "What libraries, frameworks, or tools are recommended for {}?",
            title
        ),
        format!("What architectural patterns work best for {}?", title),
        format!("Are there open-source examples or references for {}?", title),
    ];
    let numbered: Vec<String> = research_questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect();

    let id = task.id_str();
    let prompt = format!(
        "You are expanding a TaskMaster task with research. DO NOT write any code or create files. \
         ONLY research and return a structured summary.\n\n\
         **Task {id}: {title}**\n\n\
         DESCRIPTION:\n{description}\n\n\
         {details_block}\n\
         {subtask_text}\n\
         {dep_context}{prd_context}\n\n\
         Research these questions using Perplexity MCP tools (perplexity_batch preferred, \
         perplexity_search as fallback):\n\n\
         {questions}\n\n\
         Return a structured summary with:\n\
         - Key findings per question (2-3 sentences each)\n\
         - Recommended implementation approach\n\
         - Specific libraries/tools with versions\n\
         - Code patterns to follow (max 15 lines each)\n\
         - Pitfalls and warnings\n\
         - Security considerations\n\
         - Any conflicting advice between sources\n\n\
         FORMAT your response as:\n\
         ---\n\
         ## Research: Task {id} - {title}\n\
         **Date**: YYYY-MM-DD\n\n\
         ### Key Findings\n\
         [Numbered findings matching the research questions]\n\n\
         ### Recommended Approach\n\
         - **Pattern**: [name]\n\
         - **Libraries**: [with versions]\n\
         - **Why**: [trade-off reasoning]\n\n\
         ### Key Code Pattern\n\
         ```[language]\n\
         [Most relevant snippet, max 15 lines]\n\
         ```\n\n\
         ### Pitfalls\n\
         - [Critical items to avoid]\n\n\
         ### Security Notes\n\
         - [Any security considerations]\n\n\
         ### Implementation Guidance\n\
         [2-4 sentences of specific implementation advice for this task]\n\
         ---",
        id = id,
        title = title,
        description = task.description.as_deref().unwrap_or(""),
        details_block = details_block,
        subtask_text = subtask_text,
        dep_context = dep_context,
        prd_context = prd_context,
        questions = numbered.join("\n"),
    );

    Ok(ResearchPrompt {
        task_id: task.id.clone(),
        title: title.to_string(),
        prompt,
        research_questions,
    })
}

fn value_label(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Result of writing research into a task.
#[derive(Debug, Clone, Serialize)]
pub struct WriteResult {
    pub task_id: String,
    pub research_length: usize,
}

/// Store research text on a task: `research_notes` holds the raw text, the
/// expansion flag is set, and the text is appended to `details`.
pub fn write_research(store: &mut TaskStore, task_id: &str, research: &str) -> Result<WriteResult> {
    let Some(task) = store.find_mut(task_id) else {
        bail!("Task {} not found", task_id);
    };
    task.research_notes = Some(research.to_string());
    task.research_expanded = true;
    task.details = match task.details.take() {
        Some(existing) if !existing.is_empty() => {
            Some(format!("{}\n\n---\n\n{}", existing, research))
        }
        _ => Some(research.to_string()),
    };
    Ok(WriteResult {
        task_id: task_id.to_string(),
        research_length: research.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_store() -> TaskStore {
        TaskStore::from_value(json!({"tasks": [
            {
                "id": 1,
                "title": "Set up database schema",
                "status": "done",
                "description": "Design the core tables"
            },
            {
                "id": 2,
                "title": "Build REST API",
                "status": "pending",
                "dependencies": [1],
                "description": "CRUD endpoints",
                "details": "Use the existing router",
                "subtasks": [{"id": "2.1", "title": "Auth middleware"}],
                "_research_expanded": true
            }
        ]}))
    }

    #[test]
    fn test_summarize_counts_fields() {
        let summaries = summarize(&sample_store());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].status, "done");
        assert!(!summaries[0].has_research);
        assert_eq!(summaries[1].dependencies, vec!["1"]);
        assert_eq!(summaries[1].subtask_count, 1);
        assert!(summaries[1].has_research);
    }

    #[test]
    fn test_expansion_status_partitions() {
        let status = expansion_status(&sample_store());
        assert_eq!(status.total, 2);
        assert_eq!(status.expanded, 1);
        assert_eq!(status.pending, 1);
        assert!(!status.all_expanded);
        assert_eq!(status.pending_tasks[0]["id"], 1);
    }

    #[test]
    fn test_prompt_includes_task_and_dependency_context() {
        let prompt = build_research_prompt(&sample_store(), "2", None).unwrap();
        assert_eq!(prompt.title, "Build REST API");
        assert_eq!(prompt.research_questions.len(), 5);
        assert!(prompt.prompt.contains("**Task 2: Build REST API**"));
        assert!(prompt.prompt.contains("CRUD endpoints"));
        assert!(prompt.prompt.contains("DETAILS:\nUse the existing router"));
        assert!(prompt.prompt.contains("- Auth middleware"));
        assert!(prompt
            .prompt
            .contains("- Task 1: Set up database schema"));
    }

    #[test]
    fn test_prompt_includes_truncated_prd_context() {
        let prd: String = (0..300)
            .map(|i| format!("line {}\n", i))
            .collect();
        let prompt = build_research_prompt(&sample_store(), "1", Some(&prd)).unwrap();
        assert!(prompt.prompt.contains("PRD CONTEXT (first 200 lines):"));
        assert!(prompt.prompt.contains("line 199"));
        assert!(!prompt.prompt.contains("line 200\n"));
    }

    #[test]
    fn test_prompt_unknown_task_is_error() {
        let err = build_research_prompt(&sample_store(), "99", None).unwrap_err();
        assert_eq!(err.to_string(), "Task 99 not found");
    }

    #[test]
    fn test_write_research_sets_fields() {
        let mut store = sample_store();
        let result = write_research(&mut store, "1", "## Findings\nUse migrations.").unwrap();
        assert_eq!(result.research_length, 27);
        let task = store.find("1").unwrap();
        assert!(task.research_expanded);
        assert_eq!(
            task.research_notes.as_deref(),
            Some("## Findings\nUse migrations.")
        );
        assert_eq!(task.details.as_deref(), Some("## Findings\nUse migrations."));
    }

    #[test]
    fn test_write_research_appends_to_existing_details() {
        let mut store = sample_store();
        write_research(&mut store, "2", "notes").unwrap();
        let task = store.find("2").unwrap();
        assert_eq!(
            task.details.as_deref(),
            Some("Use the existing router\n\n---\n\nnotes")
        );
    }

    #[test]
    fn test_write_research_unknown_task_is_error() {
        let mut store = sample_store();
        assert!(write_research(&mut store, "42", "x").is_err());
    }
}
