//! Task store access with shape-preserving round-trips.
//!
//! The task store is a `tasks.json` owned by an external taskmaster tool.
//! Three shapes exist in the wild: a bare task list, `{"tasks": [...]}`,
//! and `{"master": {"tasks": [...]}}`. The shape is captured on load and
//! restored on save, and unrecognized sibling keys at every wrapper level
//! survive the round trip. This module does not own the task schema;
//! unknown task fields are carried through a flattened map.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::paths;

fn is_false(v: &bool) -> bool {
    !v
}

/// One task record. Only the fields prdflow operates on are named; anything
/// else the external tool stores is preserved in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_notes: Option<String>,
    #[serde(
        rename = "_research_expanded",
        default,
        skip_serializing_if = "is_false"
    )]
    pub research_expanded: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Task id as a string; numeric ids render without quotes.
    pub fn id_str(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Status, defaulting to "pending" when the field is absent.
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("pending")
    }

    /// Dependency ids normalized to strings.
    pub fn dependency_ids(&self) -> Vec<String> {
        self.dependencies
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|d| match d {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            })
            .collect()
    }

    pub fn has_research(&self) -> bool {
        self.research_expanded || self.research_notes.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// The wrapper shape of the on-disk document, with any sibling keys that
/// must survive a round trip.
#[derive(Debug, Clone)]
pub enum StoreShape {
    /// A bare JSON array of tasks.
    Bare,
    /// `{"tasks": [...], ..extra}`
    Wrapped { extra: Map<String, Value> },
    /// `{"master": {"tasks": [...], ..master_extra}, ..extra}`
    Nested {
        master_extra: Map<String, Value>,
        extra: Map<String, Value>,
    },
    /// A JSON object with neither `tasks` nor `master`. Treated as an empty
    /// task list; saving writes the document back untouched.
    Foreign { document: Value },
}

/// An in-memory task store: the task list plus the shape to rewrap it in.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pub shape: StoreShape,
    pub tasks: Vec<Task>,
}

impl TaskStore {
    pub fn empty() -> Self {
        Self {
            shape: StoreShape::Bare,
            tasks: Vec::new(),
        }
    }

    /// Unwrap a parsed JSON document into tasks plus shape.
    ///
    /// A document that does not match any known shape yields an empty task
    /// list rather than an error, so tooling stays usable against
    /// partially-initialized projects.
    pub fn from_value(doc: Value) -> Self {
        match doc {
            Value::Array(_) => match serde_json::from_value::<Vec<Task>>(doc) {
                Ok(tasks) => Self {
                    shape: StoreShape::Bare,
                    tasks,
                },
                Err(err) => {
                    warn!("task list did not parse ({}); treating as empty", err);
                    Self::empty()
                }
            },
            Value::Object(mut obj) => {
                if let Some(Value::Object(mut master)) = obj.remove("master") {
                    let tasks = take_tasks(&mut master);
                    return Self {
                        shape: StoreShape::Nested {
                            master_extra: master,
                            extra: obj,
                        },
                        tasks,
                    };
                }
                if obj.contains_key("tasks") {
                    let tasks = take_tasks(&mut obj);
                    return Self {
                        shape: StoreShape::Wrapped { extra: obj },
                        tasks,
                    };
                }
                Self {
                    shape: StoreShape::Foreign {
                        document: Value::Object(obj),
                    },
                    tasks: Vec::new(),
                }
            }
            other => {
                warn!("task store is not a list or object; treating as empty");
                let _ = other;
                Self::empty()
            }
        }
    }

    /// Rewrap tasks into the original document shape.
    pub fn to_value(&self) -> Value {
        let tasks = serde_json::to_value(&self.tasks).unwrap_or(Value::Array(Vec::new()));
        match &self.shape {
            StoreShape::Bare => tasks,
            StoreShape::Wrapped { extra } => {
                let mut obj = extra.clone();
                obj.insert("tasks".to_string(), tasks);
                Value::Object(obj)
            }
            StoreShape::Nested {
                master_extra,
                extra,
            } => {
                let mut master = master_extra.clone();
                master.insert("tasks".to_string(), tasks);
                let mut obj = extra.clone();
                obj.insert("master".to_string(), Value::Object(master));
                Value::Object(obj)
            }
            StoreShape::Foreign { document } => document.clone(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id_str() == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id_str() == id)
    }

    /// Write the store back to disk, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(&self.to_value())
            .context("Failed to serialize task store")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn take_tasks(obj: &mut Map<String, Value>) -> Vec<Task> {
    let Some(raw) = obj.remove("tasks") else {
        return Vec::new();
    };
    match serde_json::from_value::<Vec<Task>>(raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!("tasks entry did not parse ({}); treating as empty", err);
            Vec::new()
        }
    }
}

/// Resolve the task store path: an explicit `--file` must exist; otherwise
/// the conventional locations under `root` are searched in order.
pub fn find_tasks_file(root: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        anyhow::bail!("File not found: {}", path.display());
    }
    for candidate in [paths::TASKS_FILE, paths::TASKS_FILE_FALLBACK] {
        let path = root.join(candidate);
        if path.exists() {
            return Ok(path);
        }
    }
    anyhow::bail!("No tasks.json found. Run from the project root or pass --file.")
}

/// Load a task store from disk.
///
/// The file must exist; malformed JSON degrades to an empty task list with
/// a warning instead of failing, per the usable-against-partial-projects
/// rule.
pub fn load(path: &Path) -> Result<TaskStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match serde_json::from_str::<Value>(&content) {
        Ok(doc) => Ok(TaskStore::from_value(doc)),
        Err(err) => {
            warn!("{} is not valid JSON ({}); treating as empty", path.display(), err);
            Ok(TaskStore::empty())
        }
    }
}
