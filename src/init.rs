//! Taskmaster project initialization.
//!
//! The CLI method runs `taskmaster init` directly. The MCP method cannot be
//! driven from a subprocess, so it emits the tool call the agent should
//! make instead.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{bail, Result};
use log::info;
use serde::Serialize;
use serde_json::json;

use crate::detect::find_cli;
use crate::exec::run_with_timeout;

const INIT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitMethod {
    Cli,
    Mcp,
}

/// Result of an initialization attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InitOutcome {
    Cli {
        method: &'static str,
        stdout: String,
        stderr: String,
        returncode: i32,
    },
    Mcp {
        method: &'static str,
        message: String,
        params: serde_json::Value,
    },
}

/// Initialize a taskmaster project at `root` using the given method.
pub fn init(root: &Path, method: InitMethod) -> Result<InitOutcome> {
    match method {
        InitMethod::Cli => init_cli(root),
        InitMethod::Mcp => Ok(init_mcp(root)),
    }
}

fn init_cli(root: &Path) -> Result<InitOutcome> {
    let Some(cli) = find_cli("taskmaster") else {
        bail!("taskmaster CLI not found on PATH");
    };
    info!("running taskmaster init in {}", root.display());
    let mut cmd = Command::new(cli);
    cmd.args(["init", "--yes", "--store-tasks-in-git", "--rules=claude"])
        .current_dir(root);
    match run_with_timeout(cmd, INIT_TIMEOUT)? {
        Some(output) => Ok(InitOutcome::Cli {
            method: "cli",
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            returncode: output.status.code().unwrap_or(-1),
        }),
        None => bail!("taskmaster init timed out after 60s"),
    }
}

/// Build the MCP readiness payload. No subprocess is involved; the agent
/// hosting the MCP server performs the actual call.
fn init_mcp(root: &Path) -> InitOutcome {
    InitOutcome::Mcp {
        method: "mcp",
        message: "Call the mcp__task-master-ai__initialize_project tool with these parameters"
            .to_string(),
        params: json!({
            "projectRoot": root.display().to_string(),
            "yes": true,
            "storeTasksInGit": true,
            "initGit": false,
            "rules": ["claude"],
        }),
    }
}
