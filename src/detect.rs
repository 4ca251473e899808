//! Taskmaster method detection.
//!
//! The external taskmaster can be reachable two ways: as an MCP server
//! wired into the agent's configuration, or as a CLI on PATH. MCP cannot be
//! probed directly from a subprocess, so detection looks for configuration
//! evidence and prefers it over the CLI; with neither, the method is
//! `none` and the caller must ask the user to install one.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::exec::run_with_timeout;

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Mcp,
    Cli,
    None,
}

/// Outcome of taskmaster detection.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub method: Method,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Detect the available taskmaster method: MCP > CLI > none.
pub fn detect(root: &Path) -> Detection {
    if has_mcp_evidence(root) {
        return Detection {
            method: Method::Mcp,
            version: None,
            path: None,
        };
    }
    if let Some(cli) = find_cli("taskmaster") {
        let version = cli_version(&cli);
        return Detection {
            method: Method::Cli,
            version,
            path: Some(cli),
        };
    }
    Detection {
        method: Method::None,
        version: None,
        path: None,
    }
}

/// Candidate MCP configuration files, most specific first.
fn mcp_config_candidates(root: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".claude").join("settings").join("mcp.json"));
        candidates.push(home.join(".config").join("claude-code").join("mcp.json"));
    }
    candidates.push(root.join(".mcp.json"));
    candidates
}

/// True when any MCP config registers a task-master server.
fn has_mcp_evidence(root: &Path) -> bool {
    for path in mcp_config_candidates(root) {
        if !path.is_file() {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let Ok(config) = serde_json::from_str::<Value>(&content) else {
            debug!("skipping unparseable MCP config {}", path.display());
            continue;
        };
        let servers = config
            .get("mcpServers")
            .or_else(|| config.get("servers"))
            .and_then(Value::as_object);
        if let Some(servers) = servers {
            if servers.keys().any(|k| k.to_lowercase().contains("task-master")) {
                debug!("found task-master MCP server in {}", path.display());
                return true;
            }
        }
    }
    false
}

/// Locate an executable on PATH.
pub fn find_cli(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{}.exe", name));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

/// Probe `<cli> --version` with a bounded timeout; failures and timeouts
/// yield no version rather than an error.
fn cli_version(cli: &Path) -> Option<String> {
    let mut cmd = Command::new(cli);
    cmd.arg("--version");
    match run_with_timeout(cmd, VERSION_PROBE_TIMEOUT) {
        Ok(Some(output)) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }
        Ok(Some(_)) => None,
        Ok(None) => {
            debug!("{} --version timed out", cli.display());
            None
        }
        Err(err) => {
            debug!("{} --version failed to spawn: {}", cli.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_mcp_config_detected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".mcp.json"),
            r#"{"mcpServers": {"task-master-ai": {"command": "x"}}}"#,
        )
        .unwrap();
        assert!(has_mcp_evidence(dir.path()));
    }

    #[test]
    fn test_mcp_key_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".mcp.json"),
            r#"{"servers": {"Task-Master": {}}}"#,
        )
        .unwrap();
        assert!(has_mcp_evidence(dir.path()));
    }

    #[test]
    fn test_unrelated_servers_are_not_evidence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".mcp.json"),
            r#"{"mcpServers": {"other-tool": {}}}"#,
        )
        .unwrap();
        assert!(!has_mcp_evidence(dir.path()));
    }

    #[test]
    fn test_malformed_mcp_config_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".mcp.json"), "{broken").unwrap();
        assert!(!has_mcp_evidence(dir.path()));
    }

    #[test]
    fn test_find_cli_missing() {
        assert!(find_cli("definitely-not-a-real-binary-xyz").is_none());
    }
}
