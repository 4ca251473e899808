//! Timestamped PRD backups.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BackupResult {
    pub original: PathBuf,
    pub backup_path: PathBuf,
    pub timestamp: String,
}

/// Copy the PRD to a timestamped sibling before destructive edits.
pub fn backup_prd(input: &Path) -> Result<BackupResult> {
    if !input.is_file() {
        bail!("PRD file not found: {}", input.display());
    }
    let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let backup_name = format!("prd-backup-{}.md", timestamp);
    let backup_path = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(&backup_name),
        _ => PathBuf::from(&backup_name),
    };
    std::fs::copy(input, &backup_path).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            input.display(),
            backup_path.display()
        )
    })?;
    Ok(BackupResult {
        original: input.to_path_buf(),
        backup_path,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_copies_content() {
        let dir = tempfile::tempdir().unwrap();
        let prd = dir.path().join("prd.md");
        std::fs::write(&prd, "# My PRD\n").unwrap();
        let result = backup_prd(&prd).unwrap();
        assert!(result.backup_path.exists());
        assert_eq!(
            std::fs::read_to_string(&result.backup_path).unwrap(),
            "# My PRD\n"
        );
        let name = result.backup_path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("prd-backup-"));
        assert!(name.ends_with(".md"));
    }

    #[test]
    fn test_backup_lands_next_to_original() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();
        let prd = nested.join("prd.md");
        std::fs::write(&prd, "x").unwrap();
        let result = backup_prd(&prd).unwrap();
        assert_eq!(result.backup_path.parent().unwrap(), nested);
    }

    #[test]
    fn test_missing_input_is_error() {
        let err = backup_prd(Path::new("/nonexistent/prd.md")).unwrap_err();
        assert!(err.to_string().contains("PRD file not found"));
    }
}
