//! Bundled automation scripts.
//!
//! Five helper scripts are compiled into the binary and materialized into
//! the target project so task execution can track time, roll back to
//! checkpoints, and recover from crashes without prdflow installed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

const SCRIPTS: &[(&str, &str)] = &[
    ("track-time.py", include_str!("../templates/scripts/track-time.py")),
    ("rollback.sh", include_str!("../templates/scripts/rollback.sh")),
    (
        "learn-accuracy.py",
        include_str!("../templates/scripts/learn-accuracy.py"),
    ),
    (
        "security-audit.py",
        include_str!("../templates/scripts/security-audit.py"),
    ),
    (
        "execution-state.py",
        include_str!("../templates/scripts/execution-state.py"),
    ),
];

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub output_dir: PathBuf,
    pub files_created: Vec<String>,
    pub count: usize,
}

/// Write all bundled scripts into `output_dir`, marking them executable on
/// unix.
pub fn generate(output_dir: &Path) -> Result<GenerateResult> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let mut created = Vec::with_capacity(SCRIPTS.len());
    for (name, content) in SCRIPTS {
        let path = output_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        make_executable(&path)?;
        created.push((*name).to_string());
    }
    Ok(GenerateResult {
        output_dir: output_dir.to_path_buf(),
        count: created.len(),
        files_created: created,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to chmod {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_all_five_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("scripts");
        let result = generate(&out).unwrap();
        assert_eq!(result.count, 5);
        for (name, _) in SCRIPTS {
            assert!(out.join(name).is_file(), "missing {}", name);
        }
    }

    #[test]
    fn test_scripts_have_shebangs() {
        for (name, content) in SCRIPTS {
            assert!(content.starts_with("#!"), "{} lacks shebang", name);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let result = generate(dir.path()).unwrap();
        for name in &result.files_created {
            let mode = std::fs::metadata(dir.path().join(name))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111, "{} not executable", name);
        }
    }

    #[test]
    fn test_generate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        generate(dir.path()).unwrap();
        let result = generate(dir.path()).unwrap();
        assert_eq!(result.count, 5);
    }
}
