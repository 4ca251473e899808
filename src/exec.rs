//! Bounded subprocess execution.
//!
//! External tools are probed fire-and-forget: a fixed deadline, no retry.
//! On timeout the child is killed and the caller falls back to its next
//! detection tier.

use std::io;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Run a command to completion with a deadline.
///
/// Returns `Ok(None)` when the deadline expires (the child is killed), and
/// an error when the command cannot be spawned at all. Output is collected
/// through pipes; callers only probe small-output commands like
/// `--version`.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> io::Result<Option<Output>> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn()?;
    let deadline = Instant::now() + timeout;

    loop {
        if child.try_wait()?.is_some() {
            return child.wait_with_output().map(Some);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_command_returns_output() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let output = run_with_timeout(cmd, Duration::from_secs(5))
            .expect("spawn")
            .expect("no timeout");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[test]
    fn test_timeout_returns_none() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let result = run_with_timeout(cmd, Duration::from_millis(100)).expect("spawn");
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let cmd = Command::new("definitely-not-a-real-binary-xyz");
        assert!(run_with_timeout(cmd, Duration::from_secs(1)).is_err());
    }
}
