//! [`Workspace`] backed by the `git` executable.

use std::path::PathBuf;
use std::process::Command;

use crate::contract::{Workspace, WorkspaceError};

/// Answers workspace queries by running `git` in a fixed directory.
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    dir: PathBuf,
}

impl GitWorkspace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A workspace rooted at the process's current directory.
    pub fn current() -> Self {
        Self::new(".")
    }

    fn git(&self, args: &[&str]) -> Result<String, WorkspaceError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| {
                tracing::error!(error = ?e, ?args, "Failed to launch git process");
                format!("failed to invoke git: {e}")
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(?args, status = ?output.status, stderr = %stderr.trim(), "Git exited with non-zero code");
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(format!("git {} returned empty output", args.join(" ")).into());
        }
        tracing::debug!(?args, output = %stdout, "Git query succeeded");
        Ok(stdout)
    }
}

impl Workspace for GitWorkspace {
    fn origin_url(&self) -> Result<String, WorkspaceError> {
        self.git(&["remote", "get-url", "origin"])
    }

    fn head_commit(&self) -> Result<String, WorkspaceError> {
        self.git(&["rev-parse", "HEAD"])
    }

    fn top_level(&self) -> Result<PathBuf, WorkspaceError> {
        self.git(&["rev-parse", "--show-toplevel"]).map(PathBuf::from)
    }
}
