//! Context resolution: turns user options plus workspace queries into an [`UploadContext`].
//!
//! # Responsibilities
//! - Fill in the repository name, commit and project root from git when they are not given
//! - Check that the dump file exists before anything touches the network
//! - Normalize the project root so it never escapes the repository
//! - Report each resolved field on stdout as it is determined
//!
//! Fields are resolved in a fixed order (repository, commit, file, root) and the first failure
//! ends the run.

use std::path::{Component, Path, PathBuf};

use tracing::{error, info};

use crate::contract::{Workspace, WorkspaceError};
use crate::error::UploadError;
use crate::remote::parse_remote_url;

/// Default dump file, relative to the current directory.
pub const DEFAULT_DUMP_FILE: &str = "./dump.lsif";

/// Everything the user may supply for one upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub repo: Option<String>,
    pub commit: Option<String>,
    pub file: PathBuf,
    /// `Some` whenever the user passed a root, even an empty one.
    pub root: Option<String>,
    pub github_token: Option<String>,
    pub indexer_name: Option<String>,
    pub open: bool,
    pub render_curl: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            repo: None,
            commit: None,
            file: PathBuf::from(DEFAULT_DUMP_FILE),
            root: None,
            github_token: None,
            indexer_name: None,
            open: false,
            render_curl: false,
        }
    }
}

/// Fully resolved, immutable description of what is being uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadContext {
    pub repository: String,
    pub commit: String,
    pub dump_file: PathBuf,
    /// Repository-relative project root; empty for the repository root.
    pub root: String,
    pub github_token: Option<String>,
    pub indexer_name: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolves `options` against `workspace`, printing each field once it is known.
pub fn resolve<W>(options: &UploadOptions, workspace: &W) -> Result<UploadContext, UploadError>
where
    W: Workspace + ?Sized,
{
    let repository = match non_empty(&options.repo) {
        Some(repo) => repo.to_string(),
        None => {
            let resolution = |source: WorkspaceError| UploadError::Resolution {
                field: "repository",
                flag: "repo",
                source,
            };
            let remote = workspace.origin_url().map_err(resolution)?;
            parse_remote_url(&remote).map_err(|e| resolution(Box::new(e)))?
        }
    };
    println!("Repository: {repository}");

    let commit = match non_empty(&options.commit) {
        Some(commit) => commit.to_string(),
        None => workspace
            .head_commit()
            .map_err(|source| UploadError::Resolution {
                field: "commit",
                flag: "commit",
                source,
            })?,
    };
    println!("Commit: {commit}");

    let dump_file = options.file.clone();
    if !dump_file.is_file() {
        error!(path = %dump_file.display(), "Dump file does not exist");
        return Err(UploadError::DumpNotFound(dump_file));
    }
    println!("File: {}", dump_file.display());

    let root = match &options.root {
        Some(root) => root.clone(),
        None => derive_root(&dump_file, workspace).map_err(|source| UploadError::Resolution {
            field: "root of LSIF dump",
            flag: "root",
            source,
        })?,
    };
    let root = normalize_root(&root)?;
    println!("Root: {root}");

    info!(
        repository = %repository,
        commit = %commit,
        file = %dump_file.display(),
        root = %root,
        "[UPLOAD] Resolved upload context"
    );

    Ok(UploadContext {
        repository,
        commit,
        dump_file,
        root,
        github_token: non_empty(&options.github_token).map(str::to_string),
        indexer_name: non_empty(&options.indexer_name).map(str::to_string),
    })
}

/// Directory of `dump_file` relative to the workspace's top level.
fn derive_root<W>(dump_file: &Path, workspace: &W) -> Result<String, WorkspaceError>
where
    W: Workspace + ?Sized,
{
    let top_level = workspace.top_level()?;
    let top_level = top_level
        .canonicalize()
        .map_err(|e| format!("cannot resolve {}: {e}", top_level.display()))?;
    let file = dump_file
        .canonicalize()
        .map_err(|e| format!("cannot resolve {}: {e}", dump_file.display()))?;

    let relative = relative_path(&top_level, &file);
    let mut segments = relative;
    segments.pop();
    if segments.is_empty() {
        return Ok(".".to_string());
    }
    Ok(segments.join("/"))
}

/// Lexical path from `base` to `target`, as segments. Both paths must be absolute.
fn relative_path(base: &Path, target: &Path) -> Vec<String> {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let shared = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = base.len() - shared;
    std::iter::repeat("..".to_string())
        .take(ups)
        .chain(
            target[shared..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
        .collect()
}

/// Lexically cleans a slash-separated path: drops empty and `.` segments and folds `..` into
/// the preceding segment where possible. Returns `.` for an empty relative result.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Cleans a project root and rejects one that escapes the repository. The repository root
/// itself (`.` or `/`) becomes the empty string.
pub fn normalize_root(root: &str) -> Result<String, UploadError> {
    let cleaned = clean_path(root);
    if cleaned.split('/').next() == Some("..") {
        error!(root = %cleaned, "Root is outside the repository");
        return Err(UploadError::RootOutsideRepository(cleaned));
    }
    if cleaned == "." || cleaned == "/" {
        return Ok(String::new());
    }
    Ok(cleaned)
}
