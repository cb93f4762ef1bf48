//! # contract: collaborators of the upload pipeline
//!
//! The pipeline talks to two things it does not own: the local version-control workspace and
//! the user's browser. Both are expressed as traits here so the pipeline can be driven by the
//! real implementations ([`crate::git::GitWorkspace`] and the CLI's system browser) or by
//! deterministic mocks in tests.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`; with the `test-export-mocks` feature (on by
//!   default) `MockWorkspace` and `MockBrowserLauncher` are available to downstream tests.

use std::path::PathBuf;

#[allow(unused_imports)]
use mockall::{automock, predicate::*};

/// Error type for workspace queries (simple boxed error, as the underlying tool varies).
pub type WorkspaceError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only queries against the version-control workspace the dump was generated in.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Workspace: Send + Sync {
    /// URL of the `origin` remote, exactly as configured.
    fn origin_url(&self) -> Result<String, WorkspaceError>;

    /// Hash of the currently checked-out commit.
    fn head_commit(&self) -> Result<String, WorkspaceError>;

    /// Absolute path of the repository's top-level directory.
    fn top_level(&self) -> Result<PathBuf, WorkspaceError>;
}

/// Opens a URL for the user, typically in the default web browser.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}
