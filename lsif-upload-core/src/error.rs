//! Error type shared by every stage of the upload pipeline.
//!
//! Each variant carries the offending value, or the raw status and body returned by the
//! service, so the message printed at the CLI boundary is enough to self-diagnose.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;

use crate::contract::WorkspaceError;

/// Coarse classification of an [`UploadError`], used by callers and tests to branch on the
/// failure mode without matching on variant payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Resolution,
    Validation,
    NotFound,
    Transport,
    Stream,
    Parse,
    AuthScope,
    Auth,
    Remote,
    Browser,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// A context field could not be derived from the git workspace.
    #[error("unable to detect {field} from environment: {source}\nEither cd into a git repository or set --{flag} explicitly.")]
    Resolution {
        field: &'static str,
        flag: &'static str,
        #[source]
        source: WorkspaceError,
    },

    #[error("--root is outside the repository: {0}")]
    RootOutsideRepository(String),

    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("file does not exist: {}\nEither cd to the directory where it was generated or set --file explicitly.", .0.display())]
    DumpNotFound(PathBuf),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The compression worker failed while the body was being sent.
    #[error("failed to read and compress dump file: {0}")]
    Stream(#[source] io::Error),

    #[error("unexpected response body {body:?}: {source}")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("error: you must provide --github-token=TOKEN, where TOKEN is a GitHub personal access token with 'repo' or 'public_repo' scope")]
    AuthScope,

    #[error("error: {status}\n\n{body}")]
    Unauthorized { status: StatusCode, body: String },

    #[error("error: {status}\n\n{body}")]
    Remote { status: StatusCode, body: String },

    #[error("failed to open {url} in browser: {source}")]
    Browser {
        url: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open dump file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl UploadError {
    pub fn classification(&self) -> Classification {
        match self {
            UploadError::Resolution { .. } => Classification::Resolution,
            UploadError::RootOutsideRepository(_) | UploadError::InvalidEndpoint { .. } => {
                Classification::Validation
            }
            UploadError::DumpNotFound(_) => Classification::NotFound,
            UploadError::Transport(_) => Classification::Transport,
            UploadError::Stream(_) => Classification::Stream,
            UploadError::Parse { .. } => Classification::Parse,
            UploadError::AuthScope => Classification::AuthScope,
            UploadError::Unauthorized { .. } => Classification::Auth,
            UploadError::Remote { .. } => Classification::Remote,
            UploadError::Browser { .. } => Classification::Browser,
            UploadError::Io { .. } => Classification::Io,
        }
    }
}
