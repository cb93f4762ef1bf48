//! Normalization of git remote URLs into repository names.
//!
//! Remotes come in two shapes:
//!
//! ```text
//! git@github.com:gorilla/mux.git      (scp-like SSH)
//! https://github.com/gorilla/mux.git  (URL, any scheme)
//! ```
//!
//! and both normalize to `github.com/gorilla/mux`.

use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized remote URL: {0}")]
pub struct UnrecognizedRemote(pub String);

fn scp_like() -> &'static regex::Regex {
    static SCP_LIKE: OnceLock<regex::Regex> = OnceLock::new();
    SCP_LIKE.get_or_init(|| {
        regex::Regex::new(r"^(?:[^@/:]+@)?(?P<host>[^@/:]+):(?P<path>[^/].*|/.+)$")
            .expect("static regex is valid")
    })
}

/// Converts a remote URL into the `host/path` repository name used by the indexing service.
pub fn parse_remote_url(remote: &str) -> Result<String, UnrecognizedRemote> {
    let remote = remote.trim();
    let unrecognized = || UnrecognizedRemote(remote.to_string());

    let (host, path) = if remote.contains("://") {
        let url = Url::parse(remote).map_err(|_| unrecognized())?;
        let host = url.host_str().ok_or_else(unrecognized)?.to_string();
        let path = percent_decode_str(url.path()).decode_utf8_lossy().into_owned();
        (host, path)
    } else {
        let captures = scp_like().captures(remote).ok_or_else(unrecognized)?;
        (captures["host"].to_string(), captures["path"].to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if host.is_empty() || path.is_empty() {
        return Err(unrecognized());
    }

    tracing::debug!(remote, host = %host, path, "Parsed remote URL");
    Ok(format!("{host}/{path}"))
}
