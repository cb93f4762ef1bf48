//! Request building: the upload URL, and the equivalent `curl` pipeline for `--get-curl`.
//!
//! The upload endpoint does not take a JSON body; everything besides the dump itself travels
//! in the query string, so the same URL serves both the real request and its rendering.

use std::path::PathBuf;

use reqwest::Url;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::context::UploadContext;
use crate::error::UploadError;

/// Path of the upload endpoint, relative to the service endpoint.
pub const UPLOAD_PATH: &str = "/.api/lsif/upload";

/// Content type identifying the (decompressed) body as line-delimited LSIF.
pub const LSIF_CONTENT_TYPE: &str = "application/x-ndjson+lsif";

/// A request ready for the transport. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: Url,
    pub dump_file: PathBuf,
    pub endpoint: String,
    pub repository: String,
    pub access_token: Option<String>,
}

impl UploadRequest {
    /// Value of the `Authorization` header, if an access token is configured.
    pub fn authorization(&self) -> Option<String> {
        self.access_token
            .as_deref()
            .map(|token| format!("token {token}"))
    }
}

/// What the request builder produced: something to send, or the shell command that would send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedUpload {
    Execute(UploadRequest),
    Rendered(String),
}

/// Query parameters for `context`, in a stable order, skipping empty values.
pub fn query_params(context: &UploadContext) -> Vec<(&'static str, &str)> {
    let candidates = [
        ("repository", Some(context.repository.as_str())),
        ("commit", Some(context.commit.as_str())),
        ("github_token", context.github_token.as_deref()),
        ("root", Some(context.root.as_str())),
        ("indexerName", context.indexer_name.as_deref()),
    ];
    candidates
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
}

/// `{endpoint}/.api/lsif/upload?{query}` for `context`.
pub fn upload_url(config: &ServiceConfig, context: &UploadContext) -> Result<Url, UploadError> {
    let raw = format!("{}{}", config.endpoint(), UPLOAD_PATH);
    let mut url = Url::parse(&raw).map_err(|e| UploadError::InvalidEndpoint {
        endpoint: config.endpoint().to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(UploadError::InvalidEndpoint {
            endpoint: config.endpoint().to_string(),
            reason: "endpoint must be an absolute http(s) URL".to_string(),
        });
    }

    let params = query_params(context);
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

/// Builds the upload request for `context`, or its shell rendering when `render_curl` is set.
pub fn prepare(
    config: &ServiceConfig,
    context: &UploadContext,
    render_curl: bool,
) -> Result<PreparedUpload, UploadError> {
    let request = UploadRequest {
        url: upload_url(config, context)?,
        dump_file: context.dump_file.clone(),
        endpoint: config.endpoint().to_string(),
        repository: context.repository.clone(),
        access_token: config.access_token().map(str::to_string),
    };
    debug!(url = %request.url, render_curl, "[UPLOAD] Prepared upload request");

    if render_curl {
        return Ok(PreparedUpload::Rendered(render_curl_command(&request)));
    }
    Ok(PreparedUpload::Execute(request))
}

/// Renders `request` as a copy-pasteable `gzip | curl` pipeline. Every argument is quoted on
/// its own so values containing spaces or quotes survive the shell.
pub fn render_curl_command(request: &UploadRequest) -> String {
    let file = request.dump_file.to_string_lossy();
    let content_type = format!("Content-Type: {LSIF_CONTENT_TYPE}");

    let mut lines = vec![
        format!("gzip -c {} | curl", shell_words::quote(&file)),
        "   -X POST".to_string(),
        format!("   {}", shell_words::join(["-H", content_type.as_str()])),
    ];
    if let Some(authorization) = request.authorization() {
        let header = format!("Authorization: {authorization}");
        lines.push(format!("   {}", shell_words::join(["-H", header.as_str()])));
    }
    lines.push(format!("   {}", shell_words::quote(request.url.as_str())));
    lines.push(format!("   {}", shell_words::join(["--data-binary", "@-"])));

    lines.join(" \\\n")
}
