//! High-level pipeline: resolve → build → compress/send → interpret.
//!
//! This module provides the top-level orchestration for one `upload` invocation. It:
//!   - Resolves the [`UploadContext`] from options and the git workspace
//!   - Builds the upload request, or returns its `curl` rendering without touching the network
//!   - Streams the gzip-compressed dump to the service
//!   - Interprets the response and, on request, opens the status page in a browser
//!
//! # Error Handling
//! Every step fails fast with an [`UploadError`]; nothing is retried. When the browser cannot
//! be opened the run fails, even though the success lines were already printed.

use std::io::{IsTerminal, Write};

use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::context::{resolve, UploadContext, UploadOptions};
use crate::contract::{BrowserLauncher, Workspace};
use crate::error::UploadError;
use crate::request::{prepare, PreparedUpload};
use crate::response::{interpret, UploadReceipt};
use crate::transport::UploadClient;

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReport {
    Uploaded(UploadReceipt),
    Rendered(String),
}

pub struct UploadPipeline<W, B> {
    config: ServiceConfig,
    workspace: W,
    browser: B,
    client: UploadClient,
    interactive: bool,
}

impl<W, B> UploadPipeline<W, B>
where
    W: Workspace,
    B: BrowserLauncher,
{
    /// A pipeline using a default HTTP client; interactivity follows whether stdout is a terminal.
    pub fn new(config: ServiceConfig, workspace: W, browser: B) -> Self {
        Self {
            config,
            workspace,
            browser,
            client: UploadClient::new(),
            interactive: std::io::stdout().is_terminal(),
        }
    }

    pub fn with_client(mut self, client: UploadClient) -> Self {
        self.client = client;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Resolves the upload context for `options` without sending anything.
    pub fn resolve(&self, options: &UploadOptions) -> Result<UploadContext, UploadError> {
        resolve(options, &self.workspace)
    }

    /// Runs one upload end to end.
    pub async fn run(&self, options: &UploadOptions) -> Result<UploadReport, UploadError> {
        info!("[UPLOAD] Starting LSIF upload");
        let context = self.resolve(options)?;

        let request = match prepare(&self.config, &context, options.render_curl)? {
            PreparedUpload::Rendered(command) => {
                info!("[UPLOAD] Rendered curl command instead of uploading");
                return Ok(UploadReport::Rendered(command));
            }
            PreparedUpload::Execute(request) => request,
        };

        let exchange = self.client.send_file(&request).await?;
        let mut stdout = std::io::stdout();
        let hint_out: Option<&mut dyn Write> = if self.interactive {
            Some(&mut stdout)
        } else {
            None
        };
        let receipt = interpret(&request.endpoint, &request.repository, exchange, hint_out)?;

        println!();
        println!("LSIF dump successfully uploaded for processing.");
        println!("View processing status at {}.", receipt.status_page_url);

        if options.open {
            info!(url = %receipt.status_page_url, "[UPLOAD] Opening status page in browser");
            if let Err(source) = self.browser.open(&receipt.status_page_url) {
                error!(error = %source, "[UPLOAD][ERROR] Failed to open browser");
                return Err(UploadError::Browser {
                    url: receipt.status_page_url,
                    source,
                });
            }
        }

        Ok(UploadReport::Uploaded(receipt))
    }
}
