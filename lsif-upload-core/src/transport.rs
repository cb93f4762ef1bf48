//! HTTP transport: one POST of the compressed dump to the upload endpoint.
//!
//! Uploads are not idempotent on the service side, so nothing here retries. Connection
//! failures and timeouts come back as [`UploadError::Transport`] exactly as `reqwest` reported
//! them.

use std::io;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Body, StatusCode};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use crate::compress::gzip_stream;
use crate::error::UploadError;
use crate::request::{UploadRequest, LSIF_CONTENT_TYPE};

/// Status and body of the service's reply, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Result of a completed exchange: the server's reply plus how compressing the body went.
#[derive(Debug)]
pub struct Exchange {
    pub response: RawResponse,
    /// Uncompressed bytes sent, or the error that cut the body short.
    pub stream: io::Result<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct UploadClient {
    http: reqwest::Client,
}

impl UploadClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Opens the request's dump file and sends it.
    pub async fn send_file(&self, request: &UploadRequest) -> Result<Exchange, UploadError> {
        let file = tokio::fs::File::open(&request.dump_file)
            .await
            .map_err(|source| UploadError::Io {
                path: request.dump_file.clone(),
                source,
            })?;
        self.send(request, file).await
    }

    /// Compresses `source` on a background task while streaming it to the upload endpoint.
    /// The compression result is collected only after the whole response has been read.
    pub async fn send<R>(&self, request: &UploadRequest, source: R) -> Result<Exchange, UploadError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (compressed, completion) = gzip_stream(source);

        let mut builder = self
            .http
            .post(request.url.clone())
            .header(CONTENT_TYPE, LSIF_CONTENT_TYPE)
            .body(Body::wrap_stream(ReaderStream::new(compressed)));
        if let Some(authorization) = request.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        info!(url = %request.url, "[UPLOAD] Sending LSIF dump");
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, url = %request.url, "[UPLOAD][ERROR] Request failed");
            UploadError::Transport(e)
        })?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        info!(status = %status, body_len = body.len(), "[UPLOAD] Received response");

        let stream = completion.wait().await;
        Ok(Exchange {
            response: RawResponse { status, body },
            stream,
        })
    }
}
