//! Response interpretation: maps a finished [`Exchange`] to an upload receipt or a classified
//! [`UploadError`].
//!
//! Rules, in order of precedence:
//! 1. a compression failure wins over whatever the server answered;
//! 2. any 2xx must carry `{"id": "..."}`;
//! 3. a 401 asking for `github_token` means the user must pass `--github-token`;
//! 4. any other 401 is an authorization failure, with [`UNAUTHORIZED_HINT`] written to the
//!    hint output when there is one;
//! 5. everything else is a remote error with the status and body verbatim.

use std::io::Write;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::UploadError;
use crate::transport::Exchange;

/// Successful upload, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Identifier assigned by the service.
    pub artifact_id: String,
    /// Opaque, URL-safe reference to the upload.
    pub artifact_reference: String,
    /// Page where processing of the upload can be followed.
    pub status_page_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadPayload {
    id: String,
}

const GITHUB_TOKEN_REQUIRED: &str = "must provide github_token";

/// Printed ahead of a plain 401 when a user is watching.
pub const UNAUTHORIZED_HINT: &str = "You may need to specify or update your GitHub access token to use this endpoint.\n\
See https://github.com/sourcegraph/src-cli#authentication\n\n";

/// Opaque reference for an upload id: URL-safe base64 of `LSIFUpload:"{id}"`.
pub fn artifact_reference(id: &str) -> String {
    URL_SAFE.encode(format!("LSIFUpload:\"{id}\""))
}

/// Page where the processing status of an upload is shown.
pub fn status_page_url(endpoint: &str, repository: &str, reference: &str) -> String {
    format!(
        "{}/{}/-/settings/code-intelligence/lsif-uploads/{}",
        endpoint.trim_end_matches('/'),
        repository,
        reference
    )
}

/// Interprets `exchange` for an upload of `repository` to `endpoint`. A plain 401 writes
/// [`UNAUTHORIZED_HINT`] to `hint_out`, if given.
pub fn interpret(
    endpoint: &str,
    repository: &str,
    exchange: Exchange,
    hint_out: Option<&mut dyn Write>,
) -> Result<UploadReceipt, UploadError> {
    let Exchange { response, stream } = exchange;
    if let Err(e) = stream {
        error!(error = %e, status = %response.status, "[UPLOAD][ERROR] Dump stream failed during upload");
        return Err(UploadError::Stream(e));
    }

    let status = response.status;
    let body = String::from_utf8_lossy(&response.body).into_owned();

    if !status.is_success() {
        error!(status = %status, body = %body, "[UPLOAD][ERROR] Upload rejected");
        if status == StatusCode::UNAUTHORIZED {
            if body.to_lowercase().contains(GITHUB_TOKEN_REQUIRED) {
                return Err(UploadError::AuthScope);
            }
            if let Some(out) = hint_out {
                if let Err(e) = out.write_all(UNAUTHORIZED_HINT.as_bytes()) {
                    debug!(error = %e, "Could not write access token hint");
                }
            }
            return Err(UploadError::Unauthorized { status, body });
        }
        return Err(UploadError::Remote { status, body });
    }

    let payload: UploadPayload =
        serde_json::from_str(&body).map_err(|source| UploadError::Parse {
            body: body.clone(),
            source,
        })?;
    let reference = artifact_reference(&payload.id);
    let receipt = UploadReceipt {
        status_page_url: status_page_url(endpoint, repository, &reference),
        artifact_reference: reference,
        artifact_id: payload.id,
    };
    info!(
        artifact_id = %receipt.artifact_id,
        url = %receipt.status_page_url,
        "[UPLOAD] Upload accepted"
    );
    Ok(receipt)
}
