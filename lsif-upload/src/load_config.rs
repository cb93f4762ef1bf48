/// `load_config` module: assembles the [`ServiceConfig`] the upload pipeline runs with.
///
/// # Responsibilities
/// - Read the optional JSON config file (`--config`, `SRC_CONFIG`, or `~/src-config.json`)
/// - Apply flag/environment overrides for the endpoint and access token
/// - Fall back to the default endpoint when nothing is configured
///
/// Precedence, highest first: flag or environment variable, config file, default.
///
/// # Errors
/// An explicitly named config file that cannot be read or parsed is an error. A missing
/// `~/src-config.json` is not.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use lsif_upload_core::config::{ServiceConfig, DEFAULT_ENDPOINT};
use serde::Deserialize;
use tracing::{error, info};

use crate::cli::GlobalArgs;

/// Shape of the JSON config file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
}

/// Default config file location, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join("src-config.json"))
}

/// Reads and parses a JSON config file.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> Result<ConfigFile> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let parsed: ConfigFile = serde_json::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config JSON");
        anyhow::anyhow!("Failed to parse config file {:?}: {e}", path_ref)
    })?;
    info!(config_path = ?path_ref, "Parsed config JSON successfully");
    Ok(parsed)
}

/// Builds the service configuration from global flags, the config file and defaults.
pub fn load_config(global: &GlobalArgs) -> Result<ServiceConfig> {
    let file = match &global.config {
        Some(path) => read_config_file(path)?,
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => read_config_file(path)?,
            None => ConfigFile::default(),
        },
    };

    let endpoint = global
        .endpoint
        .clone()
        .filter(|e| !e.is_empty())
        .or(file.endpoint.filter(|e| !e.is_empty()))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let access_token = global.access_token.clone().or(file.access_token);

    let config = ServiceConfig::new(endpoint, access_token);
    config.trace_loaded();
    Ok(config)
}
