use tracing::info;

/// Default code intelligence service used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://sourcegraph.com";

/// Connection settings for the indexing service, established once at startup and read-only
/// for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    endpoint: String,
    access_token: Option<String>,
}

impl ServiceConfig {
    /// Builds a config, trimming trailing slashes from the endpoint and treating an empty
    /// access token as absent.
    pub fn new(endpoint: impl Into<String>, access_token: Option<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let access_token = access_token.filter(|token| !token.is_empty());
        Self {
            endpoint,
            access_token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn trace_loaded(&self) {
        info!(
            endpoint = %self.endpoint,
            access_token_set = self.access_token.is_some(),
            "Loaded ServiceConfig"
        );
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, None)
    }
}
