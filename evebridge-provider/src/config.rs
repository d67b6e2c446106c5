//! Provider configuration.

use serde::{Deserialize, Serialize};

/// Resource whose writes invalidate downstream schema caches.
pub const DEFAULT_SCHEMA_RESOURCE: &str = "schemas";

/// Configuration for the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the Eve API (e.g. `http://localhost:5000/api`).
    pub api_url: String,
    /// Create/update on this resource emits a `schema_update` notification.
    pub schema_resource: String,
    /// Cap on concurrent sub-requests for batch operations. `None` sends
    /// every sub-request at once.
    pub max_concurrency: Option<usize>,
    /// Settings for the built-in HTTP transport.
    pub transport: TransportConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            schema_resource: DEFAULT_SCHEMA_RESOURCE.to_string(),
            max_concurrency: None,
            transport: TransportConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Creates a config pointing at `api_url`, everything else default.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Settings for [`ReqwestTransport`](crate::http::ReqwestTransport).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Value for the `Authorization` header on credentialed requests.
    pub authorization: Option<String>,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            authorization: None,
            timeout_secs: None,
            user_agent: format!("evebridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
