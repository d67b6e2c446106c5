//! HTTP transport backed by `reqwest`.

use crate::config::TransportConfig;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Sends provider requests over HTTP.
///
/// Credentialed requests carry the configured `Authorization` value. The
/// client keeps a cookie store, so session cookies set by the API are sent
/// back on later calls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    config: TransportConfig,
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with its own HTTP client.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| TransportError::Network {
            url: String::new(),
            message: format!("failed to create HTTP client: {e}"),
        })?;

        Ok(Self { config, client })
    }

    /// Creates a transport around an existing client.
    pub fn with_client(config: TransportConfig, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .header(ACCEPT, "application/json");

        if request.with_credentials {
            if let Some(authorization) = &self.config.authorization {
                builder = builder.header(AUTHORIZATION, authorization);
            }
        }

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(|e| TransportError::Network {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let text = response.text().await.map_err(|e| TransportError::Decode {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                method: request.method,
                url: request.url,
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| TransportError::Decode {
                url: request.url.clone(),
                message: e.to_string(),
            })?
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
