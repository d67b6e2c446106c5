//! Transport layer abstraction.
//!
//! The provider never talks to the network directly. It builds an
//! [`HttpRequest`] descriptor and hands it to an [`HttpTransport`], which
//! performs the call and returns the parsed response. Non-success statuses
//! are the transport's responsibility to turn into a [`TransportError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// HTTP methods the provider issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully translated request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    /// Serialized JSON payload, for writes.
    pub body: Option<String>,
    /// Whether the transport should attach its credentials. The provider
    /// always sets this.
    pub with_credentials: bool,
}

impl HttpRequest {
    fn new(method: HttpMethod, url: String, body: Option<String>) -> Self {
        Self {
            url,
            method,
            body,
            with_credentials: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url.into(), None)
    }

    pub fn post(url: impl Into<String>, body: String) -> Self {
        Self::new(HttpMethod::Post, url.into(), Some(body))
    }

    pub fn put(url: impl Into<String>, body: String) -> Self {
        Self::new(HttpMethod::Put, url.into(), Some(body))
    }

    pub fn patch(url: impl Into<String>, body: String) -> Self {
        Self::new(HttpMethod::Patch, url.into(), Some(body))
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url.into(), None)
    }
}

/// A successful response with its JSON body parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    /// Parsed body; `Value::Null` when the response had none.
    pub body: Value,
}

impl HttpResponse {
    /// A `200 OK` response carrying `body`.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body,
        }
    }
}

/// Errors raised by a transport. Opaque to the provider.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("{method} {url} failed with status {status}: {body}")]
    Status {
        method: HttpMethod,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body could not be read or parsed.
    #[error("invalid response body from {url}: {message}")]
    Decode { url: String, message: String },
}

impl TransportError {
    /// The HTTP status, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Performs HTTP calls on behalf of the provider.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the parsed response, or an error for
    /// network failures and non-success statuses.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// A scripted transport for testing.
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    enum Reply {
        Body(Value),
        Status(u16, String),
    }

    #[derive(Debug, Clone)]
    struct Route {
        method: HttpMethod,
        url: String,
        reply: Reply,
        delay: Option<Duration>,
    }

    /// Answers requests from a fixed routing table and records every request
    /// it sees. Unrouted requests fail with a 404 status error.
    #[derive(Debug, Clone, Default)]
    pub struct MockTransport {
        routes: Arc<Mutex<Vec<Route>>>,
        requests: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl MockTransport {
        /// Creates a transport with no routes.
        pub fn new() -> Self {
            Self::default()
        }

        fn route(
            self,
            method: HttpMethod,
            url: impl Into<String>,
            reply: Reply,
            delay: Option<Duration>,
        ) -> Self {
            self.routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Route {
                    method,
                    url: url.into(),
                    reply,
                    delay,
                });
            self
        }

        /// Answers `method url` with a 200 and `body`.
        pub fn with_response(
            self,
            method: HttpMethod,
            url: impl Into<String>,
            body: Value,
        ) -> Self {
            self.route(method, url, Reply::Body(body), None)
        }

        /// Like [`with_response`](Self::with_response), but only answers after
        /// `delay` has elapsed.
        pub fn with_delayed_response(
            self,
            method: HttpMethod,
            url: impl Into<String>,
            body: Value,
            delay: Duration,
        ) -> Self {
            self.route(method, url, Reply::Body(body), Some(delay))
        }

        /// Fails `method url` with the given status.
        pub fn with_status(
            self,
            method: HttpMethod,
            url: impl Into<String>,
            status: u16,
            body: impl Into<String>,
        ) -> Self {
            self.route(method, url, Reply::Status(status, body.into()), None)
        }

        /// Every request sent so far, in send order.
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of requests sent so far.
        pub fn request_count(&self) -> usize {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            let route = self
                .routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .find(|route| route.method == request.method && route.url == request.url)
                .cloned();

            let Some(route) = route else {
                return Err(TransportError::Status {
                    method: request.method,
                    url: request.url,
                    status: 404,
                    body: "no mock route".to_string(),
                });
            };

            if let Some(delay) = route.delay {
                tokio::time::sleep(delay).await;
            }

            match route.reply {
                Reply::Body(body) => Ok(HttpResponse::ok(body)),
                Reply::Status(status, body) => Err(TransportError::Status {
                    method: request.method,
                    url: request.url,
                    status,
                    body,
                }),
            }
        }
    }
}
