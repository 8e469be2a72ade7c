//! HTTP transport used to reach the gateway.
//!
//! The client talks to the network only through the [`Transport`] trait, so
//! tests and applications with their own HTTP stack can plug in a different
//! implementation. [`HttpTransport`] is the default, backed by `reqwest`.

use crate::errors::{MaibError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// A single request to the gateway.
#[derive(Debug, Clone)]
pub struct TransportRequest<'a> {
    /// HTTP method
    pub method: Method,
    /// Fully built endpoint URL
    pub url: Url,
    /// Endpoint name, used for error context
    pub endpoint: &'a str,
    /// JSON body, if any
    pub body: Option<&'a Value>,
    /// Bearer token, if the endpoint needs one
    pub bearer_token: Option<&'a str>,
    /// Request timeout
    pub timeout: Duration,
}

/// Sends requests to the gateway and returns the decoded JSON response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw JSON response body.
    async fn send(&self, request: TransportRequest<'_>) -> Result<Value>;
}

/// `reqwest`-backed transport.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a fresh `reqwest` client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Creates a transport reusing an existing `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest<'_>) -> Result<Value> {
        let endpoint = request.endpoint;

        let mut builder = self
            .client
            .request(request.method, request.url)
            .timeout(request.timeout);

        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        if let Some(token) = request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MaibError::transport(endpoint, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MaibError::transport(endpoint, e))?;

        // Error envelopes come back with 4xx statuses, so the body is decoded
        // whatever the status is.
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => {
                tracing::warn!(endpoint, status = status.as_u16(), "non-JSON error response");
                Err(MaibError::HttpStatus {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                })
            }
            Err(e) => Err(MaibError::protocol(
                endpoint,
                format!("response body is not JSON: {}", e),
            )),
        }
    }
}
