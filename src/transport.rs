//! Transport client: one request in, one response out.
//!
//! Every failure mode is converted into a well-formed JSON-RPC error
//! response, so the bridge loop can always emit a syntactically valid reply.
//! All network-layer failures collapse to a single `-32603` / `"HTTP error"`
//! pair; only the free-text `data` field (and tracing output) records the
//! underlying cause. No retries are performed: every failure is terminal for
//! that single call.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Submit one JSON-RPC request and obtain one response.
///
/// Abstracted so the bridge loop can be tested without a live endpoint.
#[async_trait]
pub trait JsonRpcTransport: Send + Sync {
    /// Submit a request. Infallible at the API level: transport failures come
    /// back as JSON-RPC error responses.
    async fn submit(&self, request: &JsonRpcRequest) -> JsonRpcResponse;
}

/// HTTP transport client for the configured endpoint.
///
/// The underlying `reqwest::Client` is reused across calls; its timeout
/// bounds the whole round trip of each call, connection setup included.
pub struct TransportClient {
    client: Client,
    endpoint: String,
}

impl TransportClient {
    /// Build the client from resolved configuration.
    ///
    /// The endpoint is normalized by stripping any trailing `/`. The URL is
    /// not otherwise validated here: a malformed endpoint surfaces per call
    /// as an `Internal error` response, never as a panic.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// The normalized endpoint URL requests are POSTed to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn submit_inner(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        let body = match serde_json::to_vec(request) {
            Ok(body) => body,
            Err(e) => {
                error!(method = %request.method, error = %e, "failed to serialize request");
                return JsonRpcResponse::error(id, JsonRpcError::parse_error(e.to_string()));
            }
        };

        debug!(method = %request.method, endpoint = %self.endpoint, "forwarding request");

        let response = match self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return JsonRpcResponse::error(id, self.classify_send_error(e)),
        };

        let status = response.status();
        if status.as_u16() >= 400 {
            warn!(%status, endpoint = %self.endpoint, "endpoint returned error status");
            return JsonRpcResponse::error(
                id,
                JsonRpcError::http_error(format!("Status: {}", status.as_u16())),
            );
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "failed to read response body");
                return JsonRpcResponse::error(id, JsonRpcError::http_error(e.to_string()));
            }
        };

        match serde_json::from_slice::<JsonRpcResponse>(&bytes) {
            // The remote service's result or error passes through verbatim.
            Ok(decoded) => decoded,
            Err(e) => {
                error!(error = %e, body_len = bytes.len(), "undecodable response body");
                JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_response(format!("Failed to parse response: {e}")),
                )
            }
        }
    }

    /// Map a send failure to the error vocabulary.
    ///
    /// Builder errors (malformed endpoint URL) mean the outbound call could
    /// not be constructed. Everything else is a transport failure; timeout
    /// and connect failures get distinct log lines but the same wire error.
    fn classify_send_error(&self, error: reqwest::Error) -> JsonRpcError {
        if error.is_builder() {
            error!(endpoint = %self.endpoint, error = %error, "failed to construct outbound call");
            JsonRpcError::internal_error(error.to_string())
        } else if error.is_timeout() {
            warn!(endpoint = %self.endpoint, error = %error, "request timed out");
            JsonRpcError::http_error(error.to_string())
        } else if error.is_connect() {
            warn!(endpoint = %self.endpoint, error = %error, "failed to connect to endpoint");
            JsonRpcError::http_error(error.to_string())
        } else {
            warn!(endpoint = %self.endpoint, error = %error, "transport failure");
            JsonRpcError::http_error(error.to_string())
        }
    }
}

#[async_trait]
impl JsonRpcTransport for TransportClient {
    async fn submit(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        self.submit_inner(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(endpoint: &str) -> RelayConfig {
        RelayConfig {
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = TransportClient::new(&config("http://localhost:3000/")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000");
    }

    #[test]
    fn test_endpoint_without_slash_unchanged() {
        let client = TransportClient::new(&config("http://localhost:3000")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000");
    }

    #[test]
    fn test_construction_does_not_validate_url() {
        // A malformed endpoint is a per-call Internal error, not a startup
        // failure.
        assert!(TransportClient::new(&config("not a url")).is_ok());
    }
}
