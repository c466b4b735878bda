//! Raw HTTP exchange types and the default `reqwest` transport.
//!
//! # Design
//! - The pipeline only ever sees `HttpRequest`/`HttpResponse`; transports are swappable.
//! - Transport errors stay opaque here; the error-mapping plugin classifies them.

use std::error::Error;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::session::SessionToken;

/// Opaque failure reported by a transport.
pub type TransportError = Box<dyn Error + Send + Sync>;

/// Outbound HTTP request as it travels through the plugin chain.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Target RPC endpoint.
    pub url: Url,
    /// Headers added by the orchestrator and plugins.
    pub headers: HeaderMap,
    /// Serialised `{method, arguments}` body.
    pub body: Vec<u8>,
    /// RPC method name, kept for diagnostics.
    pub method: String,
    /// Token this call renewed; takes precedence over the shared session state.
    pub renewed_session: Option<SessionToken>,
}

impl HttpRequest {
    /// JSON request for the given endpoint and serialised body.
    #[must_use]
    pub fn json(url: Url, method: impl Into<String>, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            url,
            headers,
            body,
            method: method.into(),
            renewed_session: None,
        }
    }

    /// Header value as a string, when present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }
}

/// Inbound HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Response with the given status and body and no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Header value as a string, when present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }
}

/// Performs a single blocking HTTP exchange.
pub trait Transport: Send + Sync {
    /// Send the request and return the daemon's response.
    ///
    /// # Errors
    ///
    /// Returns an error when the exchange could not complete at the transport level.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(request.url.clone())
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_request_sets_content_type() {
        let url: Url = "http://127.0.0.1:9091/transmission/rpc"
            .parse()
            .expect("valid URL");
        let request = HttpRequest::json(url, "session-get", b"{}".to_vec());
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.method, "session-get");
        assert!(request.renewed_session.is_none());
    }

    #[test]
    fn response_header_lookup_is_case_insensitive() {
        let mut response = HttpResponse::new(409, Vec::new());
        response.headers.insert(
            "x-transmission-session-id",
            HeaderValue::from_static("abc123"),
        );
        assert_eq!(response.header("X-Transmission-Session-Id"), Some("abc123"));
        assert_eq!(response.header("missing"), None);
    }
}
