//! HTTP transport.
//!
//! The client never talks to an HTTP library directly; it goes through
//! [`HttpClient`], so tests can route requests into an in-process server.

use crate::error::{SyncError, SyncResult};
use std::sync::Arc;
use std::time::Duration;
use ureq::Agent;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body of a successful response, or a server error.
    pub fn into_body(self) -> SyncResult<Vec<u8>> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(SyncError::server(self.status, &self.body))
        }
    }
}

/// HTTP client abstraction.
///
/// Implementations return non-2xx answers as an [`HttpResponse`] and only
/// fail for transport problems.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request.
    fn get(&self, url: &str) -> SyncResult<HttpResponse>;

    /// Sends a POST request with `body`.
    fn post(&self, url: &str, body: &[u8]) -> SyncResult<HttpResponse>;
}

/// Blocking [`HttpClient`] backed by `ureq`.
pub struct UreqClient {
    agent: Agent,
}

impl UreqClient {
    /// Creates a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }

    fn finish(
        result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> SyncResult<HttpResponse> {
        let mut response = result.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(transport_error)?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> SyncResult<HttpResponse> {
        Self::finish(self.agent.get(url).call())
    }

    fn post(&self, url: &str, body: &[u8]) -> SyncResult<HttpResponse> {
        Self::finish(self.agent.post(url).send(body))
    }
}

fn transport_error(err: ureq::Error) -> SyncError {
    let retryable = matches!(
        err,
        ureq::Error::Io(_)
            | ureq::Error::Timeout(_)
            | ureq::Error::ConnectionFailed
            | ureq::Error::HostNotFound
    );
    let message = format!("HTTP request failed: {err}");
    if retryable {
        SyncError::transport_retryable(message)
    } else {
        SyncError::transport_fatal(message)
    }
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer {
    /// Handles one request addressed to `path_and_query`.
    fn handle(&self, method: &str, path_and_query: &str, body: &[u8]) -> HttpResponse;
}

impl<S: LoopbackServer + ?Sized> LoopbackServer for Arc<S> {
    fn handle(&self, method: &str, path_and_query: &str, body: &[u8]) -> HttpResponse {
        (**self).handle(method, path_and_query, body)
    }
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing without actual network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer + Send + Sync> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }

    fn dispatch(&self, method: &str, url: &str, body: &[u8]) -> HttpResponse {
        // Strip scheme and authority.
        let path = url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(url);
        let path = path.find('/').map(|i| &path[i..]).unwrap_or("/");
        self.server.handle(method, path, body)
    }
}

impl<S: LoopbackServer + Send + Sync> HttpClient for LoopbackClient<S> {
    fn get(&self, url: &str) -> SyncResult<HttpResponse> {
        Ok(self.dispatch("GET", url, &[]))
    }

    fn post(&self, url: &str, body: &[u8]) -> SyncResult<HttpResponse> {
        Ok(self.dispatch("POST", url, body))
    }
}
