//! HTTP wire types and the engine seam.
//!
//! # Design
//! `WireRequest` and `EngineResponse` describe an HTTP exchange as plain
//! data. The client builds the former and interprets the latter; moving
//! bytes is left to an `HttpEngine` implementation. Keeping the seam this
//! narrow lets tests substitute a canned engine and lets callers bring their
//! own transport configuration (timeouts, pooling, proxies).

use std::fmt;
use std::future::Future;

use thiserror::Error;
use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
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

/// A transport-ready HTTP request.
///
/// Built by `Request::build`; handed to an `HttpEngine` as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl WireRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response as returned by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl EngineResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Failures below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// The peer answered with something that is not an HTTP response.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Performs the network round-trip for a `WireRequest`.
pub trait HttpEngine: Send + Sync {
    fn send(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<EngineResponse, TransportError>> + Send;
}
