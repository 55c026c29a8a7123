//! Declarative request description and its assembly into a `WireRequest`.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::codec::{Codec, CodecError};
use crate::endpoint::{Endpoint, EndpointError};
use crate::http::{HttpMethod, WireRequest};

/// Why a `Request` could not be assembled into a `WireRequest`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] EndpointError),

    #[error("body could not be encoded: {0}")]
    Body(#[source] CodecError),
}

/// A full HTTP call described as data.
///
/// `B` is the body type; requests without a body use the default `()`.
/// `Request::new` fixes the defaults: `GET`, no headers, no body.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<B = ()> {
    endpoint: Endpoint,
    method: HttpMethod,
    headers: IndexMap<String, String>,
    body: Option<B>,
}

impl Request {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            method: HttpMethod::default(),
            headers: IndexMap::new(),
            body: None,
        }
    }
}

impl<B> Request<B> {
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a body, replacing any previous one.
    pub fn with_body<C>(self, body: C) -> Request<C> {
        Request {
            endpoint: self.endpoint,
            method: self.method,
            headers: self.headers,
            body: Some(body),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }
}

impl<B: Serialize> Request<B> {
    /// Resolve the URL, copy headers and encode the body with `codec`.
    ///
    /// Headers are copied verbatim in insertion order with one exception:
    /// when a body is present and no `Content-Type` header was set, the
    /// codec's content type is appended after the caller's headers. A
    /// caller-set `Content-Type` is never replaced.
    ///
    /// # Errors
    /// `RequestError::InvalidUrl` if the endpoint does not form a URL,
    /// `RequestError::Body` if the body cannot be encoded.
    pub fn build<C: Codec>(&self, codec: &C) -> Result<WireRequest, RequestError> {
        let url = self.endpoint.try_url()?;

        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let body = match &self.body {
            Some(body) => {
                let bytes = codec.encode(body).map_err(RequestError::Body)?;
                if !headers
                    .iter()
                    .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                {
                    headers.push(("Content-Type".to_string(), codec.content_type().to_string()));
                }
                Some(bytes)
            }
            None => None,
        };

        Ok(WireRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}
