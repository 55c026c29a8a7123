//! `HttpEngine` backed by reqwest.

use std::error::Error as StdError;

use reqwest::Method;

use crate::http::{EngineResponse, HttpEngine, HttpMethod, TransportError, WireRequest};

const USER_AGENT: &str = concat!("netkit/", env!("CARGO_PKG_VERSION"));

/// Sends `WireRequest`s through a `reqwest::Client`.
///
/// Connection pooling, timeouts and TLS settings belong to the wrapped
/// client; pass a configured one to `with_client` to change them.
#[derive(Debug, Clone)]
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// Engine over a default reqwest client.
    ///
    /// # Errors
    /// Returns `TransportError::Other` if the TLS backend fails to
    /// initialise.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn map_error(error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if reply_is_not_http(&error) {
            TransportError::Malformed(error.to_string())
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

/// True when hyper rejected the peer's reply while parsing the status line
/// or headers. reqwest wraps hyper's error, so walk the source chain.
fn reply_is_not_http(error: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(error), |e| (*e).source())
        .filter_map(|e| e.downcast_ref::<hyper::Error>())
        .any(|e| e.is_parse() || e.is_parse_status())
}

impl HttpEngine for ReqwestEngine {
    async fn send(&self, request: WireRequest) -> Result<EngineResponse, TransportError> {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Self::map_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(Self::map_error)?.to_vec();

        Ok(EngineResponse {
            status,
            headers,
            body,
        })
    }
}
