//! Executes `Request`s and maps their outcome onto `NetworkError`.
//!
//! # Design
//! `Client` holds only its two collaborators, the engine and the codec, and
//! carries no mutable state between calls, so a single instance can serve
//! any number of concurrent fetches. Each fetch is a straight pipeline:
//! build, send, classify the transport outcome, check the status, decode.
//! Every failure along the way becomes a `NetworkError`; nothing escapes as
//! a panic.
//!
//! Callers that only need to issue requests should depend on the `Fetch`
//! trait rather than on `Client`, so tests can hand them a canned fetcher.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, CodecError, JsonCodec};
use crate::error::{NetworkError, NetworkErrorKind};
use crate::http::{EngineResponse, HttpEngine, TransportError};
use crate::request::{Request, RequestError};

/// Anything that can execute a `Request` and decode its payload.
pub trait Fetch: Send + Sync {
    fn fetch<T, B>(
        &self,
        request: &Request<B>,
    ) -> impl Future<Output = Result<T, NetworkError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync;
}

/// Declarative HTTP client.
#[derive(Debug, Clone)]
pub struct Client<E, C = JsonCodec> {
    engine: E,
    codec: C,
}

impl<E: HttpEngine> Client<E> {
    /// Client over `engine` using the JSON codec.
    pub fn new(engine: E) -> Self {
        Self::with_codec(engine, JsonCodec)
    }
}

impl<E: HttpEngine, C: Codec> Client<E, C> {
    pub fn with_codec(engine: E, codec: C) -> Self {
        Self { engine, codec }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Send `request` and decode the response payload as `T`.
    ///
    /// Makes exactly one engine call. Non-2xx statuses map onto their named
    /// `NetworkErrorKind` (unnamed ones onto `NoResponse`).
    ///
    /// # Errors
    /// Returns a `NetworkError` for invalid requests, transport failures,
    /// non-2xx statuses and undecodable payloads.
    pub async fn fetch<T, B>(&self, request: &Request<B>) -> Result<T, NetworkError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let wire = request
            .build(&self.codec)
            .map_err(|e| reject(classify_request_error(&e), &e))?;

        let method = wire.method;
        let url = wire.url.to_string();
        tracing::debug!(%method, %url, "sending request");

        let response = self
            .engine
            .send(wire)
            .await
            .map_err(|e| reject(classify_transport_error(&e), &e))?;

        check_status(&response).map_err(|e| {
            tracing::warn!(%method, %url, status = response.status, kind = ?e.kind(), "request failed");
            e
        })?;

        let value = self.codec.decode(&response.body).map_err(|e| {
            let err = classify_decode_error(&e);
            tracing::warn!(%method, %url, kind = ?err.kind(), "response payload rejected");
            err
        })?;

        tracing::debug!(%method, %url, status = response.status, "request succeeded");
        Ok(value)
    }
}

impl<E: HttpEngine, C: Codec> Fetch for Client<E, C> {
    fn fetch<T, B>(
        &self,
        request: &Request<B>,
    ) -> impl Future<Output = Result<T, NetworkError>> + Send
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync,
    {
        Client::<E, C>::fetch(self, request)
    }
}

fn reject(err: NetworkError, cause: &dyn std::error::Error) -> NetworkError {
    tracing::warn!(kind = ?err.kind(), %cause, "request failed");
    err
}

fn classify_request_error(err: &RequestError) -> NetworkError {
    match err {
        RequestError::InvalidUrl(_) => NetworkError::new(NetworkErrorKind::NotFound, "Invalid URL"),
        RequestError::Body(_) => NetworkError::new(NetworkErrorKind::BadRequest, "Invalid Body"),
    }
}

fn classify_transport_error(err: &TransportError) -> NetworkError {
    match err {
        TransportError::Malformed(_) => NetworkErrorKind::BadRequest.into(),
        TransportError::Connect(_) | TransportError::Timeout(_) | TransportError::Other(_) => {
            NetworkErrorKind::Unknown.into()
        }
    }
}

/// Map non-success status codes onto the error taxonomy.
fn check_status(response: &EngineResponse) -> Result<(), NetworkError> {
    if response.is_success() {
        return Ok(());
    }
    Err(NetworkErrorKind::for_status(response.status).into())
}

fn classify_decode_error(err: &CodecError) -> NetworkError {
    tracing::debug!(
        cause = ?err.kind,
        path = err.path.as_deref(),
        line = err.line,
        column = err.column,
        "decoding failed: {}",
        err.message
    );
    NetworkError::new(NetworkErrorKind::DecodingFailed, err.message.clone())
}
