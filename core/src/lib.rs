//! Declarative HTTP client.
//!
//! # Overview
//! Callers describe an API call as data (an `Endpoint` plus a `Request`) and
//! `Client::fetch` turns it into a network request, executes it through an
//! `HttpEngine`, and decodes the payload into a typed value or returns a
//! classified `NetworkError`.
//!
//! # Design
//! - URL building, request assembly and response classification are pure
//!   functions of their inputs; only the engine performs I/O.
//! - The engine and the codec are traits so transports and formats can be
//!   swapped without touching the pipeline. `ReqwestEngine` and `JsonCodec`
//!   are the defaults.
//! - `Client` is stateless apart from its collaborators and can be shared
//!   across concurrent calls.

pub mod client;
pub mod codec;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod http;
pub mod request;

pub use client::{Client, Fetch};
pub use codec::{Codec, CodecError, CodecErrorKind, JsonCodec};
pub use endpoint::{Endpoint, EndpointError, QueryValue, UnsupportedQueryValue};
pub use engine::ReqwestEngine;
pub use error::{NetworkError, NetworkErrorKind};
pub use http::{EngineResponse, HttpEngine, HttpMethod, TransportError, WireRequest};
pub use request::{Request, RequestError};
