//! Error taxonomy returned by `Client::fetch`.
//!
//! # Design
//! Every failure the client can observe is folded into a single
//! `NetworkError` value carrying a closed `NetworkErrorKind` and a
//! human-readable message. HTTP-derived kinds map 1:1 onto the status codes
//! they are named after; `DecodingFailed` and `Unknown` cover the payload
//! and catch-all cases. Callers match on the kind; the message is for
//! display and logs.

use std::fmt;

use thiserror::Error;

/// Closed classification of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    /// 400: the server will not process the request due to a client error.
    BadRequest,
    /// 401: authentication is required and has failed or not been provided.
    Unauthorized,
    /// 403: the request was valid but the server refuses to respond to it.
    Forbidden,
    /// 404: the requested resource could not be found.
    NotFound,
    /// 405: the method is not supported for the requested resource.
    MethodNotAllowed,
    /// 406: no representation matches the request's Accept headers.
    NotAcceptable,
    /// 408: the server timed out waiting for the request.
    RequestTimeout,
    /// 444: the server returned nothing and closed the connection.
    NoResponse,
    /// 500
    InternalServerError,
    /// 501
    NotImplemented,
    /// 502
    BadGateway,
    /// 503
    ServiceUnavailable,
    /// 504
    GatewayTimeout,
    /// 505
    HttpVersionNotSupported,
    /// 506
    VariantAlsoNegotiates,
    /// 507
    InsufficientStorage,
    /// 508
    LoopDetected,
    /// 510
    NotExtended,
    /// 511
    NetworkAuthenticationRequired,
    /// The response payload could not be decoded into the requested type.
    DecodingFailed,
    /// Transport failures and anything else not classified above.
    Unknown,
}

impl NetworkErrorKind {
    /// Map a status code onto its named kind, if it has one.
    pub fn from_status(status: u16) -> Option<Self> {
        let kind = match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            406 => Self::NotAcceptable,
            408 => Self::RequestTimeout,
            444 => Self::NoResponse,
            500 => Self::InternalServerError,
            501 => Self::NotImplemented,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            505 => Self::HttpVersionNotSupported,
            506 => Self::VariantAlsoNegotiates,
            507 => Self::InsufficientStorage,
            508 => Self::LoopDetected,
            510 => Self::NotExtended,
            511 => Self::NetworkAuthenticationRequired,
            _ => return None,
        };
        Some(kind)
    }

    /// Like `from_status`, but codes without a named kind collapse to
    /// `NoResponse`.
    pub fn for_status(status: u16) -> Self {
        Self::from_status(status).unwrap_or(Self::NoResponse)
    }

    /// The status code this kind is named after. `None` for
    /// `DecodingFailed` and `Unknown`.
    pub fn status_code(self) -> Option<u16> {
        let code = match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::NotAcceptable => 406,
            Self::RequestTimeout => 408,
            Self::NoResponse => 444,
            Self::InternalServerError => 500,
            Self::NotImplemented => 501,
            Self::BadGateway => 502,
            Self::ServiceUnavailable => 503,
            Self::GatewayTimeout => 504,
            Self::HttpVersionNotSupported => 505,
            Self::VariantAlsoNegotiates => 506,
            Self::InsufficientStorage => 507,
            Self::LoopDetected => 508,
            Self::NotExtended => 510,
            Self::NetworkAuthenticationRequired => 511,
            Self::DecodingFailed | Self::Unknown => return None,
        };
        Some(code)
    }

    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::NotAcceptable => "Not Acceptable",
            Self::RequestTimeout => "Request Timeout",
            Self::NoResponse => "No Response",
            Self::InternalServerError => "Internal Server Error",
            Self::NotImplemented => "Not Implemented",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::GatewayTimeout => "Gateway Timeout",
            Self::HttpVersionNotSupported => "HTTP Version Not Supported",
            Self::VariantAlsoNegotiates => "Variant Also Negotiates",
            Self::InsufficientStorage => "Insufficient Storage",
            Self::LoopDetected => "Loop Detected",
            Self::NotExtended => "Not Extended",
            Self::NetworkAuthenticationRequired => "Network Authentication Required",
            Self::DecodingFailed => "Decoding Failed",
            Self::Unknown => "Unknown Error",
        }
    }
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_message())
    }
}

/// A classified fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NetworkError {
    kind: NetworkErrorKind,
    message: String,
}

impl NetworkError {
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> NetworkErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<NetworkErrorKind> for NetworkError {
    fn from(kind: NetworkErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}
