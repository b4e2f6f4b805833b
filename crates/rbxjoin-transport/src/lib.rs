//! HTTP transport abstraction for rbxjoin.
//!
//! Provides the [`HttpTransport`] trait plus the plain request/response
//! values that travel through it. The transport is deliberately dumb: it
//! sends one request and hands back one response. It keeps no cookies and
//! adds no headers; the session layer above owns both.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): [`ReqwestTransport`], backed by `reqwest`
//! - `mock`: [`MockTransport`], a scripted in-memory double for tests

mod error;
#[cfg(feature = "reqwest")]
mod client;
#[cfg(feature = "mock")]
mod mock;

pub use error::TransportError;
#[cfg(feature = "reqwest")]
pub use client::ReqwestTransport;
#[cfg(feature = "mock")]
pub use mock::MockTransport;

use std::fmt;
use std::future::Future;

use serde::Serialize;

/// HTTP method. The remote service only needs these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a GET request with no headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request with no headers and no body.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any existing header with the same name
    /// (compared case-insensitively).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// In-place form of [`header`](Self::header).
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Serializes `value` as the JSON body and sets `Content-Type`.
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, TransportError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        self.body = Some(bytes);
        Ok(self.header("Content-Type", "application/json"))
    }

    /// Returns the first value of the named header, if present.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received response. The body is fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with the given status and no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Appends a header. Repeated names are kept (e.g. `Set-Cookie`).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Replaces the body with the JSON encoding of `value`.
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_body(value.to_string())
            .with_header("Content-Type", "application/json")
    }

    /// Returns the first value of the named header (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of the named header, in arrival order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the remote service.
///
/// Implementations must not retry, cache, or store cookies: every call to
/// [`send`](Self::send) is exactly one round-trip.
pub trait HttpTransport: Send + Sync + 'static {
    /// Performs one request and returns the buffered response.
    ///
    /// Any status code, including 4xx/5xx, is a successful round-trip and
    /// comes back as `Ok`. `Err` means no usable response was received.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
