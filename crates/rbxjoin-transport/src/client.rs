//! HTTP transport implementation using `reqwest`.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

/// A `reqwest`-backed [`HttpTransport`].
///
/// The underlying client has its cookie store disabled; cookies are
/// carried explicitly by the session layer as a `Cookie` header.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default `reqwest` client.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an existing client (proxy or TLS settings live there).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(format!("header {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::InvalidRequest(format!("header {name}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let headers = header_map(&request.headers)?;

        let mut builder = self.client.request(method, &request.url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        } else if request.method == Method::Post {
            builder = builder.header(reqwest::header::CONTENT_LENGTH, "0");
        }

        let resp = builder.send().await.map_err(map_send_error)?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::BodyReadFailed(e.to_string()))?
            .to_vec();

        tracing::debug!(method = %request.method, url = %request.url, status, "http round-trip");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
