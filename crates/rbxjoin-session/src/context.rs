//! The session context: one authenticated conversation with the remote
//! service.
//!
//! A [`SessionContext`] owns the [`SessionCredential`], the [`CookieJar`]
//! the service has filled so far, and the fixed headers from
//! [`SessionConfig`].
//!
//! Every request in the crate goes through [`SessionContext::send`], which
//! stamps the fixed headers and cookies on the way out and feeds
//! `Set-Cookie` back into the jar on the way in.
//!
//! # Concurrency note
//!
//! Requests take `&mut self`. The jar is updated by every response, so two
//! calls on the same context must not overlap; the borrow checker enforces
//! that. Callers sharing a context across tasks wrap it in a mutex.
//! Separate contexts (separate accounts) share nothing.

use std::fmt;

use rbxjoin_protocol::Endpoints;
use rbxjoin_transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

use crate::CookieJar;

// ---------------------------------------------------------------------------
// SessionCredential
// ---------------------------------------------------------------------------

/// The long-lived session secret supplied by the account store.
///
/// Immutable once constructed. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for building the cookie.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionCredential(<redacted, {} bytes>)", self.0.len())
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Hosts and the fixed header set.
///
/// The defaults identify the client as the official platform's network
/// stack, which some endpoints require before they will answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub endpoints: Endpoints,
    pub user_agent: String,
    pub referer: String,
    pub origin: String,
    pub accept: String,
    pub accept_language: String,
    /// Name of the cookie that carries the credential.
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            user_agent: "Roblox/WinInet".to_string(),
            referer: "https://www.roblox.com/".to_string(),
            origin: "https://www.roblox.com".to_string(),
            accept: "application/json, text/plain, */*".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            cookie_name: ".ROBLOSECURITY".to_string(),
        }
    }
}

impl SessionConfig {
    /// Same headers, different hosts.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    fn base_headers(&self) -> [(&'static str, &str); 5] {
        [
            ("User-Agent", self.user_agent.as_str()),
            ("Referer", self.referer.as_str()),
            ("Origin", self.origin.as_str()),
            ("Accept", self.accept.as_str()),
            ("Accept-Language", self.accept_language.as_str()),
        ]
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// One account's authenticated transport.
///
/// Construction does no I/O; whether the credential is any good is found
/// out lazily (see [`validate`](crate::validate)).
pub struct SessionContext<T: HttpTransport> {
    credential: SessionCredential,
    cookies: CookieJar,
    config: SessionConfig,
    transport: T,
}

impl<T: HttpTransport> SessionContext<T> {
    /// Creates a context whose jar holds just the credential cookie.
    pub fn new(credential: SessionCredential, config: SessionConfig, transport: T) -> Self {
        let mut cookies = CookieJar::new();
        cookies.insert(config.cookie_name.clone(), credential.expose());
        Self {
            credential,
            cookies,
            config,
            transport,
        }
    }

    pub fn credential(&self) -> &SessionCredential {
        &self.credential
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.config.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a request with the fixed headers and the current cookies.
    ///
    /// Headers already on `request` win over the fixed set, so a call can
    /// override `Referer` or `Accept` for itself. The jar absorbs the
    /// response's `Set-Cookie` headers whatever the status.
    pub async fn send(&mut self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        for (name, value) in self.config.base_headers() {
            if request.header_value(name).is_none() {
                request.set_header(name, value);
            }
        }
        if let Some(cookie) = self.cookies.header_value() {
            request.set_header("Cookie", cookie);
        }

        let response = self.transport.send(request).await?;

        for set_cookie in response.header_values("set-cookie") {
            self.cookies.absorb(set_cookie);
        }
        Ok(response)
    }

    /// `GET url` with extra headers.
    pub async fn get(
        &mut self,
        url: String,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let mut request = HttpRequest::get(url);
        for (name, value) in headers {
            request.set_header(*name, *value);
        }
        self.send(request).await
    }

    /// `POST url` with no body and extra headers.
    pub async fn post(
        &mut self,
        url: String,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        let mut request = HttpRequest::post(url);
        for (name, value) in headers {
            request.set_header(*name, *value);
        }
        self.send(request).await
    }
}

impl<T: HttpTransport> fmt::Debug for SessionContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("credential", &self.credential)
            .field("cookies", &self.cookies.len())
            .field("endpoints", &self.config.endpoints)
            .finish_non_exhaustive()
    }
}
