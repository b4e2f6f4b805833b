//! The anti-forgery handshake.
//!
//! Every state-changing call to the remote service needs an
//! `x-csrf-token` header. The service hands one out on any rejected
//! mutating request, so we ask for one by POSTing to the logout endpoint
//! with no token: the call is refused (403) and the refusal carries the
//! token in its headers. The session stays logged in.
//!
//! # Never cached
//!
//! [`acquire_token`] is a plain function of the session. It holds no state
//! and remembers nothing between calls. Each mutating operation calls it
//! immediately before its own request and passes the token by value into
//! exactly that request.

use std::fmt;

use rbxjoin_protocol::CSRF_HEADER;
use rbxjoin_transport::HttpTransport;

use crate::{SessionContext, SessionError};

/// A single-use anti-forgery token.
///
/// Not `Clone`: a token is moved into the one request it was fetched for.
#[derive(PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// The header value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CsrfToken(<redacted>)")
    }
}

/// Performs the handshake and returns a fresh token.
///
/// # Errors
/// [`SessionError::CsrfUnavailable`] when no response arrives (the
/// transport error is kept as its source) or the response has no token
/// header.
pub async fn acquire_token<T: HttpTransport>(
    session: &mut SessionContext<T>,
) -> Result<CsrfToken, SessionError> {
    let url = session.endpoints().logout();
    let response = match session.post(url, &[]).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "CSRF handshake failed");
            return Err(SessionError::CsrfUnavailable {
                status: None,
                source: Some(e),
            });
        }
    };

    match response.header(CSRF_HEADER).filter(|t| !t.is_empty()) {
        Some(token) => {
            tracing::debug!(status = response.status, "CSRF token acquired");
            Ok(CsrfToken(token.to_string()))
        }
        None => {
            tracing::warn!(
                status = response.status,
                body = %response.text(),
                "CSRF handshake returned no token"
            );
            Err(SessionError::CsrfUnavailable {
                status: Some(response.status),
                source: None,
            })
        }
    }
}
