//! Error types for the session layer.

use rbxjoin_protocol::{ProtocolError, UserId};
use rbxjoin_transport::TransportError;

/// Errors that can occur while talking to the remote service on behalf
/// of a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No response was received. Always surfaced; never retried here.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response body had an unexpected shape.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The anti-forgery handshake did not yield a token. Any mutating call
    /// that needed it cannot proceed.
    ///
    /// `status` is set when a response arrived without the token header;
    /// `source` is set when no response arrived at all.
    #[error("CSRF token unavailable: {}", csrf_detail(.status, .source))]
    CsrfUnavailable {
        status: Option<u16>,
        #[source]
        source: Option<TransportError>,
    },

    /// The identity endpoint rejected the session credential.
    #[error("session not authenticated (status {status})")]
    NotAuthenticated { status: u16, body: String },

    /// The profile lookup for this user failed.
    #[error("user {0} not found")]
    NotFound(UserId),
}

fn csrf_detail(status: &Option<u16>, source: &Option<TransportError>) -> String {
    match (status, source) {
        (_, Some(e)) => format!("handshake failed: {e}"),
        (Some(status), None) => format!("no token in logout response (status {status})"),
        (None, None) => "no token in logout response".to_string(),
    }
}
