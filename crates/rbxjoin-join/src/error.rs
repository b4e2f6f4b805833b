//! Error types for the join layer.

use rbxjoin_protocol::ProtocolError;
use rbxjoin_session::SessionError;
use rbxjoin_transport::TransportError;

/// Errors that can occur while joining or resolving a server.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    /// Transport failure, missing CSRF token, or a session-level rejection.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The input could not be understood: an unrecognised server
    /// reference or a non-numeric place id.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The code lookup found no matching place.
    #[error("private server not found (status {status})")]
    NotFound { status: u16, body: String },

    /// Authenticated, but not allowed into this private server.
    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    /// The server-status check failed for a reason other than access.
    #[error("private server check failed (status {status})")]
    ServerCheckFailed { status: u16, body: String },

    #[error("join ticket rejected (status {status}): {reason}")]
    TicketRejected { status: u16, reason: String },

    #[error("join rejected (status {status}): {reason}")]
    JoinRejected { status: u16, reason: String },
}

impl From<TransportError> for JoinError {
    fn from(e: TransportError) -> Self {
        Self::Session(SessionError::Transport(e))
    }
}
