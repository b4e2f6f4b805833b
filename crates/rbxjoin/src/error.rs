//! Unified error type for rbxjoin.

use std::fmt;

use rbxjoin_join::{ACCESS_DENIED_ADVISORY, JoinError};
use rbxjoin_protocol::ProtocolError;
use rbxjoin_session::SessionError;
use rbxjoin_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// `?` converts layer errors automatically. Use [`kind`](Self::kind) to
/// branch on what went wrong without matching through the layers.
#[derive(Debug, thiserror::Error)]
pub enum RbxJoinError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Join(#[from] JoinError),
}

/// What kind of failure occurred, flattened across layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection, DNS or timeout.
    Transport,
    /// The anti-forgery handshake yielded no token.
    CsrfUnavailable,
    /// The session credential was rejected.
    NotAuthenticated,
    /// Unparseable server reference or place id.
    InvalidFormat,
    /// A lookup found no matching place, server or user.
    NotFound,
    /// Authenticated, but not allowed into the private server.
    AccessDenied,
    /// The private-server status check failed for a reason other than
    /// access (server error, unexpected status).
    ServerCheckFailed,
    TicketRejected,
    JoinRejected,
    /// A response body had an unexpected shape.
    Protocol,
}

impl ErrorKind {
    /// Whether simply trying again later might succeed.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Transport | Self::CsrfUnavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::CsrfUnavailable => "csrf-unavailable",
            Self::NotAuthenticated => "not-authenticated",
            Self::InvalidFormat => "invalid-format",
            Self::NotFound => "not-found",
            Self::AccessDenied => "access-denied",
            Self::ServerCheckFailed => "server-check-failed",
            Self::TicketRejected => "ticket-rejected",
            Self::JoinRejected => "join-rejected",
            Self::Protocol => "protocol",
        };
        f.write_str(name)
    }
}

fn session_kind(e: &SessionError) -> ErrorKind {
    match e {
        SessionError::Transport(_) => ErrorKind::Transport,
        SessionError::Protocol(_) => ErrorKind::Protocol,
        SessionError::CsrfUnavailable { .. } => ErrorKind::CsrfUnavailable,
        SessionError::NotAuthenticated { .. } => ErrorKind::NotAuthenticated,
        SessionError::NotFound(_) => ErrorKind::NotFound,
    }
}

fn protocol_kind(e: &ProtocolError) -> ErrorKind {
    match e {
        ProtocolError::InvalidFormat(_) => ErrorKind::InvalidFormat,
        ProtocolError::Decode(_) => ErrorKind::Protocol,
    }
}

impl RbxJoinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Protocol(e) => protocol_kind(e),
            Self::Session(e) => session_kind(e),
            Self::Join(e) => match e {
                JoinError::Session(e) => session_kind(e),
                JoinError::Protocol(e) => protocol_kind(e),
                JoinError::InvalidFormat(_) => ErrorKind::InvalidFormat,
                JoinError::NotFound { .. } => ErrorKind::NotFound,
                JoinError::AccessDenied { .. } => ErrorKind::AccessDenied,
                JoinError::ServerCheckFailed { .. } => ErrorKind::ServerCheckFailed,
                JoinError::TicketRejected { .. } => ErrorKind::TicketRejected,
                JoinError::JoinRejected { .. } => ErrorKind::JoinRejected,
            },
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }

    /// A message to show the person at the keyboard, with what to try next.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Transport => {
                format!("Could not reach the server ({self}). Check your connection and try again.")
            }
            ErrorKind::CsrfUnavailable => {
                "The server did not issue a security token. Wait a moment and try again.".into()
            }
            ErrorKind::NotAuthenticated => "Your cookie was rejected. Tips:\n\
                 1. Make sure you copied the entire .ROBLOSECURITY value\n\
                 2. Log out and back in to get a fresh cookie\n\
                 3. Check whether your IP is being rate limited"
                .into(),
            ErrorKind::InvalidFormat => format!(
                "{self}. Paste a private server code, a share link, \
                 or a link containing privateServerLinkCode."
            ),
            ErrorKind::NotFound => format!("Nothing was found for that server ({self})."),
            ErrorKind::AccessDenied => match self {
                Self::Join(JoinError::AccessDenied { reason })
                    if reason != ACCESS_DENIED_ADVISORY =>
                {
                    format!("Access denied: {reason}.")
                }
                _ => "You are not authorized to access this private server. Possible causes:\n\
                     1. The link has expired or been regenerated\n\
                     2. This account is not whitelisted on the server\n\
                     3. The link was created by a different account"
                    .into(),
            },
            ErrorKind::ServerCheckFailed => match self {
                Self::Join(JoinError::ServerCheckFailed { status, .. }) => format!(
                    "Could not check the private server (status {status}). Try again later."
                ),
                _ => format!("Could not check the private server ({self}). Try again later."),
            },
            ErrorKind::TicketRejected => {
                format!("Could not get a join ticket ({self}). Try validating your cookie again.")
            }
            ErrorKind::JoinRejected => format!("The server refused the join request ({self})."),
            ErrorKind::Protocol => format!("Unexpected response from the server ({self})."),
        }
    }
}
