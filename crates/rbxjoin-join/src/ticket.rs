//! Authentication tickets for the local game client.

use std::fmt;

use rbxjoin_protocol::{AUTH_NEGOTIATION_HEADER, CSRF_HEADER, TICKET_HEADER};
use rbxjoin_session::{SessionContext, acquire_token};
use rbxjoin_transport::{HttpRequest, HttpTransport};

use crate::JoinError;

/// A short-lived, single-launch credential for the game client.
///
/// Issue a new one for every launch. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct JoinTicket(String);

impl JoinTicket {
    /// Wraps a ticket value issued by the remote service.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for JoinTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JoinTicket(<redacted>)")
    }
}

/// Exchanges the session for a join ticket.
///
/// The ticket comes back in a response header; the body is ignored.
///
/// # Errors
/// - [`JoinError::Session`]: transport failure or no CSRF token
/// - [`JoinError::TicketRejected`]: status other than 200/201, or no
///   ticket header
pub async fn issue_ticket<T: HttpTransport>(
    session: &mut SessionContext<T>,
) -> Result<JoinTicket, JoinError> {
    let token = acquire_token(session).await?;

    let request = HttpRequest::post(session.endpoints().authentication_ticket())
        .header(CSRF_HEADER, token.into_inner())
        .header("Referer", "https://www.roblox.com/games")
        .header(AUTH_NEGOTIATION_HEADER, "1")
        .json_body(&serde_json::json!({}))?;
    let response = session.send(request).await?;

    if !matches!(response.status, 200 | 201) {
        tracing::warn!(status = response.status, "ticket request rejected");
        return Err(JoinError::TicketRejected {
            status: response.status,
            reason: response.text(),
        });
    }

    match response.header(TICKET_HEADER).filter(|t| !t.is_empty()) {
        Some(ticket) => {
            tracing::info!(status = response.status, "join ticket issued");
            Ok(JoinTicket::new(ticket))
        }
        None => {
            tracing::warn!(status = response.status, "ticket header missing");
            Err(JoinError::TicketRejected {
                status: response.status,
                reason: "no ticket in response headers".into(),
            })
        }
    }
}
