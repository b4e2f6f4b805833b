//! Private-server resolution.
//!
//! ```text
//! raw input ──classify──→ Code / ShareLink ──lookup_by_code──→ ResolvedServer
//!                     └──→ DirectLink ──verify_access──→ ResolvedServer
//! ```
//!
//! The code lookup only answers for servers the session may join, so it
//! doubles as the access check. A direct link names the place itself, and
//! nothing has checked access yet, so it gets an explicit status probe.

use rbxjoin_protocol::{
    CSRF_HEADER, PrivateServerStatus, ProtocolError, ResolvedServer, ServerLinkLookup,
    ServerReference, decode,
};
use rbxjoin_session::{SessionContext, acquire_token};
use rbxjoin_transport::{HttpRequest, HttpTransport};

use crate::JoinError;

/// What to tell the user when a private server refuses access.
pub const ACCESS_DENIED_ADVISORY: &str = "not authorized to access this private server. \
Possible causes: the link has expired or been regenerated; \
this account is not whitelisted on the server; \
the link was created by a different account";

/// Resolves any supported private-server reference.
///
/// # Errors
/// - [`JoinError::InvalidFormat`]: the input is not a code or a known link
/// - [`JoinError::NotFound`]: the code lookup found nothing
/// - [`JoinError::AccessDenied`]: a direct link to a server that is
///   inactive or closed to this account
/// - [`JoinError::Session`]: transport failure or no CSRF token
pub async fn resolve<T: HttpTransport>(
    session: &mut SessionContext<T>,
    raw: &str,
) -> Result<ResolvedServer, JoinError> {
    let reference = ServerReference::classify(raw).map_err(|e| match e {
        ProtocolError::InvalidFormat(msg) => JoinError::InvalidFormat(msg),
        other => JoinError::Protocol(other),
    })?;
    tracing::debug!(kind = reference.kind(), "classified server reference");

    match reference {
        ServerReference::Code(code) | ServerReference::ShareLink { code } => {
            lookup_by_code(session, &code).await
        }
        ServerReference::DirectLink { place_id, code } => {
            if !verify_access(session, &place_id, &code).await? {
                return Err(JoinError::AccessDenied {
                    reason: "the private server is not active".into(),
                });
            }
            let server = ResolvedServer {
                place_id,
                server_code: code,
            };
            tracing::info!(%server, "resolved direct link");
            Ok(server)
        }
    }
}

/// Looks up which place a server code belongs to.
pub async fn lookup_by_code<T: HttpTransport>(
    session: &mut SessionContext<T>,
    code: &str,
) -> Result<ResolvedServer, JoinError> {
    let token = acquire_token(session).await?;
    let request = HttpRequest::get(session.endpoints().server_link_code(code))
        .header(CSRF_HEADER, token.into_inner())
        .header("Accept", "application/json");
    let response = session.send(request).await?;

    if response.status != 200 {
        tracing::warn!(status = response.status, "server code lookup rejected");
        return Err(JoinError::NotFound {
            status: response.status,
            body: response.text(),
        });
    }

    let lookup: ServerLinkLookup = decode(&response.body)?;
    let Some(place_id) = lookup.place_id else {
        tracing::warn!("server code lookup returned no place id");
        return Err(JoinError::NotFound {
            status: response.status,
            body: response.text(),
        });
    };

    let server = ResolvedServer {
        place_id,
        server_code: code.to_string(),
    };
    tracing::info!(%server, "resolved server code");
    Ok(server)
}

/// Checks whether a private server exists, is active, and admits this
/// account.
///
/// `Ok(false)` means the server exists but is not active.
///
/// # Errors
/// - [`JoinError::AccessDenied`]: 401, with [`ACCESS_DENIED_ADVISORY`]
/// - [`JoinError::ServerCheckFailed`]: any other non-200 status
pub async fn verify_access<T: HttpTransport>(
    session: &mut SessionContext<T>,
    place_id: &str,
    code: &str,
) -> Result<bool, JoinError> {
    let token = acquire_token(session).await?;
    let request = HttpRequest::get(session.endpoints().private_server(place_id, code))
        .header(CSRF_HEADER, token.into_inner())
        .header("Accept", "application/json");
    let response = session.send(request).await?;

    match response.status {
        200 => {
            let status: PrivateServerStatus = decode(&response.body)?;
            let active = status.active == Some(true);
            if active {
                tracing::info!(place_id, "private server access verified");
            } else {
                tracing::warn!(place_id, "private server is not active");
            }
            Ok(active)
        }
        401 => {
            tracing::warn!(place_id, "private server access denied");
            Err(JoinError::AccessDenied {
                reason: ACCESS_DENIED_ADVISORY.into(),
            })
        }
        status => {
            tracing::warn!(place_id, status, "private server check failed");
            Err(JoinError::ServerCheckFailed {
                status,
                body: response.text(),
            })
        }
    }
}
