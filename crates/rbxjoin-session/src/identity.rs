//! Who the session belongs to.

use rbxjoin_protocol::{AuthenticatedUser, UserId, UserProfile, decode};
use rbxjoin_transport::HttpTransport;

use crate::{SessionContext, SessionError};

/// A resolved account identity. Recomputed on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    /// `None` when the best-effort name lookup failed.
    pub name: Option<String>,
}

const ACCEPT_JSON: (&str, &str) = ("Accept", "application/json");

/// Asks the service which account the session belongs to.
///
/// # Errors
/// [`SessionError::NotAuthenticated`] for any non-200 status.
pub async fn get_user_id<T: HttpTransport>(
    session: &mut SessionContext<T>,
) -> Result<UserId, SessionError> {
    let url = session.endpoints().authenticated_user();
    let response = session.get(url, &[ACCEPT_JSON]).await?;

    if response.status != 200 {
        tracing::warn!(status = response.status, "identity probe rejected");
        return Err(SessionError::NotAuthenticated {
            status: response.status,
            body: response.text(),
        });
    }

    let user: AuthenticatedUser = decode(&response.body)?;
    tracing::info!(user_id = %user.id, "authenticated");
    Ok(user.id)
}

/// Looks up an account's display name.
///
/// Best-effort: callers are expected to carry on without a name when this
/// fails.
pub async fn get_username<T: HttpTransport>(
    session: &mut SessionContext<T>,
    id: UserId,
) -> Result<String, SessionError> {
    let url = session.endpoints().user(id);
    let response = session.get(url, &[ACCEPT_JSON]).await?;

    if response.status != 200 {
        return Err(SessionError::NotFound(id));
    }

    let profile: UserProfile = decode(&response.body)?;
    profile.name.ok_or(SessionError::NotFound(id))
}

/// [`get_user_id`] plus a tolerated [`get_username`].
pub async fn get_identity<T: HttpTransport>(
    session: &mut SessionContext<T>,
) -> Result<Identity, SessionError> {
    let id = get_user_id(session).await?;
    let name = lookup_name(session, id).await;
    Ok(Identity { id, name })
}

/// Name lookup whose failure is logged and swallowed.
pub(crate) async fn lookup_name<T: HttpTransport>(
    session: &mut SessionContext<T>,
    id: UserId,
) -> Option<String> {
    match get_username(session, id).await {
        Ok(name) => {
            tracing::info!(user_id = %id, username = %name, "resolved username");
            Some(name)
        }
        Err(e) => {
            tracing::debug!(user_id = %id, error = %e, "username lookup failed");
            None
        }
    }
}
