//! Is the session credential currently accepted?
//!
//! Two probes, in order:
//!
//! ```text
//! identity endpoint ──200──→ valid (with identity)
//!        │
//!      other
//!        ▼
//! currency endpoint ──200──→ valid (no identity)
//!        │
//!      other
//!        ▼
//!     invalid (with the identity probe's status and error body)
//! ```
//!
//! The backup probe accepts any 200 without looking at the body. That is a
//! weak signal, kept as-is: the point is to agree with the service about
//! whether the cookie works, not to be stricter than it.

use std::fmt;

use rbxjoin_protocol::{AuthenticatedUser, RemoteErrorBody, decode};
use rbxjoin_transport::HttpTransport;

use crate::identity::lookup_name;
use crate::{Identity, SessionContext, SessionError};

/// Which probe accepted the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMethod {
    /// The identity endpoint answered 200.
    Primary,
    /// Only the currency endpoint answered 200.
    Backup,
}

/// Why validation failed, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Status of the identity probe.
    pub status: u16,
    /// Status of the backup probe.
    pub backup_status: u16,
    /// The identity probe's error body, when it parsed as one.
    pub remote_error: Option<RemoteErrorBody>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identity probe returned {}, backup probe returned {}",
            self.status, self.backup_status
        )?;
        if let Some(remote) = &self.remote_error {
            write!(f, ": {remote}")?;
        }
        Ok(())
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub ok: bool,
    /// Present only when the primary probe succeeded and returned an id.
    pub identity: Option<Identity>,
    pub method: Option<ValidationMethod>,
    pub failure: Option<ValidationFailure>,
}

impl ValidationResult {
    fn valid(method: ValidationMethod, identity: Option<Identity>) -> Self {
        Self {
            ok: true,
            identity,
            method: Some(method),
            failure: None,
        }
    }

    fn invalid(failure: ValidationFailure) -> Self {
        Self {
            ok: false,
            identity: None,
            method: None,
            failure: Some(failure),
        }
    }
}

/// Checks whether the service accepts the session.
///
/// Makes at most three requests (identity, name, backup) and never
/// retries.
///
/// # Errors
/// [`SessionError::Transport`] if either probe gets no response. A
/// rejected credential is `Ok` with `ok == false`, not an error.
pub async fn validate<T: HttpTransport>(
    session: &mut SessionContext<T>,
) -> Result<ValidationResult, SessionError> {
    let url = session.endpoints().authenticated_user();
    let primary = session.get(url, &[("Accept", "application/json")]).await?;

    if primary.status == 200 {
        let identity = match decode::<AuthenticatedUser>(&primary.body) {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session valid");
                let name = lookup_name(session, user.id).await;
                Some(Identity { id: user.id, name })
            }
            Err(e) => {
                tracing::warn!(error = %e, "session valid but identity body unreadable");
                None
            }
        };
        return Ok(ValidationResult::valid(ValidationMethod::Primary, identity));
    }

    tracing::debug!(status = primary.status, "identity probe rejected, trying backup probe");
    let url = session.endpoints().currency();
    let backup = session.get(url, &[("Accept", "application/json")]).await?;

    if backup.status == 200 {
        tracing::info!("session valid (backup probe)");
        return Ok(ValidationResult::valid(ValidationMethod::Backup, None));
    }

    let failure = ValidationFailure {
        status: primary.status,
        backup_status: backup.status,
        remote_error: RemoteErrorBody::parse(&primary.body),
    };
    tracing::warn!(%failure, "session validation failed");
    Ok(ValidationResult::invalid(failure))
}
