//! `RbxClient`: one account's entry point to every operation.
//!
//! The client owns a single [`SessionContext`] and forwards to the session
//! and join layers, converting their errors into [`RbxJoinError`]. Methods
//! take `&mut self`; to share a client between tasks, put it behind a
//! `tokio::sync::Mutex`.

use rbxjoin_join::{JoinScript, JoinTicket};
use rbxjoin_protocol::{ResolvedServer, UserId};
use rbxjoin_session::{
    Identity, SessionConfig, SessionContext, SessionCredential, ValidationResult,
};
use rbxjoin_transport::{HttpTransport, ReqwestTransport};

use crate::RbxJoinError;
use crate::launch::{LaunchRequest, LaunchTarget};

/// A client bound to one session credential.
///
/// # Example
///
/// ```rust,no_run
/// use rbxjoin::prelude::*;
///
/// # async fn run() -> Result<(), RbxJoinError> {
/// let mut client = RbxClient::new("_|WARNING:-DO-NOT-SHARE-THIS.--...")?;
/// if client.validate().await?.ok {
///     let server = client.resolve("https://www.roblox.com/share?code=abc&type=Server").await?;
///     let script = client
///         .private_join_script(&server.place_id, &server.server_code)
///         .await?;
///     println!("{script}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RbxClient<T: HttpTransport = ReqwestTransport> {
    session: SessionContext<T>,
}

impl RbxClient<ReqwestTransport> {
    /// A client talking to the live service with default settings.
    pub fn new(credential: impl Into<String>) -> Result<Self, RbxJoinError> {
        Ok(Self::with_transport(
            SessionCredential::new(credential),
            SessionConfig::default(),
            ReqwestTransport::new()?,
        ))
    }
}

impl<T: HttpTransport> RbxClient<T> {
    pub fn with_transport(credential: SessionCredential, config: SessionConfig, transport: T) -> Self {
        Self {
            session: SessionContext::new(credential, config, transport),
        }
    }

    pub fn session(&self) -> &SessionContext<T> {
        &self.session
    }

    /// See [`rbxjoin_session::validate`].
    pub async fn validate(&mut self) -> Result<ValidationResult, RbxJoinError> {
        Ok(rbxjoin_session::validate(&mut self.session).await?)
    }

    pub async fn user_id(&mut self) -> Result<UserId, RbxJoinError> {
        Ok(rbxjoin_session::get_user_id(&mut self.session).await?)
    }

    pub async fn username(&mut self, id: UserId) -> Result<String, RbxJoinError> {
        Ok(rbxjoin_session::get_username(&mut self.session, id).await?)
    }

    /// User id plus a best-effort display name.
    pub async fn identity(&mut self) -> Result<Identity, RbxJoinError> {
        Ok(rbxjoin_session::get_identity(&mut self.session).await?)
    }

    pub async fn issue_ticket(&mut self) -> Result<JoinTicket, RbxJoinError> {
        Ok(rbxjoin_join::issue_ticket(&mut self.session).await?)
    }

    /// Resolves a pasted private server code or link.
    pub async fn resolve(&mut self, raw: &str) -> Result<ResolvedServer, RbxJoinError> {
        Ok(rbxjoin_join::resolve(&mut self.session, raw).await?)
    }

    pub async fn verify_access(
        &mut self,
        place_id: &str,
        server_code: &str,
    ) -> Result<bool, RbxJoinError> {
        Ok(rbxjoin_join::verify_access(&mut self.session, place_id, server_code).await?)
    }

    pub async fn join_script(&mut self, place_id: &str) -> Result<JoinScript, RbxJoinError> {
        Ok(rbxjoin_join::join_script(&mut self.session, place_id).await?)
    }

    pub async fn private_join_script(
        &mut self,
        place_id: &str,
        server_code: &str,
    ) -> Result<JoinScript, RbxJoinError> {
        Ok(rbxjoin_join::private_join_script(&mut self.session, place_id, server_code).await?)
    }

    /// Issues a fresh ticket and builds a launch URI around it.
    ///
    /// A new ticket is requested on every call; the returned URI is good
    /// for one launch.
    pub async fn prepare_launch(
        &mut self,
        place_id: &str,
        target: LaunchTarget,
    ) -> Result<String, RbxJoinError> {
        let ticket = self.issue_ticket().await?;
        let request = LaunchRequest::new(place_id, target);
        tracing::info!(place_id, target = ?request.target, "launch prepared");
        Ok(request.uri(&ticket))
    }
}
