//! # rbxjoin
//!
//! Session authentication and server joining for a remote game platform.
//!
//! Give [`RbxClient`] a session cookie and it can tell you whether the
//! cookie works, who it belongs to, and how to get into a game: join
//! tickets, private server resolution from codes or links, and join
//! scripts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rbxjoin::prelude::*;
//!
//! # async fn run() -> Result<(), RbxJoinError> {
//! let mut client = RbxClient::new("_|WARNING:-DO-NOT-SHARE-THIS.--...")?;
//! let uri = client.prepare_launch("606849621", LaunchTarget::Public).await?;
//! // hand `uri` to the OS to start the game client
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Crate | Owns |
//! |-------|------|
//! | `rbxjoin-transport` | HTTP |
//! | `rbxjoin-protocol` | endpoints, JSON shapes, link parsing |
//! | `rbxjoin-session` | credential, cookies, CSRF, validation |
//! | `rbxjoin-join` | tickets, private servers, join scripts |

mod client;
mod error;
pub mod launch;

pub use client::RbxClient;
pub use error::{ErrorKind, RbxJoinError};

pub use rbxjoin_join as join;
pub use rbxjoin_protocol as protocol;
pub use rbxjoin_session as session;
pub use rbxjoin_transport as transport;

/// The types most callers need.
pub mod prelude {
    pub use crate::launch::{LaunchRequest, LaunchTarget};
    pub use crate::{ErrorKind, RbxClient, RbxJoinError};
    pub use rbxjoin_join::{JoinScript, JoinTicket};
    pub use rbxjoin_protocol::{ResolvedServer, ServerReference, UserId};
    pub use rbxjoin_session::{
        Identity, SessionConfig, SessionCredential, ValidationMethod, ValidationResult,
    };
}
