//! Wire protocol for rbxjoin.
//!
//! This crate defines what the client and the remote service say to each
//! other, without saying anything itself:
//!
//! - **Endpoints** ([`Endpoints`]): which host and path each call uses,
//!   plus the header names the handshake depends on.
//! - **Wire types** ([`AuthenticatedUser`], [`JoinGameRequest`], ...):
//!   the JSON bodies, as serde types.
//! - **References** ([`ServerReference`], [`ResolvedServer`]): parsing
//!   of user-supplied private-server codes and links.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (HTTP) → Protocol (shapes) → Session (credential) → Join (calls)
//! ```

mod endpoints;
mod error;
mod reference;
mod wire;

pub use endpoints::{AUTH_NEGOTIATION_HEADER, CSRF_HEADER, Endpoints, TICKET_HEADER};
pub use error::ProtocolError;
pub use reference::{ResolvedServer, ServerReference};
pub use wire::{
    AuthenticatedUser, JoinGameRequest, JoinGameResponse, PrivateServerStatus, RemoteError,
    RemoteErrorBody, ServerLinkLookup, UserId, UserProfile, decode,
};
