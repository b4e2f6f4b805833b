//! Join layer for rbxjoin.
//!
//! Every call in this crate changes, or may change, state on the remote
//! service, so every call starts with its own CSRF handshake
//! ([`rbxjoin_session::acquire_token`]). Nothing is cached between calls.
//!
//! # Key operations
//!
//! - [`issue_ticket`]: trade the session for a short-lived [`JoinTicket`]
//! - [`resolve`]: turn a pasted code or link into a [`ResolvedServer`]
//! - [`verify_access`]: check that a private server is usable
//! - [`join_script`] / [`private_join_script`]: fetch the [`JoinScript`]
//!   the game client connects with
//!
//! [`ResolvedServer`]: rbxjoin_protocol::ResolvedServer

mod error;
mod resolver;
mod script;
mod ticket;

pub use error::JoinError;
pub use resolver::{ACCESS_DENIED_ADVISORY, lookup_by_code, resolve, verify_access};
pub use script::{JoinScript, join_script, private_join_script};
pub use ticket::{JoinTicket, issue_ticket};
