//! Session layer for rbxjoin.
//!
//! This crate holds everything tied to one account's credential:
//!
//! 1. **Context**: the credential, cookie jar and fixed headers
//!    ([`SessionContext`])
//! 2. **CSRF handshake**: a fresh anti-forgery token per mutating call
//!    ([`acquire_token`])
//! 3. **Identity**: which account the session is ([`get_user_id`],
//!    [`get_username`])
//! 4. **Validation**: whether the credential still works ([`validate`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Join layer (above)      ← tickets, private servers, join scripts
//!     ↕
//! Session layer (this crate)  ← credential, cookies, handshake
//!     ↕
//! Protocol + Transport (below)  ← shapes and HTTP
//! ```

mod context;
mod cookies;
mod csrf;
mod error;
mod identity;
mod validator;

pub use context::{SessionConfig, SessionContext, SessionCredential};
pub use cookies::CookieJar;
pub use csrf::{CsrfToken, acquire_token};
pub use error::SessionError;
pub use identity::{Identity, get_identity, get_user_id, get_username};
pub use validator::{ValidationFailure, ValidationMethod, ValidationResult, validate};
