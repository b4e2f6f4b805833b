//! Private-server references: what the user pastes, and what we resolve
//! it to.
//!
//! Users paste one of three things into the "private server" box:
//!
//! ```text
//! Code        abc123
//! ShareLink   https://www.roblox.com/share?code=abc123&type=Server
//! DirectLink  https://www.roblox.com/games/9999/Name?privateServerLinkCode=abc123
//! ```
//!
//! [`ServerReference::classify`] turns the raw text into one of those
//! variants without touching the network. Resolution (network lookups and
//! access checks) lives in the join layer, which is the only place a
//! [`ResolvedServer`] gets built.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ProtocolError;

const DIRECT_LINK_MARKER: &str = "privateServerLinkCode=";

/// A classified private-server reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReference {
    /// A bare server code: no `/` and no `?`.
    Code(String),

    /// A share link. Only the code is carried; the place id must be
    /// looked up remotely.
    ShareLink { code: String },

    /// A legacy link with the place id in the path and the code in the
    /// `privateServerLinkCode` query parameter.
    DirectLink { place_id: String, code: String },
}

impl ServerReference {
    /// Classifies raw user input.
    ///
    /// Rules are tried in order: bare code, share link, direct link.
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidFormat`] when no rule matches, or when a
    /// rule matches but its required parts are missing.
    pub fn classify(raw: &str) -> Result<Self, ProtocolError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ProtocolError::InvalidFormat(
                "empty private server reference".into(),
            ));
        }

        if !raw.contains('/') && !raw.contains('?') {
            return Ok(Self::Code(raw.to_string()));
        }

        let url = parse_lenient(raw)?;

        if is_share_link(&url) {
            return share_code(&url).map(|code| Self::ShareLink { code });
        }

        if raw.contains(DIRECT_LINK_MARKER) {
            return direct_link(&url, raw);
        }

        Err(ProtocolError::InvalidFormat(
            "not a private server code, share link, or private server link".into(),
        ))
    }

    /// The server code carried by the input.
    pub fn code(&self) -> &str {
        match self {
            Self::Code(code) => code,
            Self::ShareLink { code } => code,
            Self::DirectLink { code, .. } => code,
        }
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Code(_) => "code",
            Self::ShareLink { .. } => "share-link",
            Self::DirectLink { .. } => "direct-link",
        }
    }
}

/// Parses a URL, retrying with `https://` when the scheme was left off
/// (`www.roblox.com/share?...`).
fn parse_lenient(raw: &str) -> Result<Url, ProtocolError> {
    Url::parse(raw)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| Url::parse(&format!("https://{raw}")).ok())
        .ok_or_else(|| ProtocolError::InvalidFormat(format!("not a valid link: {raw}")))
}

fn is_share_link(url: &Url) -> bool {
    let has_share_segment = url
        .path_segments()
        .is_some_and(|mut segments| segments.any(|s| s == "share"));
    let is_server = url.query_pairs().any(|(k, v)| k == "type" && v == "Server");
    let has_code = url.query_pairs().any(|(k, _)| k == "code");
    has_share_segment && is_server && has_code
}

fn share_code(url: &Url) -> Result<String, ProtocolError> {
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ProtocolError::InvalidFormat("share link has no code".into()))
}

fn direct_link(url: &Url, raw: &str) -> Result<ServerReference, ProtocolError> {
    let place_id = url
        .path_segments()
        .and_then(|mut segments| {
            segments.find(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        })
        .map(str::to_string)
        .ok_or_else(|| {
            ProtocolError::InvalidFormat("could not find a place id in the link".into())
        })?;

    // Taken from the raw text, not the parsed query: the code runs up to
    // the next `&` exactly as pasted.
    let code = raw
        .split_once(DIRECT_LINK_MARKER)
        .map(|(_, rest)| rest.split('&').next().unwrap_or(rest))
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ProtocolError::InvalidFormat("link has an empty server code".into()))?;

    Ok(ServerReference::DirectLink {
        place_id,
        code: code.to_string(),
    })
}

/// The canonical form of a private server: a place plus a server code.
///
/// Only the join layer constructs these, after whatever verification the
/// source format requires has passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedServer {
    pub place_id: String,
    pub server_code: String,
}

impl fmt::Display for ResolvedServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "place {} / server {}", self.place_id, self.server_code)
    }
}
