//! JSON shapes exchanged with the remote service.
//!
//! Every struct here mirrors a response or request body. Responses carry
//! far more fields than we read; serde ignores the rest. Fields we read
//! but the service sometimes omits are `Option` with `#[serde(default)]`,
//! so a missing field shows up as `None` instead of a decode error.

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Numeric account identifier.
///
/// `#[serde(transparent)]` keeps it a bare number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `GET /v1/users/authenticated`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /v1/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Private servers
// ---------------------------------------------------------------------------

/// `GET /v1/games/server-link-code/{code}`.
///
/// The place id arrives as a JSON number today; strings are accepted too
/// so a future change on the remote side doesn't break resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerLinkLookup {
    #[serde(rename = "placeId", default, deserialize_with = "id_as_string")]
    pub place_id: Option<String>,
}

/// `GET /v1/games/{placeId}/private-servers/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrivateServerStatus {
    #[serde(default)]
    pub active: Option<bool>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(de::Error::custom(format!(
            "expected a numeric id, found {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// `POST /v1/join-game` request body.
///
/// `#[serde(untagged)]` drops the variant name, so each variant is sent
/// as a plain object:
///
/// ```text
/// Public  → { "placeId": 1 }
/// Private → { "placeId": 1, "isVipServer": true, "vipServerId": "c", "gameId": null }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum JoinGameRequest {
    #[serde(rename_all = "camelCase")]
    Public { place_id: u64 },

    #[serde(rename_all = "camelCase")]
    Private {
        place_id: u64,
        is_vip_server: bool,
        vip_server_id: String,
        /// Always `null`: the server instance is chosen by the code.
        game_id: Option<String>,
    },
}

impl JoinGameRequest {
    pub fn public(place_id: u64) -> Self {
        Self::Public { place_id }
    }

    pub fn private(place_id: u64, server_code: impl Into<String>) -> Self {
        Self::Private {
            place_id,
            is_vip_server: true,
            vip_server_id: server_code.into(),
            game_id: None,
        }
    }
}

/// `POST /v1/join-game` response body.
///
/// `join_script` is opaque to us; it is handed to the game client as-is.
/// `status` and `message` explain why a 200 came back without a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameResponse {
    #[serde(default)]
    pub join_script: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors reported by the remote service
// ---------------------------------------------------------------------------

/// One entry of a remote error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// The `{ "errors": [...] }` body most endpoints return on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteErrorBody {
    pub errors: Vec<RemoteError>,
}

impl RemoteErrorBody {
    /// Parses an error body, or `None` if it isn't one.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

impl fmt::Display for RemoteErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} ({})", e.message, e.code)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Body helpers
// ---------------------------------------------------------------------------

/// Decodes a JSON response body.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProtocolError> {
    serde_json::from_slice(body).map_err(ProtocolError::Decode)
}
