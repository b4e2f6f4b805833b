//! Where each remote call goes.
//!
//! The remote service is split across several hosts. [`Endpoints`] holds
//! one base URL per host and builds the full URL for every route the
//! client uses. Path parameters are percent-encoded.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Response header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Response header carrying the join ticket.
pub const TICKET_HEADER: &str = "rbx-authentication-ticket";

/// Request header asking the ticket/join endpoints for launcher semantics.
pub const AUTH_NEGOTIATION_HEADER: &str = "RBXAuthenticationNegotiation";

/// Base URLs for each remote host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Authentication host: logout probe and ticket issuance.
    pub auth: String,
    /// Users host: identity and profile lookups.
    pub users: String,
    /// Economy host: backup session probe.
    pub economy: String,
    /// Games host: server-link lookup and private-server status.
    pub games: String,
    /// Game-join host: join scripts.
    pub gamejoin: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: "https://auth.roblox.com".to_string(),
            users: "https://users.roblox.com".to_string(),
            economy: "https://economy.roblox.com".to_string(),
            games: "https://games.roblox.com".to_string(),
            gamejoin: "https://gamejoin.roblox.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Points every host at the same base URL. Handy for local doubles.
    pub fn uniform(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            auth: base.clone(),
            users: base.clone(),
            economy: base.clone(),
            games: base.clone(),
            gamejoin: base,
        }
    }

    /// `POST /v2/logout`: CSRF harvesting probe.
    pub fn logout(&self) -> String {
        join(&self.auth, "/v2/logout")
    }

    /// `POST /v1/authentication-ticket`.
    pub fn authentication_ticket(&self) -> String {
        join(&self.auth, "/v1/authentication-ticket")
    }

    /// `GET /v1/users/authenticated`.
    pub fn authenticated_user(&self) -> String {
        join(&self.users, "/v1/users/authenticated")
    }

    /// `GET /v1/users/{id}`.
    pub fn user(&self, id: UserId) -> String {
        join(&self.users, &format!("/v1/users/{}", id.0))
    }

    /// `GET /v1/user/currency`: backup session probe.
    pub fn currency(&self) -> String {
        join(&self.economy, "/v1/user/currency")
    }

    /// `GET /v1/games/server-link-code/{code}`.
    pub fn server_link_code(&self, code: &str) -> String {
        join(
            &self.games,
            &format!("/v1/games/server-link-code/{}", urlencoding::encode(code)),
        )
    }

    /// `GET /v1/games/{placeId}/private-servers/{code}`.
    pub fn private_server(&self, place_id: &str, code: &str) -> String {
        join(
            &self.games,
            &format!(
                "/v1/games/{}/private-servers/{}",
                urlencoding::encode(place_id),
                urlencoding::encode(code)
            ),
        )
    }

    /// `POST /v1/join-game`.
    pub fn join_game(&self) -> String {
        join(&self.gamejoin, "/v1/join-game")
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
