//! Launch URIs for the installed game client.
//!
//! The client registers the `roblox-player:` scheme. A launch URI bundles
//! a join ticket with a `PlaceLauncher.ashx` URL that says which server to
//! join:
//!
//! ```text
//! roblox-player:1+launchmode:play+gameinfo:{ticket}+launchtime:{ms}
//!     +placelauncherurl:{percent-encoded launcher url}+browsertrackerid:{n}
//! ```
//!
//! Building the URI does no I/O. Starting the client process is up to the
//! caller.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rbxjoin_join::JoinTicket;

const PLACE_LAUNCHER: &str = "https://assetgame.roblox.com/game/PlaceLauncher.ashx";

/// Which server of a place to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Any public server the matchmaker picks.
    Public,
    /// A specific running public server.
    Instance { job_id: String },
    /// A private server, by its access code.
    Private { access_code: String },
}

/// A place plus a target, ready to be turned into a launch URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub place_id: String,
    pub target: LaunchTarget,
    pub launch_time_ms: u128,
    pub browser_tracker_id: u64,
}

impl LaunchRequest {
    /// Stamps the current time and a random tracker id.
    pub fn new(place_id: impl Into<String>, target: LaunchTarget) -> Self {
        let launch_time_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self {
            place_id: place_id.into(),
            target,
            launch_time_ms,
            browser_tracker_id: rand::rng().random_range(100_000_000..=9_999_999_999_999),
        }
    }

    /// The `PlaceLauncher.ashx` URL for this request.
    pub fn placelauncher_url(&self) -> String {
        let place = urlencoding::encode(&self.place_id);
        match &self.target {
            LaunchTarget::Public => {
                format!("{PLACE_LAUNCHER}?placeId={place}&request=RequestGame")
            }
            LaunchTarget::Instance { job_id } => format!(
                "{PLACE_LAUNCHER}?placeId={place}&gameId={}&request=RequestGame",
                urlencoding::encode(job_id)
            ),
            LaunchTarget::Private { access_code } => format!(
                "{PLACE_LAUNCHER}?placeId={place}&accessCode={}&request=RequestPrivateGame",
                urlencoding::encode(access_code)
            ),
        }
    }

    /// The full `roblox-player:` URI.
    ///
    /// The result embeds the ticket; treat it as a secret.
    pub fn uri(&self, ticket: &JoinTicket) -> String {
        format!(
            "roblox-player:1+launchmode:play+gameinfo:{}+launchtime:{}+placelauncherurl:{}+browsertrackerid:{}",
            ticket.as_str(),
            self.launch_time_ms,
            urlencoding::encode(&self.placelauncher_url()),
            self.browser_tracker_id,
        )
    }
}
