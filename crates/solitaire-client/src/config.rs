//! Constructor-injected client configuration.
//!
//! The session client takes its server URL and rule variant explicitly;
//! there is no ambient settings singleton.

use solitaire_core::protocol::GameVariant;

/// Base URL used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Configuration for one [`SessionClient`](crate::session::SessionClient).
///
/// The variant is fixed for the session's lifetime; start a new client
/// (or call `new_game` on a reconfigured one) to switch rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL of the game server, without a trailing slash.
    pub server_url: String,
    /// Rule variant requested at session creation.
    pub variant: GameVariant,
}

impl SessionConfig {
    pub fn new(server_url: impl Into<String>, variant: GameVariant) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self {
            server_url,
            variant,
        }
    }

    /// Absolute URL for an endpoint path (`"/state"` etc.).
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL, GameVariant::Klondike)
    }
}
