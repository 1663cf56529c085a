//! Error taxonomy for the session client.
//!
//! Every failure is surfaced as a typed variant; nothing is silently
//! dropped. Responses that parse as JSON but lack the expected
//! discriminator keys get their own variant so callers can tell a
//! protocol drift from a garbled body.

use thiserror::Error;

/// Errors that can occur while talking to the game server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request failed at the network layer (connect, send, or read).
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not valid UTF-8 JSON.
    #[error("undecodable response body: {0}")]
    Decode(String),

    /// The body is valid JSON but lacks an expected key (`success`,
    /// `variant`, `state`, ...), or a key has the wrong type.
    #[error("response shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The server answered `success: false`.
    #[error("server rejected request (HTTP {status}): {message}")]
    Rejected { message: String, status: u16 },

    /// A state or game-action call was made before a session was created.
    #[error("no active session: create a game first")]
    NoSession,
}
