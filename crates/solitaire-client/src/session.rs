//! The session client: a read-only mirror of server-authoritative game
//! state, refreshed by wholesale snapshot replacement.
//!
//! One client owns one HTTP session with the game server. The lifecycle
//! is an explicit pipeline:
//!
//! 1. [`create_session`](SessionClient::create_session) — `POST /new`,
//!    validated against the creation-acknowledgment shape.
//! 2. [`fetch_state`](SessionClient::fetch_state) — `GET /state`,
//!    decoded into a [`GameStateSnapshot`] that replaces the stored one.
//!
//! [`new_game`](SessionClient::new_game) runs both steps and
//! short-circuits on any creation error, so a failed create never issues
//! the follow-up fetch. All operations are `async fn`s returning
//! `Result`; cancelling is dropping the future. Methods take `&mut self`,
//! so one session never has two requests in flight.
//!
//! No operation retries, and no timeout is enforced beyond reqwest's
//! defaults. Errors never touch the stored snapshot.

use serde::Serialize;
use serde::de::DeserializeOwned;

use solitaire_core::protocol::{
    ActionResponse, AutoMoveRequest, AutoMoveResponse, CheckWinResponse, GameVariant, HintResponse,
    MoveHint, MoveRequest, NewGameAck, NewGameRequest, StateResponse, VariantsResponse,
};
use solitaire_core::snapshot::{GameStateSnapshot, PileId, SessionMeta};
use solitaire_core::summary::DisplaySummary;

use crate::config::SessionConfig;
use crate::decode::decode_envelope;
use crate::error::ClientError;

/// Outcome of a mutating game action (`/move`, `/draw`, `/undo`, `/redo`).
///
/// The updated snapshot itself is stored on the client; this carries the
/// advisory counters that came with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub meta: SessionMeta,
    /// Whether the server reports the game as won after this action.
    pub game_won: bool,
    /// How many legal moves remain (sent on `/move` only, else 0).
    pub available_moves: u64,
}

/// Win check result (`POST /check_win`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinStatus {
    pub game_won: bool,
    pub score: i64,
}

/// Variants the server offers (`GET /variants`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantList {
    pub variants: Vec<String>,
    pub default_variant: String,
}

/// Owns the HTTP connection to the game server and the latest decoded
/// state snapshot.
pub struct SessionClient {
    config: SessionConfig,
    http: reqwest::Client,
    /// Set once a creation acknowledgment has been observed; gates every
    /// state or game-action request.
    variant: Option<GameVariant>,
    snapshot: Option<GameStateSnapshot>,
    meta: SessionMeta,
}

impl SessionClient {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            variant: None,
            snapshot: None,
            meta: SessionMeta::default(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The confirmed variant, `Some` once a session has been created.
    pub fn variant(&self) -> Option<GameVariant> {
        self.variant
    }

    /// The latest snapshot, if any fetch has succeeded.
    pub fn snapshot(&self) -> Option<&GameStateSnapshot> {
        self.snapshot.as_ref()
    }

    /// Advisory counters from the most recent server response.
    pub fn meta(&self) -> SessionMeta {
        self.meta
    }

    /// Display facts derived from the stored snapshot, if there is one.
    pub fn summarize(&self) -> Option<DisplaySummary> {
        self.snapshot.as_ref().map(DisplaySummary::of)
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Create a new server-side game (`POST /new`).
    ///
    /// Repeating this starts a fresh game and discards the old one
    /// server-side; the client holds no session token, so there is
    /// nothing else to invalidate.
    pub async fn create_session(&mut self) -> Result<SessionMeta, ClientError> {
        let request = NewGameRequest {
            variant: self.config.variant,
        };
        let ack: NewGameAck = self.post("/new", &request).await?;
        if ack.variant != self.config.variant.as_str() {
            tracing::warn!(
                requested = %self.config.variant,
                confirmed = %ack.variant,
                "server confirmed a different variant"
            );
        }
        self.variant = Some(self.config.variant);
        self.meta = SessionMeta {
            score: ack.score,
            moves: ack.moves,
        };
        tracing::info!(variant = %ack.variant, "session created");
        Ok(self.meta)
    }

    /// Fetch the full game state (`GET /state`) and replace the stored
    /// snapshot wholesale.
    ///
    /// Fails with [`ClientError::NoSession`] before the first successful
    /// [`create_session`](Self::create_session). On any error the
    /// previously stored snapshot is left untouched.
    pub async fn fetch_state(&mut self) -> Result<GameStateSnapshot, ClientError> {
        self.require_session()?;
        let resp: StateResponse = self.get("/state").await?;
        self.meta = SessionMeta {
            score: resp.score,
            moves: resp.moves,
        };
        let snapshot = resp.state;
        self.snapshot = Some(snapshot.clone());
        tracing::debug!(cards = snapshot.total_cards(), "snapshot replaced");
        Ok(snapshot)
    }

    /// The create-then-fetch pipeline: create a session, and only if the
    /// creation acknowledgment decodes, fetch the initial state.
    pub async fn new_game(&mut self) -> Result<GameStateSnapshot, ClientError> {
        self.create_session().await?;
        self.fetch_state().await
    }

    /// List the variants the server offers (`GET /variants`). Does not
    /// require a session.
    pub async fn list_variants(&self) -> Result<VariantList, ClientError> {
        let resp: VariantsResponse = self.get("/variants").await?;
        Ok(VariantList {
            variants: resp.variants,
            default_variant: resp.default_variant,
        })
    }

    // ------------------------------------------------------------------
    // Game actions (server mutates, client re-mirrors)
    // ------------------------------------------------------------------

    /// Move `count` cards from one pile to another (`POST /move`).
    pub async fn move_cards(
        &mut self,
        from: PileId,
        to: PileId,
        count: usize,
    ) -> Result<ActionOutcome, ClientError> {
        self.require_session()?;
        let request = MoveRequest {
            from: from.name(),
            to: to.name(),
            count,
        };
        let resp: ActionResponse = self.post("/move", &request).await?;
        Ok(self.apply_action(resp))
    }

    /// Draw from the stock onto the waste (`POST /draw`).
    pub async fn draw(&mut self) -> Result<ActionOutcome, ClientError> {
        self.require_session()?;
        let resp: ActionResponse = self.post_empty("/draw").await?;
        Ok(self.apply_action(resp))
    }

    /// Undo the last move (`POST /undo`).
    pub async fn undo(&mut self) -> Result<ActionOutcome, ClientError> {
        self.require_session()?;
        let resp: ActionResponse = self.post_empty("/undo").await?;
        Ok(self.apply_action(resp))
    }

    /// Redo a previously undone move (`POST /redo`).
    pub async fn redo(&mut self) -> Result<ActionOutcome, ClientError> {
        self.require_session()?;
        let resp: ActionResponse = self.post_empty("/redo").await?;
        Ok(self.apply_action(resp))
    }

    /// Let the server pick and play the best move out of `from`
    /// (`POST /auto_move`, foundation destinations preferred). Returns
    /// the move the server chose; the snapshot is replaced as usual.
    pub async fn auto_move(&mut self, from: PileId) -> Result<MoveHint, ClientError> {
        self.require_session()?;
        let request = AutoMoveRequest { from: from.name() };
        let resp: AutoMoveResponse = self.post("/auto_move", &request).await?;
        self.meta = SessionMeta {
            score: resp.score,
            moves: resp.moves,
        };
        self.snapshot = Some(resp.state);
        Ok(resp.chosen)
    }

    /// Ask the server for a suggested move (`POST /hint`).
    ///
    /// The server answers "no hints available" as a rejection with
    /// HTTP 200; that case maps to `Ok(None)`. Other rejections (e.g.
    /// no active game, HTTP 404) stay errors.
    pub async fn hint(&mut self) -> Result<Option<MoveHint>, ClientError> {
        self.require_session()?;
        match self.post_empty::<HintResponse>("/hint").await {
            Ok(resp) => Ok(Some(resp.hint)),
            Err(ClientError::Rejected { status: 200, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Ask whether the game is won (`POST /check_win`).
    pub async fn check_win(&mut self) -> Result<WinStatus, ClientError> {
        self.require_session()?;
        let resp: CheckWinResponse = self.post_empty("/check_win").await?;
        Ok(WinStatus {
            game_won: resp.game_won,
            score: resp.score,
        })
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    fn require_session(&self) -> Result<(), ClientError> {
        if self.variant.is_none() {
            return Err(ClientError::NoSession);
        }
        Ok(())
    }

    /// Fold a successful action response into the stored state.
    fn apply_action(&mut self, resp: ActionResponse) -> ActionOutcome {
        self.meta = SessionMeta {
            score: resp.score,
            moves: resp.moves,
        };
        self.snapshot = Some(resp.state);
        ActionOutcome {
            meta: self.meta,
            game_won: resp.game_won,
            available_moves: resp.available_moves,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        Self::decode(&url, resp).await
    }

    /// `POST` with a JSON body (sets `Content-Type: application/json`).
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "POST");
        let resp = self.http.post(&url).json(body).send().await?;
        Self::decode(&url, resp).await
    }

    /// `POST` with an empty body (the server reads `{}` for those).
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        tracing::debug!(%url, "POST (empty)");
        let resp = self.http.post(&url).send().await?;
        Self::decode(&url, resp).await
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        decode_envelope(status, &body)
            .inspect_err(|e| tracing::warn!(%url, status, error = %e, "request failed"))
    }
}
