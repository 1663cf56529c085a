use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A card suit, serialized as the upper-case suit name on the wire
/// (`"HEARTS"`, `"DIAMONDS"`, `"CLUBS"`, `"SPADES"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// The four suits in the order the server deals them.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        }
    }

    /// Card color: hearts and diamonds are red, clubs and spades black.
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }
}

/// Red or black, as Klondike stacking rules see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Serializable card representation.
///
/// The server also sends derived fields (`suit_symbol`, `rank_name`,
/// `color`); those are ignored during decode and re-derived locally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    /// 1–13 (1 = Ace, 11 = Jack, 12 = Queen, 13 = King).
    pub rank: u8,
    pub suit: Suit,
    /// Whether the card's face is visible to the player.
    #[serde(default)]
    pub face_up: bool,
}

impl Card {
    pub fn rank_str(&self) -> &'static str {
        match self.rank {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "T",
            11 => "J",
            12 => "Q",
            13 => "K",
            _ => "?",
        }
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.face_up {
            write!(f, "{}{}", self.rank_str(), self.suit.symbol())
        } else {
            // Face-down cards render as a back, matching what the player sees.
            write!(f, "##")
        }
    }
}

/// Rule variant identifier, chosen client-side before session creation
/// and immutable for the session's lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameVariant {
    /// Classic Klondike, draw one card from stock.
    #[serde(rename = "klondike")]
    Klondike,
    /// Harder variant, draw three cards from stock.
    #[serde(rename = "klondike-3")]
    KlondikeDrawThree,
}

impl GameVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            GameVariant::Klondike => "klondike",
            GameVariant::KlondikeDrawThree => "klondike-3",
        }
    }

    /// Human-readable label for diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            GameVariant::Klondike => "Klondike (1 card)",
            GameVariant::KlondikeDrawThree => "Klondike (3 cards)",
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "klondike" => Ok(GameVariant::Klondike),
            "klondike-3" => Ok(GameVariant::KlondikeDrawThree),
            other => Err(format!("unknown game variant: {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub variant: GameVariant,
}

/// Body of `POST /move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub count: usize,
}

/// Body of `POST /auto_move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMoveRequest {
    pub from: String,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------
//
// Every server response carries a `success` discriminator; the remaining
// keys depend on the endpoint. Decoding a response into one of these types
// fails if a required discriminator key is absent — the client surfaces
// that as a shape-mismatch error instead of dropping the response.

use crate::snapshot::GameStateSnapshot;

/// `POST /new` acknowledgment: `{"success", "variant", "score", "moves"}`.
///
/// Carrying the `variant` key is what distinguishes a creation
/// acknowledgment from every other response shape; the client only
/// proceeds to fetch state after decoding one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGameAck {
    pub success: bool,
    pub variant: String,
    pub score: i64,
    pub moves: u64,
}

/// `GET /state` response: `{"success", "state": {...}, "score", "moves"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub success: bool,
    pub state: GameStateSnapshot,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub moves: u64,
}

/// Response to the mutating endpoints (`/move`, `/draw`, `/undo`, `/redo`).
///
/// Same shape as [`StateResponse`] plus per-endpoint extras the server
/// includes on `/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub state: GameStateSnapshot,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub moves: u64,
    #[serde(default)]
    pub available_moves: u64,
    #[serde(default)]
    pub game_won: bool,
}

/// A move reference as the server describes it (`/hint`, `/auto_move`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveHint {
    pub from: String,
    pub to: String,
    pub count: usize,
}

impl fmt::Display for MoveHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({} card(s))", self.from, self.to, self.count)
    }
}

/// `POST /auto_move` response: the move the server chose plus the
/// resulting state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMoveResponse {
    pub success: bool,
    #[serde(rename = "move")]
    pub chosen: MoveHint,
    pub state: GameStateSnapshot,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub moves: u64,
}

/// `POST /hint` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    pub success: bool,
    pub hint: MoveHint,
}

/// `POST /check_win` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckWinResponse {
    pub success: bool,
    pub game_won: bool,
    #[serde(default)]
    pub score: i64,
}

/// `GET /variants` response: available variant ids plus the server default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantsResponse {
    pub success: bool,
    pub variants: Vec<String>,
    #[serde(rename = "default")]
    pub default_variant: String,
}
