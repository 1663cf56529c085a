//! In-memory mirror of the server-authoritative game state.
//!
//! A [`GameStateSnapshot`] is replaced wholesale on each successful fetch;
//! nothing in this crate mutates piles locally. Accessors tolerate piles
//! the server omitted (treated as empty) so derived totals stay defined.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::protocol::Card;

/// Number of foundation piles in Klondike.
pub const FOUNDATION_COUNT: u8 = 4;
/// Number of tableau columns in Klondike.
pub const TABLEAU_COUNT: u8 = 7;

/// Typed identifier for one of the 13 standard Klondike piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileId {
    Stock,
    Waste,
    /// Foundation index 0–3.
    Foundation(u8),
    /// Tableau column index 0–6.
    Tableau(u8),
}

impl PileId {
    /// Wire name for this pile (`"stock"`, `"foundation_2"`, ...).
    pub fn name(self) -> String {
        match self {
            PileId::Stock => "stock".to_string(),
            PileId::Waste => "waste".to_string(),
            PileId::Foundation(i) => format!("foundation_{i}"),
            PileId::Tableau(i) => format!("tableau_{i}"),
        }
    }

    /// Parse a wire pile name. Returns `None` for names outside the 13
    /// standard piles.
    pub fn parse(name: &str) -> Option<PileId> {
        match name {
            "stock" => return Some(PileId::Stock),
            "waste" => return Some(PileId::Waste),
            _ => {}
        }
        let index = |prefix: &str, max: u8| -> Option<u8> {
            let n: u8 = name.strip_prefix(prefix)?.parse().ok()?;
            (n < max).then_some(n)
        };
        if let Some(i) = index("foundation_", FOUNDATION_COUNT) {
            return Some(PileId::Foundation(i));
        }
        if let Some(i) = index("tableau_", TABLEAU_COUNT) {
            return Some(PileId::Tableau(i));
        }
        None
    }

    /// All 13 piles in display order: stock, waste, foundations, tableaus.
    pub fn all() -> impl Iterator<Item = PileId> {
        [PileId::Stock, PileId::Waste]
            .into_iter()
            .chain((0..FOUNDATION_COUNT).map(PileId::Foundation))
            .chain((0..TABLEAU_COUNT).map(PileId::Tableau))
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// One named pile as the server encodes it. The server also sends a
/// redundant `name` key, ignored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PileState {
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// The decoded `state` object: a mapping of pile names to card sequences.
///
/// The server's encoder keeps the stock and waste as top-level keys of
/// `state`; only foundations and tableaus live under `piles`. Both
/// layouts decode here: [`cards`](Self::cards) consults `piles` first and
/// falls back to the top-level fields.
///
/// Read-only mirror of server state. The counters the server embeds
/// alongside the piles are duplicated in the response envelope; the ones
/// here are kept for completeness.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateSnapshot {
    pub piles: BTreeMap<String, PileState>,
    #[serde(default)]
    pub stock: PileState,
    #[serde(default)]
    pub waste: PileState,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub moves_count: u64,
}

impl GameStateSnapshot {
    /// Cards in the given pile, empty if the server omitted it.
    pub fn cards(&self, id: PileId) -> &[Card] {
        if let Some(pile) = self.piles.get(&id.name()) {
            return &pile.cards;
        }
        match id {
            PileId::Stock => &self.stock.cards,
            PileId::Waste => &self.waste.cards,
            _ => &[],
        }
    }

    /// The card on top of the stock, if the stock is non-empty.
    pub fn top_stock(&self) -> Option<&Card> {
        self.cards(PileId::Stock).last()
    }

    /// Total number of cards across all 13 standard piles.
    pub fn total_cards(&self) -> usize {
        PileId::all().map(|id| self.cards(id).len()).sum()
    }

    /// Whether every foundation holds a full suit (52 cards on
    /// foundations = game won).
    pub fn foundations_complete(&self) -> bool {
        (0..FOUNDATION_COUNT).all(|i| self.cards(PileId::Foundation(i)).len() == 13)
    }
}

/// Advisory score/move counters returned alongside creation and update
/// responses. Display data only; never consulted for game logic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionMeta {
    pub score: i64,
    pub moves: u64,
}

impl fmt::Display for SessionMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score {} after {} move(s)", self.score, self.moves)
    }
}
