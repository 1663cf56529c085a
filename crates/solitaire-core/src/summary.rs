//! Display facts derived from a snapshot.
//!
//! Pure derivation, no I/O. Used for diagnostic output only — never for
//! game logic, which stays server-side.

use std::fmt;

use crate::protocol::Card;
use crate::snapshot::{GameStateSnapshot, PileId, TABLEAU_COUNT};

/// Card counts for one tableau column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableauSummary {
    /// Total cards in the column.
    pub total: usize,
    /// How many of them are face-up.
    pub face_up: usize,
}

/// Simple display facts derived from a [`GameStateSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySummary {
    /// The card on top of the stock, if any.
    pub stock_top: Option<Card>,
    /// How many cards remain in the stock.
    pub stock_size: usize,
    /// Per-column totals for the seven tableau piles.
    pub tableau: [TableauSummary; TABLEAU_COUNT as usize],
}

impl DisplaySummary {
    pub fn of(snapshot: &GameStateSnapshot) -> Self {
        let mut tableau = [TableauSummary::default(); TABLEAU_COUNT as usize];
        for (i, slot) in tableau.iter_mut().enumerate() {
            let cards = snapshot.cards(PileId::Tableau(i as u8));
            *slot = TableauSummary {
                total: cards.len(),
                face_up: cards.iter().filter(|c| c.face_up).count(),
            };
        }
        DisplaySummary {
            stock_top: snapshot.top_stock().copied(),
            stock_size: snapshot.cards(PileId::Stock).len(),
            tableau,
        }
    }
}

impl fmt::Display for DisplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stock_top {
            Some(card) => write!(f, "stock[{}] top {}", self.stock_size, card)?,
            None => write!(f, "stock empty")?,
        }
        for (i, t) in self.tableau.iter().enumerate() {
            write!(f, " | t{i}: {}/{} up", t.face_up, t.total)?;
        }
        Ok(())
    }
}
