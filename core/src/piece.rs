use serde::{Deserialize, Serialize};

use crate::{CardId, PiecePos};

/// Which side of a piece is facing up
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PieceFace {
    Back,
    Front(CardId),
}

impl PieceFace {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Front(_))
    }

    pub const fn card(self) -> Option<CardId> {
        match self {
            Self::Back => None,
            Self::Front(card) => Some(card),
        }
    }
}

impl Default for PieceFace {
    fn default() -> Self {
        Self::Back
    }
}

/// A single card on the board, its placement is fixed for the whole game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub pos: PiecePos,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub face: PieceFace,
}

impl Piece {
    pub fn is_revealed(&self) -> bool {
        self.face.is_revealed()
    }

    pub(crate) fn show(&mut self, card: CardId) {
        self.face = PieceFace::Front(card);
    }

    pub(crate) fn hide(&mut self) {
        self.face = PieceFace::Back;
    }
}
