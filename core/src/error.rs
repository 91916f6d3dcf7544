use crate::{CardId, PiecePos};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates {0:?}")]
    InvalidCoords(PiecePos),
    #[error("Board of {rows}x{cols} pieces does not fit the canvas")]
    InvalidBoardShape { rows: usize, cols: usize },
    #[error("No click was in flight for {0:?}")]
    NoClickInFlight(PiecePos),
    #[error("Match service response carried no click result")]
    MissingClickResult,
    #[error("Match service rejected the click: {0}")]
    Rejected(String),
    #[error("Unknown card id {0}")]
    UnknownCard(CardId),
    #[error("Invalid game data: {0}")]
    InvalidGameData(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
