use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Index into the card image list served with the game data.
pub type CardId = usize;

/// Grid position of a piece, serialized the way the match service expects it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PiecePos {
    pub row: Coord,
    pub column: Coord,
}

impl PiecePos {
    pub const fn new(row: Coord, column: Coord) -> Self {
        Self { row, column }
    }
}

impl From<(Coord, Coord)> for PiecePos {
    fn from((row, column): (Coord, Coord)) -> Self {
        Self { row, column }
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for PiecePos {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row.into(), self.column.into()]
    }
}

/// Board dimensions as `(rows, cols)`.
pub type BoardSize = (Coord, Coord);

pub const fn piece_count((rows, cols): BoardSize) -> u16 {
    let rows = rows as u16;
    let cols = cols as u16;
    rows.saturating_mul(cols)
}
