use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// All pieces of a game laid out on the canvas, indexed by row and column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: BoardLayout,
    pieces: Array2<Piece>,
}

impl Board {
    pub fn new(layout: BoardLayout) -> Self {
        let (rows, cols) = layout.size();
        let scale = layout.piece_scale();
        let pieces = Array2::from_shape_fn((usize::from(rows), usize::from(cols)), |(row, column)| {
            // both fit in Coord because the shape came from Coord values
            let pos = PiecePos::new(row as Coord, column as Coord);
            let (x, y) = layout.piece_origin(pos);
            Piece {
                pos,
                x,
                y,
                scale,
                face: PieceFace::Back,
            }
        });
        log::debug!("built {}x{} board, piece scale {:.3}", rows, cols, scale);
        Self { layout, pieces }
    }

    pub fn with_size(rows: Coord, cols: Coord) -> Result<Self> {
        BoardLayout::new(rows, cols).map(Self::new)
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn size(&self) -> BoardSize {
        self.layout.size()
    }

    pub fn validate_pos(&self, pos: PiecePos) -> Result<PiecePos> {
        let (rows, cols) = self.size();
        if pos.row < rows && pos.column < cols {
            Ok(pos)
        } else {
            Err(GameError::InvalidCoords(pos))
        }
    }

    pub fn piece_at(&self, pos: PiecePos) -> Result<&Piece> {
        let pos = self.validate_pos(pos)?;
        Ok(&self.pieces[pos.to_nd_index()])
    }

    pub fn is_revealed(&self, pos: PiecePos) -> Result<bool> {
        self.piece_at(pos).map(Piece::is_revealed)
    }

    pub fn reveal(&mut self, pos: PiecePos, card: CardId) -> Result<()> {
        let pos = self.validate_pos(pos)?;
        self.pieces[pos.to_nd_index()].show(card);
        Ok(())
    }

    pub fn hide(&mut self, pos: PiecePos) -> Result<()> {
        let pos = self.validate_pos(pos)?;
        self.pieces[pos.to_nd_index()].hide();
        Ok(())
    }

    pub fn revealed_count(&self) -> usize {
        self.pieces.iter().filter(|piece| piece.is_revealed()).count()
    }

    /// Pieces in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }
}
