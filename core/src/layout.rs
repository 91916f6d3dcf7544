use serde::{Deserialize, Serialize};

use crate::*;

pub const GAME_SCALE: f64 = 0.9;
pub const CANVAS_WIDTH: f64 = 800.0 * GAME_SCALE;
pub const CANVAS_HEIGHT: f64 = 600.0 * GAME_SCALE;

/// Gap between two neighbouring pieces.
pub const PIECE_PADDING: f64 = 10.0 * GAME_SCALE;
const TOP_PADDING: f64 = 70.0 * GAME_SCALE;
const BOTTOM_PADDING: f64 = 20.0 * GAME_SCALE;
const SIDE_PADDING: f64 = 30.0 * GAME_SCALE;

/// Height reserved for the header labels, not scaled.
pub const HEADER_HEIGHT: f64 = 50.0;

/// Edge length of the piece images, pieces are scaled relative to it.
pub const REFERENCE_PIECE_SIZE: f64 = 160.0;

/// Factor that shows the whole canvas inside a `width` x `height` viewport, keeping its aspect ratio.
///
/// Degenerate viewports keep the canvas at its natural size.
pub fn fit_scale(width: f64, height: f64) -> f64 {
    let scale = (width / CANVAS_WIDTH).min(height / CANVAS_HEIGHT);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Pixel geometry of a board, every piece has the same size and the grid is centered on the canvas below the header.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    size: BoardSize,
    piece_size: f64,
    piece_scale: f64,
    origin_x: f64,
    origin_y: f64,
}

impl BoardLayout {
    pub fn new(rows: Coord, cols: Coord) -> Result<Self> {
        let invalid = GameError::InvalidBoardShape {
            rows: rows.into(),
            cols: cols.into(),
        };
        if rows == 0 || cols == 0 {
            return Err(invalid);
        }

        let num_rows = f64::from(rows);
        let num_cols = f64::from(cols);

        let max_row_size = (CANVAS_HEIGHT
            - TOP_PADDING
            - BOTTOM_PADDING
            - (num_rows - 1.0) * PIECE_PADDING)
            / num_rows;
        let max_col_size =
            (CANVAS_WIDTH - SIDE_PADDING * 3.0 - (num_cols - 1.0) * PIECE_PADDING) / num_cols;

        // the smaller of the two guarantees the grid fits both ways
        let piece_size = max_row_size.min(max_col_size);
        if !(piece_size.is_finite() && piece_size > 0.0) {
            log::warn!("{}x{} board leaves no room for pieces", rows, cols);
            return Err(invalid);
        }

        let stride = piece_size + PIECE_PADDING;
        let origin_x = (CANVAS_WIDTH - stride * num_cols) / 2.0;
        let origin_y = HEADER_HEIGHT + (CANVAS_HEIGHT - HEADER_HEIGHT - stride * num_rows) / 2.0;

        Ok(Self {
            size: (rows, cols),
            piece_size,
            piece_scale: piece_size / REFERENCE_PIECE_SIZE,
            origin_x,
            origin_y,
        })
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn piece_size(&self) -> f64 {
        self.piece_size
    }

    pub fn piece_scale(&self) -> f64 {
        self.piece_scale
    }

    /// Top-left corner of the piece at `pos`.
    pub fn piece_origin(&self, pos: PiecePos) -> (f64, f64) {
        let stride = self.piece_size + PIECE_PADDING;
        (
            stride * f64::from(pos.column) + self.origin_x,
            stride * f64::from(pos.row) + self.origin_y,
        )
    }
}
