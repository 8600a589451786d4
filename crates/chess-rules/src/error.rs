//! Errors reported to the presentation layer.

use crate::rules::GameStatus;
use chess_core::{Move, Side, Square};
use thiserror::Error;

/// A rejected selection or execution.
///
/// Every variant is recoverable; the board is unchanged whenever one is
/// returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A click resolved to no square on the board.
    #[error("position is outside the board")]
    OutOfBounds,

    #[error("no piece on {0}")]
    EmptySquareSelected(Square),

    /// The piece on `square` belongs to the side not on move.
    #[error("piece on {square} belongs to {side}, who is not to move")]
    WrongSideToMove { square: Square, side: Side },

    /// The move is not in the legal set for its piece.
    #[error("illegal move {0}")]
    IllegalMove(Move),

    /// The board advanced after the selection was made.
    #[error("selection is stale, the board has changed since it was made")]
    StaleSelection,

    /// Text that does not parse as a move.
    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),

    #[error("game is over: {0}")]
    GameOver(GameStatus),
}
