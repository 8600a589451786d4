//! Rule set abstraction and game status.
//!
//! The [`Game`](crate::Game) state machine never decides chess questions
//! itself; it delegates move generation, move application and status
//! evaluation to a [`RuleSet`].

mod standard;

pub use standard::StandardRules;

use crate::{Board, MoveList};
use chess_core::{Move, Side, Square};
use std::fmt;

/// Status of a game, derived from the board after every executed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Play continues and the side to move is not in check.
    InProgress,
    /// The given side is to move and in check.
    Check(Side),
    /// The given side is checkmated and has lost.
    Checkmate(Side),
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// The current position has occurred often enough to end the game.
    DrawByRepetition,
    /// The halfmove clock reached its limit.
    DrawByFiftyMove,
    /// Neither side has the material to deliver mate.
    DrawByInsufficientMaterial,
}

impl GameStatus {
    /// Returns true if no further moves may be played.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress | GameStatus::Check(_))
    }

    /// The winning side, if the game ended in checkmate.
    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::Checkmate(loser) => Some(loser.opposite()),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Check(side) => write!(f, "{} is in check", side),
            GameStatus::Checkmate(side) => write!(f, "{} is checkmated", side),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawByRepetition => write!(f, "draw by repetition"),
            GameStatus::DrawByFiftyMove => write!(f, "draw by fifty-move rule"),
            GameStatus::DrawByInsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

/// Trait for the rules a game is played under.
///
/// # Example
///
/// ```
/// use chess_rules::rules::RuleSet;
/// use chess_rules::StandardRules;
///
/// let rules = StandardRules::default();
/// let board = rules.initial_board();
/// assert_eq!(rules.legal_moves(&board).len(), 20);
/// ```
pub trait RuleSet {
    /// Returns the board a new game starts from.
    fn initial_board(&self) -> Board;

    /// Generates all legal moves for the side to move.
    fn legal_moves(&self, board: &Board) -> MoveList;

    /// Generates the legal moves of the piece on `from`.
    fn legal_moves_from(&self, board: &Board, from: Square) -> MoveList;

    /// Returns true if a legal move with `m`'s from, to and promotion exists
    /// for the side to move.
    fn is_legal(&self, board: &Board, m: Move) -> bool;

    /// Makes a move on the board, returning the new board.
    ///
    /// # Panics
    ///
    /// May panic if the move is not legal. Use [`is_legal`](RuleSet::is_legal)
    /// to check first, or use [`try_make_move`](RuleSet::try_make_move).
    fn make_move(&self, board: &Board, m: Move) -> Board;

    /// Attempts to make a move, returning `None` if illegal.
    fn try_make_move(&self, board: &Board, m: Move) -> Option<Board> {
        if self.is_legal(board, m) {
            Some(self.make_move(board, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, board: &Board) -> bool;

    /// Evaluates the board's status.
    ///
    /// `repetitions` is how many times the current position has occurred in
    /// the game so far, including now.
    fn status(&self, board: &Board, repetitions: usize) -> GameStatus;

    /// Returns true if neither side has sufficient material to checkmate.
    fn is_insufficient_material(&self, board: &Board) -> bool;
}
