//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// A move, as a value.
///
/// A `Move` only means something relative to the board it was generated
/// from; it holds no reference into that board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Kind a pawn turns into on the far rank.
    pub promotion: Option<PieceKind>,
    /// King move of two files that also relocates the rook.
    pub is_castle: bool,
    /// Diagonal pawn move onto the en-passant target.
    pub is_en_passant: bool,
}

impl Move {
    /// Creates a plain move.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            is_castle: false,
            is_en_passant: false,
        }
    }

    /// Creates a promoting pawn move.
    #[inline]
    pub const fn promoting(from: Square, to: Square, kind: PieceKind) -> Self {
        Move {
            promotion: Some(kind),
            ..Move::new(from, to)
        }
    }

    /// Creates a castling move, given by the king's from and to squares.
    #[inline]
    pub const fn castle(from: Square, to: Square) -> Self {
        Move {
            is_castle: true,
            ..Move::new(from, to)
        }
    }

    /// Creates an en-passant capture.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move {
            is_en_passant: true,
            ..Move::new(from, to)
        }
    }

    /// Returns true if `other` names the same from, to, and promotion.
    ///
    /// Castle and en-passant flags are derived from the board, so they are
    /// not part of a move's identity when matching caller input.
    #[inline]
    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion {
            Some(PieceKind::Knight) => "n",
            Some(PieceKind::Bishop) => "b",
            Some(PieceKind::Rook) => "r",
            Some(PieceKind::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from, self.to, promo)
    }

    /// Parses a move from UCI notation.
    ///
    /// Only squares and promotion are recovered; castle and en-passant
    /// flags come from matching against the legal set.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        match s[4..].chars().next() {
            None => Some(Move::new(from, to)),
            Some(c) => {
                let kind = match c.to_ascii_lowercase() {
                    'n' => PieceKind::Knight,
                    'b' => PieceKind::Bishop,
                    'r' => PieceKind::Rook,
                    'q' => PieceKind::Queen,
                    _ => return None,
                };
                Some(Move::promoting(from, to, kind))
            }
        }
    }

    /// A placeholder move (a1a1), never legal.
    pub const NULL: Move = Move::new(Square::A1, Square::A1);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())?;
        if self.is_castle {
            write!(f, "[castle]")?;
        }
        if self.is_en_passant {
            write!(f, "[ep]")?;
        }
        Ok(())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
