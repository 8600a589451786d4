//! Per-piece lookup tables.

use crate::{PieceKind, Side};

/// A value for each (kind, side) pair.
///
/// Front ends use this to map pieces to whatever they draw with (texture
/// handles, glyphs, sprite indices) without the rules engine knowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTable<T> {
    entries: [[T; 6]; 2],
}

impl<T> PieceTable<T> {
    /// Builds a table by calling `f` once per (kind, side).
    pub fn from_fn(mut f: impl FnMut(PieceKind, Side) -> T) -> Self {
        PieceTable {
            entries: Side::BOTH.map(|side| PieceKind::ALL.map(|kind| f(kind, side))),
        }
    }

    /// Returns the entry for `kind` owned by `side`.
    #[inline]
    pub fn get(&self, kind: PieceKind, side: Side) -> &T {
        &self.entries[side.index()][kind.index()]
    }

    /// Replaces the entry for `kind` owned by `side`.
    pub fn set(&mut self, kind: PieceKind, side: Side, value: T) {
        self.entries[side.index()][kind.index()] = value;
    }
}

impl PieceTable<char> {
    /// Unicode chess glyphs.
    pub fn unicode() -> Self {
        PieceTable::from_fn(|kind, side| match (side, kind) {
            (Side::White, PieceKind::Pawn) => '♙',
            (Side::White, PieceKind::Knight) => '♘',
            (Side::White, PieceKind::Bishop) => '♗',
            (Side::White, PieceKind::Rook) => '♖',
            (Side::White, PieceKind::Queen) => '♕',
            (Side::White, PieceKind::King) => '♔',
            (Side::Black, PieceKind::Pawn) => '♟',
            (Side::Black, PieceKind::Knight) => '♞',
            (Side::Black, PieceKind::Bishop) => '♝',
            (Side::Black, PieceKind::Rook) => '♜',
            (Side::Black, PieceKind::Queen) => '♛',
            (Side::Black, PieceKind::King) => '♚',
        })
    }

    /// FEN letters (upper case for White).
    pub fn fen() -> Self {
        PieceTable::from_fn(|kind, side| kind.to_fen_char(side))
    }
}
