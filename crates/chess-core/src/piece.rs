//! Piece and board-cell representation.

use crate::Side;

/// The six kinds of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the index of this kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the FEN character for this kind owned by `side`.
    pub const fn to_fen_char(self, side: Side) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// Parses a FEN character into a kind and owner.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, side))
    }

    /// Returns true for kinds that move along rays (bishop, rook, queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Returns true if a pawn may promote to this kind.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece standing on the board.
///
/// `has_moved` gates the pawn double step and castling eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub has_moved: bool,
}

impl Piece {
    /// A piece that has not moved yet.
    #[inline]
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Piece {
            kind,
            side,
            has_moved: false,
        }
    }

    /// The same piece, marked as having moved.
    #[inline]
    pub const fn moved(self) -> Self {
        Piece {
            has_moved: true,
            ..self
        }
    }

    #[inline]
    pub const fn to_fen_char(self) -> char {
        self.kind.to_fen_char(self.side)
    }
}

/// The content of one board square. Every square holds exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Cell {
    /// Returns the piece on this cell, if any.
    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(p) => Some(p),
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns true if the cell holds a piece owned by `side`.
    #[inline]
    pub fn is_owned_by(self, side: Side) -> bool {
        matches!(self, Cell::Occupied(p) if p.side == side)
    }

    /// Returns true if the cell holds `kind` owned by `side`.
    #[inline]
    pub fn holds(self, kind: PieceKind, side: Side) -> bool {
        matches!(self, Cell::Occupied(p) if p.kind == kind && p.side == side)
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        Cell::Occupied(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_fen() {
        assert_eq!(PieceKind::Pawn.to_fen_char(Side::White), 'P');
        assert_eq!(PieceKind::Pawn.to_fen_char(Side::Black), 'p');
        assert_eq!(PieceKind::King.to_fen_char(Side::White), 'K');
        assert_eq!(PieceKind::Knight.to_fen_char(Side::Black), 'n');
    }

    #[test]
    fn kind_from_fen() {
        assert_eq!(
            PieceKind::from_fen_char('P'),
            Some((PieceKind::Pawn, Side::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('q'),
            Some((PieceKind::Queen, Side::Black))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn sliders_and_promotions() {
        assert!(!PieceKind::Pawn.is_slider());
        assert!(!PieceKind::Knight.is_slider());
        assert!(PieceKind::Bishop.is_slider());
        assert!(PieceKind::Rook.is_slider());
        assert!(PieceKind::Queen.is_slider());
        assert!(!PieceKind::King.is_slider());

        assert!(PieceKind::PROMOTIONS
            .iter()
            .all(|k| k.is_promotion_target()));
        assert!(!PieceKind::King.is_promotion_target());
        assert!(!PieceKind::Pawn.is_promotion_target());
    }

    #[test]
    fn cell_queries() {
        let rook = Piece::new(PieceKind::Rook, Side::Black);
        let cell = Cell::from(rook);
        assert_eq!(cell.piece(), Some(rook));
        assert!(cell.is_owned_by(Side::Black));
        assert!(!cell.is_owned_by(Side::White));
        assert!(cell.holds(PieceKind::Rook, Side::Black));
        assert!(Cell::default().is_empty());
        assert_eq!(Cell::Empty.piece(), None);
    }

    #[test]
    fn moved_marks_piece() {
        let pawn = Piece::new(PieceKind::Pawn, Side::White);
        assert!(!pawn.has_moved);
        let moved = pawn.moved();
        assert!(moved.has_moved);
        assert_eq!(moved.kind, PieceKind::Pawn);
    }
}
