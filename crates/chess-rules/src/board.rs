//! Board state: the 8×8 grid plus the auxiliary fields of a position.

use std::fmt;

use chess_core::{Cell, FenError, FenParser, Piece, PieceKind, Side, Square};
use thiserror::Error;

use crate::zobrist::ZOBRIST;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses the letters of a FEN castling field ("" means none).
    pub fn from_fen_letters(letters: &str) -> Self {
        let flags = letters.chars().fold(0u8, |acc, c| {
            acc | match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            }
        });
        CastlingRights::new(flags)
    }

    /// Returns the FEN castling field, "-" when no right remains.
    pub fn to_fen_letters(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(flag, _)| self.0 & flag != 0)
        .map(|(_, c)| *c)
        .collect()
    }

    const fn kingside_flag(side: Side) -> u8 {
        match side {
            Side::White => Self::WHITE_KINGSIDE,
            Side::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_flag(side: Side) -> u8 {
        match side {
            Side::White => Self::WHITE_QUEENSIDE,
            Side::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn can_castle_kingside(self, side: Side) -> bool {
        (self.0 & Self::kingside_flag(side)) != 0
    }

    #[inline]
    pub const fn can_castle_queenside(self, side: Side) -> bool {
        (self.0 & Self::queenside_flag(side)) != 0
    }

    /// Returns true if `side` keeps either right.
    #[inline]
    pub const fn any(self, side: Side) -> bool {
        self.can_castle_kingside(side) || self.can_castle_queenside(side)
    }

    /// Removes both rights for a side.
    #[inline]
    pub fn remove_side(&mut self, side: Side) {
        self.0 &= !(Self::kingside_flag(side) | Self::queenside_flag(side));
    }

    #[inline]
    pub fn remove_kingside(&mut self, side: Side) {
        self.0 &= !Self::kingside_flag(side);
    }

    #[inline]
    pub fn remove_queenside(&mut self, side: Side) {
        self.0 &= !Self::queenside_flag(side);
    }

    /// Removes the right tied to a rook starting on `square`, if any.
    pub fn remove_for_rook_square(&mut self, square: Square) {
        match square {
            Square::H1 => self.remove_kingside(Side::White),
            Square::A1 => self.remove_queenside(Side::White),
            Square::H8 => self.remove_kingside(Side::Black),
            Square::A8 => self.remove_queenside(Side::Black),
            _ => {}
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Errors from building a board out of external input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("expected exactly one {side} king, found {count}")]
    KingCount { side: Side, count: usize },
}

/// Home-rank layout from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Complete board state.
///
/// The grid owns every piece; each square always holds one [`Cell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Cells indexed `[rank][file]`, rank 0 being White's home rank.
    cells: [[Cell; 8]; 8],

    /// The side to move.
    pub side_to_move: Side,

    /// Castling rights.
    pub castling: CastlingRights,

    /// Square a pawn may capture onto en passant, if any.
    pub en_passant: Option<Square>,

    /// Half-moves since the last pawn move or capture.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl Board {
    /// Creates a board with no pieces, White to move.
    pub fn empty() -> Self {
        Board {
            cells: [[Cell::Empty; 8]; 8],
            side_to_move: Side::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position with all 32 pieces.
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            let file = file as u8;
            for side in Side::BOTH {
                board.cells[side.back_rank() as usize][file as usize] =
                    Cell::Occupied(Piece::new(kind, side));
                board.cells[side.pawn_rank() as usize][file as usize] =
                    Cell::Occupied(Piece::new(PieceKind::Pawn, side));
            }
        }
        board.castling = CastlingRights::ALL;
        board
    }

    /// Creates a board from a FEN string.
    ///
    /// Move history is inferred: pawns on their start rank, and kings and
    /// rooks on home squares backed by a castling right, count as unmoved.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let parsed = FenParser::parse(fen)?;
        let mut board = Board::empty();

        board.side_to_move = parsed.side_to_move;
        board.castling = CastlingRights::from_fen_letters(&parsed.castling);
        board.en_passant = parsed.en_passant;
        board.halfmove_clock = parsed.halfmove_clock;
        board.fullmove_number = parsed.fullmove_number;

        for (square, kind, side) in parsed.placement {
            let unmoved = match kind {
                PieceKind::Pawn => square.rank() == side.pawn_rank(),
                PieceKind::King => {
                    square == Self::king_home(side) && board.castling.any(side)
                }
                PieceKind::Rook => {
                    let (kingside_rook, queenside_rook) = Self::rook_homes(side);
                    (square == kingside_rook && board.castling.can_castle_kingside(side))
                        || (square == queenside_rook && board.castling.can_castle_queenside(side))
                }
                _ => true,
            };
            let piece = Piece::new(kind, side);
            board.set(square, Cell::Occupied(if unmoved { piece } else { piece.moved() }));
        }

        for side in Side::BOTH {
            let count = board.count(PieceKind::King, side);
            if count != 1 {
                return Err(BoardError::KingCount { side, count });
            }
        }

        Ok(board)
    }

    /// Converts the board to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for cell in &self.cells[rank] {
                match cell {
                    Cell::Occupied(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    Cell::Empty => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let en_passant = self
            .en_passant
            .map(Square::to_algebraic)
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            fen,
            self.side_to_move.fen_char(),
            self.castling.to_fen_letters(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// The king's starting square for `side`.
    #[inline]
    pub const fn king_home(side: Side) -> Square {
        match side {
            Side::White => Square::E1,
            Side::Black => Square::E8,
        }
    }

    /// The (kingside, queenside) rook starting squares for `side`.
    #[inline]
    pub const fn rook_homes(side: Side) -> (Square, Square) {
        match side {
            Side::White => (Square::H1, Square::A1),
            Side::Black => (Square::H8, Square::A8),
        }
    }

    /// Returns the cell at `square`.
    #[inline]
    pub fn cell(&self, square: Square) -> Cell {
        self.cells[square.rank() as usize][square.file() as usize]
    }

    /// Returns the piece at `square`, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cell(square).piece()
    }

    /// Overwrites the cell at `square`.
    #[inline]
    pub fn set(&mut self, square: Square, cell: Cell) {
        self.cells[square.rank() as usize][square.file() as usize] = cell;
    }

    /// Empties `square`, returning what stood there.
    #[inline]
    pub fn take(&mut self, square: Square) -> Cell {
        let cell = self.cell(square);
        self.set(square, Cell::Empty);
        cell
    }

    /// Iterates over the occupied squares of `side`.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.cell(sq) {
            Cell::Occupied(piece) if piece.side == side => Some((sq, piece)),
            _ => None,
        })
    }

    /// Counts pieces of `kind` owned by `side`.
    pub fn count(&self, kind: PieceKind, side: Side) -> usize {
        self.pieces(side).filter(|(_, p)| p.kind == kind).count()
    }

    /// Returns the square of `side`'s king, if one is on the board.
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces(side)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Computes the Zobrist hash of this position.
    ///
    /// Only placement, side to move, castling rights, and a capturable
    /// en-passant file contribute; clocks and `has_moved` do not.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = 0u64;
        for side in Side::BOTH {
            for (square, piece) in self.pieces(side) {
                hash ^= ZOBRIST.piece_key(piece.kind, side, square);
            }
        }
        if self.side_to_move == Side::Black {
            hash ^= ZOBRIST.black_to_move;
        }
        for bit in 0..4 {
            if self.castling.raw() & (1 << bit) != 0 {
                hash ^= ZOBRIST.castling_key(bit);
            }
        }
        if let Some(ep) = self.capturable_en_passant() {
            hash ^= ZOBRIST.en_passant_key(ep.file() as usize);
        }
        hash
    }

    /// The en-passant target, if a pawn of the side to move stands beside
    /// the pawn that just double-stepped.
    pub fn capturable_en_passant(&self) -> Option<Square> {
        let ep = self.en_passant?;
        let mover = self.side_to_move;
        let victim = ep.offset(0, -mover.pawn_direction())?;
        [-1, 1]
            .into_iter()
            .filter_map(|df| victim.offset(df, 0))
            .any(|sq| self.cell(sq).holds(PieceKind::Pawn, mover))
            .then_some(ep)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for cell in &self.cells[rank] {
                let c = cell.piece().map_or('.', Piece::to_fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
