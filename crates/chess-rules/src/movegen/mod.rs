//! Pseudo-legal move generation and move application.
//!
//! Generation follows each kind's geometry and blocking rules but does not
//! ask whether the mover's king is left in check; that is the job of
//! [`crate::legality`].

mod attacks;
pub mod perft;

use crate::Board;
use chess_core::{Cell, Move, Piece, PieceKind, Side, Square};

pub use attacks::{attackers, attacks, is_square_attacked};
pub(crate) use attacks::{ray_directions, slide, KING_OFFSETS, KNIGHT_OFFSETS};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves held.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }

    /// Finds the move with the same from, to, and promotion as `m`.
    pub fn find_matching(&self, m: &Move) -> Option<Move> {
        self.as_slice().iter().copied().find(|lm| lm.same_squares(m))
    }

    /// Distinct destination squares, in generation order.
    ///
    /// The four promotions onto one square count once.
    pub fn destinations(&self) -> Vec<Square> {
        let mut squares: Vec<Square> = Vec::with_capacity(self.len);
        for m in self {
            if !squares.contains(&m.to) {
                squares.push(m.to);
            }
        }
        squares
    }

    /// Returns true if some move lands on `to`.
    pub fn targets(&self, to: Square) -> bool {
        self.as_slice().iter().any(|m| m.to == to)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates the pseudo-legal moves of the piece on `from`.
///
/// Castling candidates are included when the rights, the unmoved king and
/// rook, and an empty path allow it; whether the king crosses an attacked
/// square is left to the legality filter. An empty square yields no moves.
pub fn pseudo_legal_moves(board: &Board, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    if let Cell::Occupied(piece) = board.cell(from) {
        generate_piece_moves(board, from, piece, &mut moves);
    }
    moves
}

/// Generates the pseudo-legal moves of every piece owned by `side`.
pub fn pseudo_legal_moves_for_side(board: &Board, side: Side) -> MoveList {
    let mut moves = MoveList::new();
    for (from, piece) in board.pieces(side) {
        generate_piece_moves(board, from, piece, &mut moves);
    }
    moves
}

fn generate_piece_moves(board: &Board, from: Square, piece: Piece, moves: &mut MoveList) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece.side, moves),
        PieceKind::Knight => generate_step_moves(board, from, piece.side, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            generate_slider_moves(board, from, piece, moves)
        }
        PieceKind::King => {
            generate_step_moves(board, from, piece.side, &KING_OFFSETS, moves);
            generate_castling_moves(board, from, piece, moves);
        }
    }
}

/// Returns true if a piece of `side` may end its move on `cell`.
///
/// Kings are never captured: a king capture is only reachable from a
/// position where the previous mover left its own king in check.
#[inline]
fn can_land_on(cell: Cell, side: Side) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Occupied(p) => p.side != side && p.kind != PieceKind::King,
    }
}

/// Pushes a pawn move, expanding it into every promotion on the far rank.
fn push_pawn_move(from: Square, to: Square, side: Side, moves: &mut MoveList) {
    if to.rank() == side.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::promoting(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

fn generate_pawn_moves(board: &Board, from: Square, side: Side, moves: &mut MoveList) {
    let dir = side.pawn_direction();

    // Pushes
    if let Some(one) = from.offset(0, dir) {
        if board.cell(one).is_empty() {
            push_pawn_move(from, one, side, moves);
            if from.rank() == side.pawn_rank() {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if board.cell(two).is_empty() {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    // Captures, including en passant
    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match board.cell(to) {
            Cell::Occupied(target) if target.side != side && target.kind != PieceKind::King => {
                push_pawn_move(from, to, side, moves);
            }
            Cell::Empty if board.en_passant == Some(to) && board.side_to_move == side => {
                let victim = Square::new(to.file(), from.rank());
                let has_victim = victim
                    .map(|v| board.cell(v).holds(PieceKind::Pawn, side.opposite()))
                    .unwrap_or(false);
                if has_victim {
                    moves.push(Move::en_passant(from, to));
                }
            }
            _ => {}
        }
    }
}

fn generate_step_moves(
    board: &Board,
    from: Square,
    side: Side,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            if can_land_on(board.cell(to), side) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn generate_slider_moves(board: &Board, from: Square, piece: Piece, moves: &mut MoveList) {
    slide(board, from, ray_directions(piece.kind), |to, cell| {
        if can_land_on(cell, piece.side) {
            moves.push(Move::new(from, to));
        }
    });
}

/// Generates castling candidates for an unmoved king on its home square.
fn generate_castling_moves(board: &Board, from: Square, king: Piece, moves: &mut MoveList) {
    let side = king.side;
    if king.has_moved || from != Board::king_home(side) {
        return;
    }
    let rank = side.back_rank();
    let (kingside_rook, queenside_rook) = Board::rook_homes(side);

    if board.castling.can_castle_kingside(side)
        && rook_ready(board, kingside_rook, side)
        && files_empty(board, rank, &[5, 6])
    {
        if let Some(to) = Square::new(6, rank) {
            moves.push(Move::castle(from, to));
        }
    }

    if board.castling.can_castle_queenside(side)
        && rook_ready(board, queenside_rook, side)
        && files_empty(board, rank, &[1, 2, 3])
    {
        if let Some(to) = Square::new(2, rank) {
            moves.push(Move::castle(from, to));
        }
    }
}

fn rook_ready(board: &Board, square: Square, side: Side) -> bool {
    matches!(
        board.cell(square),
        Cell::Occupied(p) if p.kind == PieceKind::Rook && p.side == side && !p.has_moved
    )
}

fn files_empty(board: &Board, rank: u8, files: &[u8]) -> bool {
    files.iter().all(|&file| {
        Square::new(file, rank)
            .map(|sq| board.cell(sq).is_empty())
            .unwrap_or(false)
    })
}

/// Returns the rook's (from, to) squares for a castling king move.
pub fn castling_rook_squares(m: &Move) -> (Square, Square) {
    let rank = m.from.rank();
    let (rook_file, rook_target) = if m.to.file() > m.from.file() {
        (7, 5)
    } else {
        (0, 3)
    };
    // both files and the rank are in 0..8
    match (Square::new(rook_file, rank), Square::new(rook_target, rank)) {
        (Some(from), Some(to)) => (from, to),
        _ => unreachable!("castling squares are on the board"),
    }
}

/// Applies `m` to a copy of `board` and returns the resulting board.
///
/// The move is assumed to come from this board's generated moves; the
/// copy is updated for captures, en passant, castling, promotion, rights,
/// clocks and side to move.
///
/// # Panics
///
/// Panics if `m.from` is empty.
pub fn make_move(board: &Board, m: Move) -> Board {
    let mut next = board.clone();
    let piece = match next.take(m.from) {
        Cell::Occupied(piece) => piece,
        Cell::Empty => panic!("make_move: no piece on {}", m.from),
    };
    let side = piece.side;

    let mut is_capture = !next.take(m.to).is_empty();

    if m.is_en_passant {
        if let Some(victim) = Square::new(m.to.file(), m.from.rank()) {
            is_capture |= !next.take(victim).is_empty();
        }
    }

    let landed = match m.promotion {
        Some(kind) => Piece::new(kind, side).moved(),
        None => piece.moved(),
    };
    next.set(m.to, Cell::Occupied(landed));

    if m.is_castle {
        let (rook_from, rook_to) = castling_rook_squares(&m);
        if let Cell::Occupied(rook) = next.take(rook_from) {
            next.set(rook_to, Cell::Occupied(rook.moved()));
        }
    }

    // A king move forfeits both rights; leaving or landing on a rook's
    // home square forfeits that rook's right.
    if piece.kind == PieceKind::King {
        next.castling.remove_side(side);
    }
    next.castling.remove_for_rook_square(m.from);
    next.castling.remove_for_rook_square(m.to);

    let rank_delta = m.to.rank() as i8 - m.from.rank() as i8;
    next.en_passant = if piece.kind == PieceKind::Pawn && rank_delta.abs() == 2 {
        Square::new(m.from.file(), (m.from.rank() + m.to.rank()) / 2)
    } else {
        None
    };

    if piece.kind == PieceKind::Pawn || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }

    if side == Side::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = side.opposite();

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn destinations(board: &Board, from: &str) -> Vec<String> {
        let mut squares: Vec<String> = pseudo_legal_moves(board, sq(from))
            .destinations()
            .into_iter()
            .map(Square::to_algebraic)
            .collect();
        squares.sort();
        squares
    }

    #[test]
    fn movelist_push_and_index() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let m1 = Move::new(sq("e2"), sq("e4"));
        let m2 = Move::new(sq("d2"), sq("d4"));
        list.push(m1);
        list.push(m2);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list[1], m2);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn movelist_retain_and_find() {
        let mut list = MoveList::default();
        list.push(Move::new(sq("e2"), sq("e3")));
        list.push(Move::new(sq("e2"), sq("e4")));
        list.push(Move::castle(Square::E1, Square::G1));

        assert_eq!(
            list.find_matching(&Move::new(Square::E1, Square::G1)),
            Some(Move::castle(Square::E1, Square::G1))
        );
        assert!(list.targets(sq("e4")));

        list.retain(|m| m.from == sq("e2"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.find_matching(&Move::new(Square::E1, Square::G1)), None);
    }

    #[test]
    fn startpos_pawn_and_knight_moves() {
        let board = Board::startpos();
        assert_eq!(destinations(&board, "e2"), vec!["e3", "e4"]);
        assert_eq!(destinations(&board, "g1"), vec!["f3", "h3"]);
        assert!(destinations(&board, "a1").is_empty());
        assert!(destinations(&board, "d1").is_empty());
        assert_eq!(pseudo_legal_moves_for_side(&board, Side::White).len(), 20);
        assert_eq!(pseudo_legal_moves_for_side(&board, Side::Black).len(), 20);
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(pseudo_legal_moves(&Board::startpos(), sq("e4")).is_empty());
    }

    #[test]
    fn rook_ray_stops_before_friendly_piece() {
        let board = Board::from_fen("4k3/8/8/8/P7/8/8/R3K3 w - - 0 1").unwrap();
        let forward: Vec<String> = destinations(&board, "a1")
            .into_iter()
            .filter(|s| s.starts_with('a'))
            .collect();
        assert_eq!(forward, vec!["a2", "a3"]);
    }

    #[test]
    fn slider_captures_first_enemy_only() {
        let board = Board::from_fen("4k3/8/8/3p4/8/1B6/8/4K3 w - - 0 1").unwrap();
        let moves = destinations(&board, "b3");
        assert!(moves.contains(&"d5".to_string()));
        assert!(!moves.contains(&"e6".to_string()));
        assert_eq!(moves, vec!["a2", "a4", "c2", "c4", "d1", "d5"]);
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let board = Board::from_fen("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(destinations(&board, "d4").len(), 27);
    }

    #[test]
    fn knight_skips_friendly_squares() {
        let board = Board::from_fen("4k3/8/8/8/8/8/2P5/N3K3 w - - 0 1").unwrap();
        assert_eq!(destinations(&board, "a1"), vec!["b3"]);
    }

    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let board = Board::from_fen("4k3/8/8/8/4p3/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(destinations(&board, "e2"), vec!["e3"]);
        let blocked = Board::from_fen("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1").unwrap();
        assert!(destinations(&blocked, "e2").is_empty());
    }

    #[test]
    fn pawn_captures_enemies_only() {
        let board = Board::from_fen("4k3/8/8/8/8/3p1N2/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(destinations(&board, "e2"), vec!["d3", "e3", "e4"]);
    }

    #[test]
    fn pieces_never_capture_a_king() {
        let board = Board::from_fen("k7/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let rook = destinations(&board, "a1");
        assert!(rook.contains(&"a7".to_string()));
        assert!(!rook.contains(&"a8".to_string()));
        let pawn = Board::from_fen("8/8/8/8/8/5k2/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(destinations(&pawn, "e2"), vec!["e3", "e4"]);
    }

    #[test]
    fn en_passant_only_for_side_to_move() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = pseudo_legal_moves(&board, sq("e5"));
        assert!(moves
            .as_slice()
            .contains(&Move::en_passant(sq("e5"), sq("d6"))));

        let mut black_to_move = board.clone();
        black_to_move.side_to_move = Side::Black;
        assert!(!pseudo_legal_moves(&black_to_move, sq("e5"))
            .as_slice()
            .iter()
            .any(|m| m.is_en_passant));
    }

    #[test]
    fn promotion_yields_every_kind() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = pseudo_legal_moves(&board, sq("a7"));
        let kinds: Vec<PieceKind> = moves.as_slice().iter().filter_map(|m| m.promotion).collect();
        assert_eq!(kinds, PieceKind::PROMOTIONS.to_vec());
        assert_eq!(moves.destinations(), vec![sq("a8")]);
    }

    #[test]
    fn castling_candidates_need_rights_unmoved_pieces_and_empty_path() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = pseudo_legal_moves(&board, Square::E1);
        assert!(moves.as_slice().contains(&Move::castle(Square::E1, Square::G1)));
        assert!(moves.as_slice().contains(&Move::castle(Square::E1, Square::C1)));

        let no_rights = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert!(!pseudo_legal_moves(&no_rights, Square::E1)
            .as_slice()
            .iter()
            .any(|m| m.is_castle));

        let blocked = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        assert!(!pseudo_legal_moves(&blocked, Square::E1)
            .as_slice()
            .iter()
            .any(|m| m.is_castle));
    }

    #[test]
    fn make_move_double_push_sets_en_passant() {
        let board = Board::startpos();
        let next = make_move(&board, Move::new(sq("e2"), sq("e4")));
        assert_eq!(next.side_to_move, Side::Black);
        assert!(next.piece_at(sq("e4")).unwrap().has_moved);
        assert_eq!(next.piece_at(sq("e2")), None);
        assert_eq!(next.en_passant, Some(sq("e3")));
        assert_eq!(next.halfmove_clock, 0);
        assert_eq!(next.fullmove_number, 1);
    }

    #[test]
    fn make_move_counts_clocks() {
        let board = Board::startpos();
        let after_white = make_move(&board, Move::new(sq("g1"), sq("f3")));
        assert_eq!(after_white.halfmove_clock, 1);
        assert_eq!(after_white.fullmove_number, 1);
        assert_eq!(after_white.en_passant, None);
        let after_black = make_move(&after_white, Move::new(sq("g8"), sq("f6")));
        assert_eq!(after_black.halfmove_clock, 2);
        assert_eq!(after_black.fullmove_number, 2);
        assert_eq!(after_black.side_to_move, Side::White);
    }

    #[test]
    fn make_move_castles_rook_and_drops_rights() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 1").unwrap();
        let next = make_move(&board, Move::castle(Square::E1, Square::G1));
        assert!(next.cell(Square::G1).holds(PieceKind::King, Side::White));
        assert!(next.cell(Square::F1).holds(PieceKind::Rook, Side::White));
        assert!(next.cell(Square::H1).is_empty());
        assert!(next.cell(Square::E1).is_empty());
        assert!(!next.castling.any(Side::White));
        assert!(next.castling.any(Side::Black));
        assert_eq!(next.halfmove_clock, 4);

        let queenside = make_move(&board, Move::castle(Square::E1, Square::C1));
        assert!(queenside.cell(Square::C1).holds(PieceKind::King, Side::White));
        assert!(queenside.cell(Square::D1).holds(PieceKind::Rook, Side::White));
        assert!(queenside.cell(Square::A1).is_empty());
    }

    #[test]
    fn capturing_a_home_rook_drops_opponent_right() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let next = make_move(&board, Move::new(Square::A1, Square::A8));
        assert!(!next.castling.can_castle_queenside(Side::White));
        assert!(!next.castling.can_castle_queenside(Side::Black));
        assert!(next.castling.can_castle_kingside(Side::Black));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn make_move_en_passant_removes_victim() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let next = make_move(&board, Move::en_passant(sq("e5"), sq("d6")));
        assert!(next.cell(sq("d5")).is_empty());
        assert!(next.cell(sq("d6")).holds(PieceKind::Pawn, Side::White));
        assert_eq!(next.en_passant, None);
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn make_move_promotes() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 5 1").unwrap();
        let next = make_move(&board, Move::promoting(sq("a7"), sq("a8"), PieceKind::Knight));
        assert!(next.cell(Square::A8).holds(PieceKind::Knight, Side::White));
        assert!(next.cell(sq("a7")).is_empty());
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn castling_rook_squares_by_wing() {
        assert_eq!(
            castling_rook_squares(&Move::castle(Square::E8, Square::G8)),
            (Square::H8, Square::F8)
        );
        assert_eq!(
            castling_rook_squares(&Move::castle(Square::E1, Square::C1)),
            (Square::A1, Square::D1)
        );
    }
}
