//! Legality filtering of pseudo-legal moves.
//!
//! A move is legal when, after it is played on a copy of the board, the
//! mover's king is not attacked. Castling additionally requires that the
//! king is not in check before moving and does not pass through an
//! attacked square.

use crate::movegen::{
    is_square_attacked, make_move, pseudo_legal_moves, pseudo_legal_moves_for_side, MoveList,
};
use crate::Board;
use chess_core::{Move, Side, Square};

/// Returns true if `side`'s king is attacked.
///
/// # Panics
///
/// Panics if `side` has no king; boards built through [`Board::from_fen`]
/// and [`Board::startpos`] always have one.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    let king = board
        .king_square(side)
        .unwrap_or_else(|| panic!("invariant violated: no {} king on the board", side));
    is_square_attacked(board, king, side.opposite())
}

/// Returns true if the pseudo-legal move `m` by `side` keeps its king safe.
pub fn is_legal(board: &Board, m: &Move, side: Side) -> bool {
    if m.is_castle && !castling_path_is_safe(board, m, side) {
        return false;
    }
    let next = make_move(board, *m);
    !is_in_check(&next, side)
}

/// The king may not castle out of check or across an attacked square.
fn castling_path_is_safe(board: &Board, m: &Move, side: Side) -> bool {
    let attacker = side.opposite();
    if is_square_attacked(board, m.from, attacker) {
        return false;
    }
    let step = if m.to.file() > m.from.file() { 1 } else { -1 };
    match m.from.offset(step, 0) {
        Some(transit) => !is_square_attacked(board, transit, attacker),
        None => false,
    }
}

/// Removes the moves that would leave `side`'s king attacked.
pub fn filter_legal(board: &Board, moves: &MoveList, side: Side) -> MoveList {
    let mut legal = moves.clone();
    legal.retain(|m| is_legal(board, m, side));
    legal
}

/// Legal moves of the piece on `from`, for whichever side owns it.
///
/// An empty square yields an empty list.
pub fn legal_moves_from(board: &Board, from: Square) -> MoveList {
    match board.piece_at(from) {
        Some(piece) => filter_legal(board, &pseudo_legal_moves(board, from), piece.side),
        None => MoveList::new(),
    }
}

/// All legal moves for the side to move.
pub fn legal_moves(board: &Board) -> MoveList {
    let side = board.side_to_move;
    filter_legal(board, &pseudo_legal_moves_for_side(board, side), side)
}

/// Returns true if `side` has at least one legal move.
pub fn has_legal_move(board: &Board, side: Side) -> bool {
    pseudo_legal_moves_for_side(board, side)
        .as_slice()
        .iter()
        .any(|m| is_legal(board, m, side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::PieceKind;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_is_not_check() {
        let board = Board::startpos();
        assert!(!is_in_check(&board, Side::White));
        assert!(!is_in_check(&board, Side::Black));
        assert_eq!(legal_moves(&board).len(), 20);
    }

    #[test]
    #[should_panic(expected = "no White king")]
    fn missing_king_panics() {
        let mut board = Board::startpos();
        board.take(Square::E1);
        is_in_check(&board, Side::White);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // the e2 knight is pinned by the rook on e8
        let board = Board::from_fen("k3r3/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves_from(&board, sq("e2")).is_empty());
        assert!(!pseudo_legal_moves(&board, sq("e2")).is_empty());
    }

    #[test]
    fn check_must_be_answered() {
        let board = Board::from_fen("4k3/8/8/8/8/8/3P4/r3K3 w - - 0 1").unwrap();
        assert!(is_in_check(&board, Side::White));
        let moves = legal_moves(&board);
        // only king moves off the first rank, d2 is blocked by the pawn
        let mut targets: Vec<String> = moves.as_slice().iter().map(|m| m.to.to_algebraic()).collect();
        targets.sort();
        assert_eq!(targets, vec!["e2", "f2"]);
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let board = Board::from_fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        let mut targets = legal_moves_from(&board, Square::E1).destinations();
        targets.sort();
        assert_eq!(targets, vec![Square::D1, Square::F1]);
    }

    #[test]
    fn castling_through_attacked_square_is_illegal() {
        // the rook on f8 covers f1
        let board = Board::from_fen("k4r2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = Move::castle(Square::E1, Square::G1);
        assert!(pseudo_legal_moves(&board, Square::E1).as_slice().contains(&castle));
        assert!(!is_legal(&board, &castle, Side::White));
    }

    #[test]
    fn castling_into_attacked_square_is_illegal() {
        let board = Board::from_fen("k5r1/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(!is_legal(&board, &Move::castle(Square::E1, Square::G1), Side::White));
    }

    #[test]
    fn castling_out_of_check_is_illegal() {
        let board = Board::from_fen("k3r3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!legal_moves_from(&board, Square::E1)
            .as_slice()
            .iter()
            .any(|m| m.is_castle));
    }

    #[test]
    fn queenside_castling_ignores_attacks_on_b_file() {
        // b1 may be attacked; only the king's path d1, c1 matters
        let board = Board::from_fen("kr6/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(is_legal(&board, &Move::castle(Square::E1, Square::C1), Side::White));
    }

    #[test]
    fn en_passant_exposing_king_is_illegal() {
        let board = Board::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        let ep = Move::en_passant(sq("e5"), sq("d6"));
        assert!(pseudo_legal_moves(&board, sq("e5")).as_slice().contains(&ep));
        assert!(!is_legal(&board, &ep, Side::White));
    }

    #[test]
    fn stalemate_has_no_legal_move() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!is_in_check(&board, Side::Black));
        assert!(!has_legal_move(&board, Side::Black));
        assert!(legal_moves(&board).is_empty());
    }

    #[test]
    fn promotion_capture_out_of_check() {
        let board = Board::from_fen("1r2k3/P7/8/8/8/8/8/1K6 w - - 0 1").unwrap();
        assert!(is_in_check(&board, Side::White));
        let captures: Vec<Move> = legal_moves_from(&board, sq("a7"))
            .as_slice()
            .iter()
            .copied()
            .filter(|m| m.to == Square::B8)
            .collect();
        assert_eq!(captures.len(), 4);
        assert!(captures.iter().any(|m| m.promotion == Some(PieceKind::Queen)));
    }
}
