//! Piece geometry and attack detection.

use crate::Board;
use chess_core::{Cell, Piece, PieceKind, Side, Square};

/// Knight jumps as (file, rank) offsets.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King steps as (file, rank) offsets.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub(crate) const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Ray directions for a sliding kind; empty for non-sliders.
pub(crate) fn ray_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    const QUEEN: [(i8, i8); 8] = [
        (0, 1),
        (1, 0),
        (0, -1),
        (-1, 0),
        (1, 1),
        (1, -1),
        (-1, -1),
        (-1, 1),
    ];
    match kind {
        PieceKind::Bishop => &DIAGONAL,
        PieceKind::Rook => &ORTHOGONAL,
        PieceKind::Queen => &QUEEN,
        _ => &[],
    }
}

/// Walks each ray from `from`, calling `visit` for every square reached.
///
/// A ray ends at the first occupied square, which is still visited so
/// the caller can decide whether it is a capture.
pub(crate) fn slide(
    board: &Board,
    from: Square,
    directions: &[(i8, i8)],
    mut visit: impl FnMut(Square, Cell),
) {
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            let cell = board.cell(next);
            visit(next, cell);
            if !cell.is_empty() {
                break;
            }
            current = next;
        }
    }
}

/// Returns true if `piece` standing on `from` attacks `target`.
///
/// Pawns attack diagonally forward whether or not the target is occupied;
/// sliders are blocked by any piece between `from` and `target`.
pub fn attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    if from == target {
        return false;
    }
    let df = target.file() as i8 - from.file() as i8;
    let dr = target.rank() as i8 - from.rank() as i8;

    match piece.kind {
        PieceKind::Pawn => dr == piece.side.pawn_direction() && df.abs() == 1,
        PieceKind::Knight => KNIGHT_OFFSETS.contains(&(df, dr)),
        PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let orthogonal = df == 0 || dr == 0;
            let diagonal = df.abs() == dr.abs();
            let aligned = match piece.kind {
                PieceKind::Bishop => diagonal,
                PieceKind::Rook => orthogonal,
                _ => orthogonal || diagonal,
            };
            aligned && ray_is_clear(board, from, target, (df.signum(), dr.signum()))
        }
    }
}

/// Returns true if every square strictly between `from` and `target` along
/// `step` is empty.
fn ray_is_clear(board: &Board, from: Square, target: Square, step: (i8, i8)) -> bool {
    let mut current = from;
    while let Some(next) = current.offset(step.0, step.1) {
        if next == target {
            return true;
        }
        if !board.cell(next).is_empty() {
            return false;
        }
        current = next;
    }
    false
}

/// Returns true if any piece of `by` attacks `square`.
pub fn is_square_attacked(board: &Board, square: Square, by: Side) -> bool {
    board
        .pieces(by)
        .any(|(from, piece)| attacks(board, from, piece, square))
}

/// Squares holding pieces of `by` that attack `square`.
pub fn attackers(board: &Board, square: Square, by: Side) -> Vec<Square> {
    board
        .pieces(by)
        .filter(|&(from, piece)| attacks(board, from, piece, square))
        .map(|(from, _)| from)
        .collect()
}
