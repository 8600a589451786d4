//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a given depth,
//! which can be compared against published values to validate generation,
//! the legality filter and move application together.

use super::make_move;
use crate::legality::legal_moves;
use crate::Board;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        let next = make_move(board, *m);
        nodes += perft(&next, depth - 1);
    }
    nodes
}

/// Perft with divide - node count below each root move, sorted by UCI.
/// Useful for finding which move has an incorrect count.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    let moves = legal_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let next = make_move(board, *m);
        let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
