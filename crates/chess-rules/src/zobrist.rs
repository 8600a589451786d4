//! Zobrist keys for identifying repeated positions.
//!
//! A position hash XORs one random key per (kind, side, square) occupant,
//! plus keys for Black to move, each castling right, and the en-passant
//! file. Two boards with the same hash are treated as the same position
//! for repetition counting.

use chess_core::{PieceKind, Side, Square};

/// Zobrist hash keys.
///
/// Generated from a fixed seed so hashes are stable across runs.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][side][square]
    pieces: [[[u64; 64]; 2]; 6],
    /// Key XORed in when Black is to move.
    pub black_to_move: u64,
    castling: [u64; 4],
    en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Builds the key set with an xorshift64 generator at compile time.
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < 6 {
            let mut side = 0;
            while side < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[kind][side][square] = state;
                    square += 1;
                }
                side += 1;
            }
            kind += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for `kind` owned by `side` standing on `square`.
    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, side: Side, square: Square) -> u64 {
        self.pieces[kind.index()][side.index()][square.index() as usize]
    }

    /// Returns the key for castling-right bit `right` (0-3).
    #[inline]
    pub const fn castling_key(&self, right: usize) -> u64 {
        self.castling[right]
    }

    /// Returns the key for an en-passant file (0-7).
    #[inline]
    pub const fn en_passant_key(&self, file: usize) -> u64 {
        self.en_passant[file]
    }
}

/// Global keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
